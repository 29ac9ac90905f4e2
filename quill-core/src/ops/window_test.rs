#[cfg(test)]
mod tests {
    use crate::error::QuillError;
    use crate::ops::window::{output_extent, output_size, Size2};
    use std::convert::TryFrom;

    #[test]
    fn test_size2_conversions() {
        assert_eq!(Size2::from(3), Size2::new(3, 3));
        assert_eq!(Size2::from((2, 5)), Size2::new(2, 5));
        assert_eq!(Size2::try_from(&[4usize, 1][..]), Ok(Size2::new(4, 1)));
        assert_eq!(
            Size2::try_from(&[1usize, 2, 3][..]),
            Err(QuillError::InvalidParameterLength {
                name: "Size2".to_string(),
                expected: 2,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_output_extent_floors() {
        assert_eq!(output_extent(5, 2, 2, 0).unwrap(), 2);
        assert_eq!(output_extent(4, 2, 1, 0).unwrap(), 3);
        assert_eq!(output_extent(4, 3, 1, 1).unwrap(), 4);
        assert_eq!(output_extent(7, 3, 2, 1).unwrap(), 4);
    }

    #[test]
    fn test_output_extent_kernel_too_large() {
        assert!(matches!(
            output_extent(2, 3, 1, 0),
            Err(QuillError::ValueOutOfRange { .. })
        ));
        assert_eq!(output_extent(2, 3, 1, 1).unwrap(), 2);
    }

    #[test]
    fn test_output_size_pairs() {
        let out = output_size(Size2::new(5, 6), Size2::from(2), Size2::from(2), Size2::from(0)).unwrap();
        assert_eq!(out, Size2::new(2, 3));
    }

    #[test]
    fn test_require_positive() {
        assert!(Size2::new(1, 0).require_positive("stride").is_err());
        assert!(Size2::new(1, 2).require_positive("stride").is_ok());
    }
}
