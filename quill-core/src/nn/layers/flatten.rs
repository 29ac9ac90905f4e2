use crate::error::QuillError;
use crate::nn::module::Module;
use crate::ops::{flatten_op, reshape_op};
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Collapses every axis from `start_axis` onward into one.
///
/// The default (`start_axis = 0`) flattens to 1-D; `Flatten::from_axis(1)` keeps a
/// leading batch axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten {
    start_axis: isize,
}

impl Flatten {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_axis(start_axis: isize) -> Self {
        Flatten { start_axis }
    }
}

impl Module for Flatten {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        let shape = input.shape();
        let start = normalize_axis(self.start_axis, shape.len())?;
        if start == 0 {
            return flatten_op(input);
        }
        let mut target: Vec<isize> = shape[..start].iter().map(|&d| d as isize).collect();
        target.push(-1);
        reshape_op(input, &target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::seeded_uniform;

    #[test]
    fn test_flatten_layer() -> Result<(), QuillError> {
        let x = seeded_uniform(&[2, 3, 4], 19);
        assert_eq!(Flatten::new().forward(&x)?.shape(), vec![24]);
        assert_eq!(Flatten::from_axis(1).forward(&x)?.shape(), vec![2, 12]);
        assert_eq!(Flatten::from_axis(-1).forward(&x)?.shape(), vec![2, 3, 4]);
        Ok(())
    }
}
