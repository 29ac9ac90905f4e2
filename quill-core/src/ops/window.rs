//! Sliding-window geometry shared by pooling and convolution.

use std::convert::TryFrom;

use ndarray::{Array3, ArrayD, IxDyn};

use crate::error::QuillError;

/// A `(height, width)` pair for kernel sizes, strides and paddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size2 {
    pub height: usize,
    pub width: usize,
}

impl Size2 {
    pub const fn new(height: usize, width: usize) -> Self {
        Size2 { height, width }
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    /// Fails with `ValueOutOfRange` unless both entries are positive.
    pub(crate) fn require_positive(&self, name: &str) -> Result<(), QuillError> {
        for (label, value) in [("height", self.height), ("width", self.width)] {
            if value == 0 {
                return Err(QuillError::ValueOutOfRange {
                    name: format!("{name}.{label}"),
                    value: value.to_string(),
                    constraint: "a positive extent".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<usize> for Size2 {
    fn from(value: usize) -> Self {
        Size2::new(value, value)
    }
}

impl From<(usize, usize)> for Size2 {
    fn from((height, width): (usize, usize)) -> Self {
        Size2::new(height, width)
    }
}

impl TryFrom<&[usize]> for Size2 {
    type Error = QuillError;

    fn try_from(values: &[usize]) -> Result<Self, Self::Error> {
        match values {
            [height, width] => Ok(Size2::new(*height, *width)),
            _ => Err(QuillError::InvalidParameterLength {
                name: "Size2".to_string(),
                expected: 2,
                actual: values.len(),
            }),
        }
    }
}

/// Number of window positions along one axis: `floor((input + 2 * padding - kernel) / stride) + 1`.
///
/// # Errors
/// Returns `ValueOutOfRange` when the kernel does not fit in the padded input.
pub fn output_extent(input: usize, kernel: usize, stride: usize, padding: usize) -> Result<usize, QuillError> {
    let padded = input + 2 * padding;
    if kernel > padded {
        return Err(QuillError::ValueOutOfRange {
            name: "kernel".to_string(),
            value: kernel.to_string(),
            constraint: format!("at most the padded input extent {padded}"),
        });
    }
    Ok((padded - kernel) / stride + 1)
}

/// Spatial output size of a window sweep over `(height, width)`.
pub fn output_size(input: Size2, kernel: Size2, stride: Size2, padding: Size2) -> Result<Size2, QuillError> {
    Ok(Size2::new(
        output_extent(input.height, kernel.height, stride.height, padding.height)?,
        output_extent(input.width, kernel.width, stride.width, padding.width)?,
    ))
}

/// Checks that a pool/conv input is rank 3 `(C, H, W)` or rank 4 `(N, C, H, W)`.
pub(crate) fn require_spatial_rank(shape: &[usize], operation: &str) -> Result<(), QuillError> {
    if shape.len() != 3 && shape.len() != 4 {
        return Err(QuillError::RankMismatch {
            operation: operation.to_string(),
            expected: vec![3, 4],
            actual: shape.len(),
        });
    }
    Ok(())
}

/// Views an `(..., H, W)` array as `(B, H, W)` with every leading axis folded into `B`.
pub(crate) fn fold_leading(array: &ArrayD<f32>) -> Result<Array3<f32>, QuillError> {
    let shape = array.shape();
    let rank = shape.len();
    let (height, width) = (shape[rank - 2], shape[rank - 1]);
    let batches: usize = shape[..rank - 2].iter().product();
    Ok(Array3::from_shape_vec(
        (batches, height, width),
        array.iter().copied().collect(),
    )?)
}

/// Inverse of [`fold_leading`]: restores the leading axes `leading` in front of `(H, W)`.
pub(crate) fn unfold_leading(array: Array3<f32>, leading: &[usize]) -> Result<ArrayD<f32>, QuillError> {
    let (_, height, width) = array.dim();
    let mut shape = leading.to_vec();
    shape.extend([height, width]);
    Ok(array.into_shape(IxDyn(&shape))?)
}
