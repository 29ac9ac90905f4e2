use ndarray::{ArrayD, Axis};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Inserts a size-1 axis at `axis`, which ranges over `[-(rank+1), rank]`.
pub fn expand_dims_op(input: &Tensor, axis: isize) -> Result<Tensor, QuillError> {
    let (value, axis) = {
        let guard = input.read_data();
        let axis = normalize_axis(axis, guard.value.ndim() + 1)?;
        (guard.value.clone().insert_axis(Axis(axis)), axis)
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::ExpandDims {
            input: input.clone(),
            axis,
        },
    ))
}

/// Removes the size-1 axis `axis`.
///
/// # Errors
/// Returns `ShapeMismatch` if the axis does not have extent 1.
pub fn squeeze_op(input: &Tensor, axis: isize) -> Result<Tensor, QuillError> {
    let (value, axis) = {
        let guard = input.read_data();
        let axis = normalize_axis(axis, guard.value.ndim())?;
        if guard.shape()[axis] != 1 {
            return Err(QuillError::ShapeMismatch {
                expected: vec![1],
                actual: vec![guard.shape()[axis]],
                operation: format!("squeeze(axis={axis})"),
            });
        }
        (guard.value.clone().remove_axis(Axis(axis)), axis)
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Squeeze {
            input: input.clone(),
            axis,
        },
    ))
}

pub(crate) fn expand_dims_backward(
    input: &Tensor,
    axis: usize,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    input.accumulate_grad(&grad.clone().remove_axis(Axis(axis)))
}

pub(crate) fn squeeze_backward(input: &Tensor, axis: usize, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    input.accumulate_grad(&grad.clone().insert_axis(Axis(axis)))
}
