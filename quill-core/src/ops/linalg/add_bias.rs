use ndarray::{Array1, ArrayD, Axis};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::{normalize_axis, reshape_array};
use crate::tensor::Tensor;

/// Adds a 1-D bias along `axis` of `input`, broadcasting it over every other axis.
///
/// `bias.shape()` must be `[input.shape()[axis]]`. With a 1-D input this is a
/// plain element-wise sum.
///
/// # Errors
/// - `InvalidAxis` if `axis` is out of range for `input`.
/// - `RankMismatch` if `bias` is not 1-D.
/// - `ShapeMismatch` if the bias length differs from the extent of `axis`.
pub fn add_bias_op(input: &Tensor, bias: &Tensor, axis: isize) -> Result<Tensor, QuillError> {
    let (value, axis) = {
        let x_guard = input.read_data();
        let b_guard = bias.read_data();
        let rank = x_guard.value.ndim();
        let axis = normalize_axis(axis, rank)?;
        if b_guard.value.ndim() != 1 {
            return Err(QuillError::RankMismatch {
                operation: "add_bias".to_string(),
                expected: vec![1],
                actual: b_guard.value.ndim(),
            });
        }
        let extent = x_guard.shape()[axis];
        if b_guard.shape()[0] != extent {
            return Err(QuillError::ShapeMismatch {
                expected: vec![extent],
                actual: b_guard.shape().to_vec(),
                operation: "add_bias".to_string(),
            });
        }
        let mut bias_shape = vec![1; rank];
        bias_shape[axis] = extent;
        let bias_view = reshape_array(&b_guard.value, &bias_shape)?;
        (&x_guard.value + &bias_view, axis)
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::AddBias {
            input: input.clone(),
            bias: bias.clone(),
            axis,
        },
    ))
}

/// `dx += g`; `db[i] += sum of g over the slice i of axis`.
pub(crate) fn add_bias_backward(
    input: &Tensor,
    bias: &Tensor,
    axis: usize,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    input.accumulate_grad(grad)?;
    let grad_bias: Array1<f32> = grad
        .axis_iter(Axis(axis))
        .map(|slice| slice.sum())
        .collect();
    bias.accumulate_grad(&grad_bias.into_dyn())
}
