use ndarray::{ArrayD, ArrayViewD, Axis, Slice};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Joins tensors along an existing axis.
///
/// All inputs must have the same rank and agree on every extent except `axis`.
///
/// # Errors
/// - `EmptyTensorList` if `inputs` is empty.
/// - `RankMismatch` if the ranks differ.
/// - `IncompatibleShapes` if an extent other than `axis` differs.
pub fn concatenate_op(inputs: &[Tensor], axis: isize) -> Result<Tensor, QuillError> {
    let first = inputs.first().ok_or_else(|| QuillError::EmptyTensorList {
        operation: "concatenate".to_string(),
    })?;
    let first_shape = first.shape();
    let axis = normalize_axis(axis, first_shape.len())?;

    let value = {
        let guards: Vec<_> = inputs.iter().map(Tensor::read_data).collect();
        for guard in &guards {
            let shape = guard.shape();
            if shape.len() != first_shape.len() {
                return Err(QuillError::RankMismatch {
                    operation: "concatenate".to_string(),
                    expected: vec![first_shape.len()],
                    actual: shape.len(),
                });
            }
            let agrees = shape
                .iter()
                .zip(first_shape.iter())
                .enumerate()
                .all(|(d, (a, b))| d == axis || a == b);
            if !agrees {
                return Err(QuillError::IncompatibleShapes {
                    shape1: first_shape.clone(),
                    shape2: shape.to_vec(),
                    operation: "concatenate".to_string(),
                });
            }
        }
        let views: Vec<ArrayViewD<'_, f32>> = guards.iter().map(|g| g.value.view()).collect();
        ndarray::concatenate(Axis(axis), &views)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Concatenate {
            inputs: inputs.to_vec(),
            axis,
        },
    ))
}

/// Cuts the gradient along `axis` by each input's extent, in input order.
pub(crate) fn concatenate_backward(
    inputs: &[Tensor],
    axis: usize,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let mut start = 0;
    for input in inputs {
        let extent = input.shape()[axis];
        let slice = grad.slice_axis(Axis(axis), Slice::from(start..start + extent));
        input.accumulate_grad(&slice.to_owned())?;
        start += extent;
    }
    Ok(())
}
