// quill-core/src/ops/view/reshape.rs

use ndarray::ArrayD;

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::reshape_array;
use crate::tensor::Tensor;

/// Resolves a target shape that may contain a single `-1` wildcard.
fn resolve_shape(numel: usize, shape: &[isize]) -> Result<Vec<usize>, QuillError> {
    let mut wildcard = None;
    let mut known = 1usize;
    let mut resolved = Vec::with_capacity(shape.len());
    for (i, &dim) in shape.iter().enumerate() {
        if dim == -1 {
            if wildcard.replace(i).is_some() {
                return Err(QuillError::ValueOutOfRange {
                    name: "shape".to_string(),
                    value: format!("{:?}", shape),
                    constraint: "at most one -1 entry".to_string(),
                });
            }
            resolved.push(0);
        } else if dim < 0 {
            return Err(QuillError::ValueOutOfRange {
                name: format!("shape[{i}]"),
                value: dim.to_string(),
                constraint: "a non-negative extent or -1".to_string(),
            });
        } else {
            known *= dim as usize;
            resolved.push(dim as usize);
        }
    }
    if let Some(i) = wildcard {
        if known == 0 || numel % known != 0 {
            return Err(QuillError::ShapeMismatch {
                expected: vec![numel],
                actual: resolved,
                operation: "reshape".to_string(),
            });
        }
        resolved[i] = numel / known;
    }
    Ok(resolved)
}

/// Reinterprets the values of `input` (row-major) under a new shape.
///
/// One entry of `shape` may be `-1`; it is inferred from the element count.
///
/// # Errors
/// Returns `ShapeMismatch` if the element counts differ, or `ValueOutOfRange`
/// for malformed shape entries.
pub fn reshape_op(input: &Tensor, shape: &[isize]) -> Result<Tensor, QuillError> {
    let value = {
        let guard = input.read_data();
        let target = resolve_shape(guard.value.len(), shape)?;
        reshape_array(&guard.value, &target)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Reshape {
            input: input.clone(),
        },
    ))
}

/// Flattens `input` to one dimension.
pub fn flatten_op(input: &Tensor) -> Result<Tensor, QuillError> {
    reshape_op(input, &[-1])
}

pub(crate) fn reshape_backward(input: &Tensor, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let grad_input = reshape_array(grad, &input.shape())?;
    input.accumulate_grad(&grad_input)
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;
