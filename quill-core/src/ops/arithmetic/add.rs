// quill-core/src/ops/arithmetic/add.rs

use ndarray::ArrayD;

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::{broadcast_shapes, reduce_to_shape};
use crate::tensor::Tensor;

// --- Forward Operation ---

/// Element-wise addition with NumPy-style broadcasting.
///
/// # Errors
/// Returns `QuillError::BroadcastError` if the shapes cannot be broadcast together.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, QuillError> {
    let value = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        broadcast_shapes(a_guard.shape(), b_guard.shape())?;
        &a_guard.value + &b_guard.value
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Add {
            a: a.clone(),
            b: b.clone(),
        },
    ))
}

// --- Backward Operation ---

/// Passes the gradient through to both operands, summed over broadcast axes.
pub(crate) fn add_backward(a: &Tensor, b: &Tensor, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let grad_a = reduce_to_shape(grad, &a.shape())?;
    a.accumulate_grad(&grad_a)?;
    let grad_b = reduce_to_shape(grad, &b.shape())?;
    b.accumulate_grad(&grad_b)
}

// --- Tests ---
#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
