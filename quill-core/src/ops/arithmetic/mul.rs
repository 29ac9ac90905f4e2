use ndarray::ArrayD;

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::{broadcast_shapes, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise multiplication with broadcasting.
///
/// # Errors
/// Returns `QuillError::BroadcastError` if the shapes cannot be broadcast together.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, QuillError> {
    let value = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        broadcast_shapes(a_guard.shape(), b_guard.shape())?;
        &a_guard.value * &b_guard.value
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Mul {
            a: a.clone(),
            b: b.clone(),
        },
    ))
}

/// `da += reduce(g * b)`, `db += reduce(g * a)`.
pub(crate) fn mul_backward(a: &Tensor, b: &Tensor, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let a_shape = a.shape();
    let b_shape = b.shape();

    let grad_a = reduce_to_shape(&(grad * &b.read_data().value), &a_shape)?;
    a.accumulate_grad(&grad_a)?;

    let grad_b = reduce_to_shape(&(grad * &a.read_data().value), &b_shape)?;
    b.accumulate_grad(&grad_b)
}

// --- Tests ---
#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
