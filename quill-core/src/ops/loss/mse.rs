use ndarray::{ArrayD, Zip};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::Tensor;

/// Element-wise squared error `0.5 * (prediction - target)^2`.
///
/// No reduction is applied; follow with [`sum_op`](crate::ops::sum_op) for a scalar loss.
///
/// # Errors
/// Returns `ShapeMismatch` unless both operands have the same shape.
pub fn mse_loss_op(prediction: &Tensor, target: &Tensor) -> Result<Tensor, QuillError> {
    let value = {
        let p_guard = prediction.read_data();
        let t_guard = target.read_data();
        if p_guard.shape() != t_guard.shape() {
            return Err(QuillError::ShapeMismatch {
                expected: p_guard.shape().to_vec(),
                actual: t_guard.shape().to_vec(),
                operation: "mse_loss".to_string(),
            });
        }
        Zip::from(&p_guard.value)
            .and(&t_guard.value)
            .map_collect(|&p, &t| 0.5 * (p - t) * (p - t))
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::MseLoss {
            prediction: prediction.clone(),
            target: target.clone(),
        },
    ))
}

pub(crate) fn mse_loss_backward(
    prediction: &Tensor,
    target: &Tensor,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let grad_prediction = {
        let p_guard = prediction.read_data();
        let t_guard = target.read_data();
        Zip::from(grad)
            .and(&p_guard.value)
            .and(&t_guard.value)
            .map_collect(|&g, &p, &t| (p - t) * g)
    };
    let grad_target = grad_prediction.mapv(|v| -v);
    prediction.accumulate_grad(&grad_prediction)?;
    target.accumulate_grad(&grad_target)
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
