// quill-core/src/ops/activation/relu.rs

use ndarray::{ArrayD, Zip};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::Tensor;

/// Rectified linear unit, `max(x, 0)` element-wise.
///
/// The derivative at exactly `0` is taken to be `0`.
pub fn relu_op(input: &Tensor) -> Result<Tensor, QuillError> {
    let value = input.read_data().value.mapv(|x| x.max(0.0));
    Ok(Tensor::from_op(
        value,
        BackwardOp::Relu {
            input: input.clone(),
        },
    ))
}

pub(crate) fn relu_backward(input: &Tensor, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let grad_input = {
        let guard = input.read_data();
        Zip::from(grad)
            .and(&guard.value)
            .map_collect(|&g, &x| if x > 0.0 { g } else { 0.0 })
    };
    input.accumulate_grad(&grad_input)
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
