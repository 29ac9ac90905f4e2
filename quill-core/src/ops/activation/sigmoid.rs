use ndarray::{ArrayD, Zip};
use num_traits::Float;

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::Tensor;

/// Logistic function evaluated without overflow for large `|x|`.
fn stable_sigmoid<F: Float>(x: F) -> F {
    if x >= F::zero() {
        F::one() / (F::one() + (-x).exp())
    } else {
        let e = x.exp();
        e / (F::one() + e)
    }
}

/// Applies the logistic sigmoid `1 / (1 + e^-x)` element-wise.
pub fn sigmoid_op(input: &Tensor) -> Result<Tensor, QuillError> {
    let value = input.read_data().value.mapv(stable_sigmoid::<f32>);
    Ok(Tensor::from_op(
        value,
        BackwardOp::Sigmoid {
            input: input.clone(),
        },
    ))
}

/// `dx += g * y * (1 - y)` where `y` is the node's own output.
pub(crate) fn sigmoid_backward(
    input: &Tensor,
    output: &ArrayD<f32>,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let grad_input = Zip::from(grad)
        .and(output)
        .map_collect(|&g, &y| g * y * (1.0 - y));
    input.accumulate_grad(&grad_input)
}
