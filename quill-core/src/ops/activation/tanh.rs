use ndarray::{ArrayD, Zip};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::Tensor;

/// Applies the hyperbolic tangent element-wise.
pub fn tanh_op(input: &Tensor) -> Result<Tensor, QuillError> {
    let value = input.read_data().value.mapv(f32::tanh);
    Ok(Tensor::from_op(
        value,
        BackwardOp::Tanh {
            input: input.clone(),
        },
    ))
}

/// `dx += g * (1 - y^2)`.
pub(crate) fn tanh_backward(
    input: &Tensor,
    output: &ArrayD<f32>,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let grad_input = Zip::from(grad)
        .and(output)
        .map_collect(|&g, &y| g * (1.0 - y * y));
    input.accumulate_grad(&grad_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::utils::testing::{check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

    #[test]
    fn test_tanh_forward() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![0.0, 1.0, -1.0], vec![3]);
        check_tensor_near(&tanh_op(&x)?, &[3], &[0.0, 0.761_594, -0.761_594], 1e-5);
        Ok(())
    }

    #[test]
    fn test_tanh_grad_check() {
        let x = seeded_uniform(&[3, 3], 31);
        let output_grad = seeded_output_grad(&[3, 3], 32);
        let result = check_grad(|inputs| tanh_op(&inputs[0]), &[x], &output_grad, 1e-3, 1e-2);
        assert!(result.is_ok(), "{:?}", result);
    }
}
