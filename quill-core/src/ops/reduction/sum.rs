// quill-core/src/ops/reduction/sum.rs

use ndarray::{ArrayD, Axis, IxDyn};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Sums `input` over `axis`, or over every axis into a 0-d scalar when `axis` is `None`.
pub fn sum_op(input: &Tensor, axis: Option<isize>) -> Result<Tensor, QuillError> {
    let (value, axis) = {
        let guard = input.read_data();
        match axis {
            Some(axis) => {
                let axis = normalize_axis(axis, guard.value.ndim())?;
                (guard.value.sum_axis(Axis(axis)), Some(axis))
            }
            None => (ArrayD::from_elem(IxDyn(&[]), guard.value.sum()), None),
        }
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Sum {
            input: input.clone(),
            axis,
        },
    ))
}

/// Broadcasts the gradient back over the reduced axis (or axes).
pub(crate) fn sum_backward(input: &Tensor, axis: Option<usize>, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let shape = input.shape();
    let expanded = match axis {
        Some(axis) => grad.clone().insert_axis(Axis(axis)),
        None => grad.clone(),
    };
    let grad_input = expanded
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| QuillError::BroadcastError {
            shape1: grad.shape().to_vec(),
            shape2: shape.clone(),
        })?
        .to_owned();
    input.accumulate_grad(&grad_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

    #[test]
    fn test_sum_all_and_axis() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
        let total = sum_op(&x, None)?;
        assert_eq!(total.shape(), Vec::<usize>::new());
        assert_eq!(total.item()?, 21.0);
        check_tensor_near(&sum_op(&x, Some(0))?, &[3], &[5.0, 7.0, 9.0], 1e-6);
        check_tensor_near(&sum_op(&x, Some(-1))?, &[2], &[6.0, 15.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_sum_backward_broadcasts() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![0.0; 6], vec![2, 3]);
        let rows = sum_op(&x, Some(1))?;
        rows.backward_with_grad(ndarray::ArrayD::from_shape_vec(IxDyn(&[2]), vec![2.0, -1.0])?)?;
        check_grad_near(&x, &[2, 3], &[2.0, 2.0, 2.0, -1.0, -1.0, -1.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_sum_grad_check() {
        let x = seeded_uniform(&[3, 2, 2], 161);
        let output_grad = seeded_output_grad(&[3, 2], 162);
        let result = check_grad(|inputs| sum_op(&inputs[0], Some(1)), &[x], &output_grad, 1e-3, 1e-2);
        assert!(result.is_ok(), "{:?}", result);
    }
}
