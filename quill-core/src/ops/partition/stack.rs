use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Joins equally shaped tensors along a new axis.
///
/// `axis` ranges over `[-(rank+1), rank]` of the inputs' rank.
///
/// # Errors
/// - `EmptyTensorList` if `inputs` is empty.
/// - `ShapeMismatch` if the inputs do not all share one shape.
pub fn stack_op(inputs: &[Tensor], axis: isize) -> Result<Tensor, QuillError> {
    let first = inputs.first().ok_or_else(|| QuillError::EmptyTensorList {
        operation: "stack".to_string(),
    })?;
    let shape = first.shape();
    let axis = normalize_axis(axis, shape.len() + 1)?;

    let value = {
        let guards: Vec<_> = inputs.iter().map(Tensor::read_data).collect();
        for guard in &guards {
            if guard.shape() != shape.as_slice() {
                return Err(QuillError::ShapeMismatch {
                    expected: shape.clone(),
                    actual: guard.shape().to_vec(),
                    operation: "stack".to_string(),
                });
            }
        }
        let views: Vec<ArrayViewD<'_, f32>> = guards.iter().map(|g| g.value.view()).collect();
        ndarray::stack(Axis(axis), &views)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Stack {
            inputs: inputs.to_vec(),
            axis,
        },
    ))
}

/// Hands slice `i` of the gradient along `axis` to input `i`.
pub(crate) fn stack_backward(inputs: &[Tensor], axis: usize, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    for (i, input) in inputs.iter().enumerate() {
        input.accumulate_grad(&grad.index_axis(Axis(axis), i).to_owned())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::ops::arithmetic::mul_op;
    use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

    #[test]
    fn test_stack_new_axis() -> Result<(), QuillError> {
        let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
        let b = create_test_tensor(vec![3.0, 4.0], vec![2]);
        check_tensor_near(&stack_op(&[a.clone(), b.clone()], 0)?, &[2, 2], &[1.0, 2.0, 3.0, 4.0], 1e-6);
        check_tensor_near(&stack_op(&[a, b], -1)?, &[2, 2], &[1.0, 3.0, 2.0, 4.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_stack_errors() {
        assert!(matches!(
            stack_op(&[], 0),
            Err(QuillError::EmptyTensorList { .. })
        ));
        let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
        let b = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
        assert!(matches!(
            stack_op(&[a, b], 0),
            Err(QuillError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_stack_backward_routes_slices() -> Result<(), QuillError> {
        let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
        let b = create_test_tensor(vec![3.0, 4.0], vec![2]);
        let weights = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
        mul_op(&stack_op(&[a.clone(), b.clone(), a.clone()], 1)?, &create_test_tensor(vec![1.0; 6], vec![2, 3]))?
            .backward()?;
        check_grad_near(&a, &[2], &[2.0, 2.0], 1e-6);
        check_grad_near(&b, &[2], &[1.0, 1.0], 1e-6);

        a.zero_grad();
        b.zero_grad();
        mul_op(&stack_op(&[a.clone(), b.clone()], 0)?, &weights)?.backward()?;
        check_grad_near(&a, &[2], &[1.0, 2.0], 1e-6);
        check_grad_near(&b, &[2], &[3.0, 4.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_stack_grad_check() {
        let a = seeded_uniform(&[2, 3], 91);
        let b = seeded_uniform(&[2, 3], 92);
        let output_grad = seeded_output_grad(&[2, 2, 3], 93);
        let result = check_grad(|inputs| stack_op(inputs, 1), &[a, b], &output_grad, 1e-3, 1e-2);
        assert!(result.is_ok(), "{:?}", result);
    }
}
