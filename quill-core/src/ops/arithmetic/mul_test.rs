use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

#[test]
fn test_mul_forward_broadcast() -> Result<(), QuillError> {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor(vec![10.0, 100.0], vec![2]);
    let result = mul_op(&a, &b)?;
    check_tensor_near(&result, &[2, 2], &[10.0, 200.0, 30.0, 400.0], 1e-5);
    Ok(())
}

#[test]
fn test_mul_backward_values() -> Result<(), QuillError> {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_tensor(vec![4.0, 5.0, 6.0], vec![3]);
    mul_op(&a, &b)?.backward()?;
    check_grad_near(&a, &[3], &[4.0, 5.0, 6.0], 1e-6);
    check_grad_near(&b, &[3], &[1.0, 2.0, 3.0], 1e-6);
    Ok(())
}

#[test]
fn test_mul_square_same_operand() -> Result<(), QuillError> {
    let a = create_test_tensor(vec![3.0, -2.0], vec![2]);
    mul_op(&a, &a)?.backward()?;
    check_grad_near(&a, &[2], &[6.0, -4.0], 1e-6);
    Ok(())
}

#[test]
fn test_mul_grad_check_broadcast() {
    let a = seeded_uniform(&[2, 1, 3], 11);
    let b = seeded_uniform(&[4, 3], 12);
    let output_grad = seeded_output_grad(&[2, 4, 3], 13);
    let result = check_grad(|inputs| mul_op(&inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-3, 1e-2);
    assert!(result.is_ok(), "{:?}", result);
}
