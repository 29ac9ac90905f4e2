use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

#[test]
fn test_add_tensors_ok() -> Result<(), QuillError> {
    let t1 = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let t2 = create_test_tensor(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]);
    let result = add_op(&t1, &t2)?;
    check_tensor_near(&result, &[2, 2], &[6.0, 8.0, 10.0, 12.0], 1e-6);
    assert_eq!(result.op_name(), Some("add"));
    assert!(!result.is_leaf());
    Ok(())
}

#[test]
fn test_add_broadcasting() -> Result<(), QuillError> {
    let matrix = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let row = create_test_tensor(vec![10.0, 20.0, 30.0], vec![3]);
    let result = add_op(&matrix, &row)?;
    check_tensor_near(&result, &[2, 3], &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0], 1e-6);
    Ok(())
}

#[test]
fn test_add_shape_mismatch() {
    let t1 = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let t2 = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let result = add_op(&t1, &t2);
    assert!(matches!(result, Err(QuillError::BroadcastError { .. })));
}

#[test]
fn test_add_backward_reduces_broadcast_axes() -> Result<(), QuillError> {
    let matrix = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    let column = create_test_tensor(vec![0.0, 0.0], vec![2, 1]);
    let result = add_op(&matrix, &column)?;
    result.backward()?;
    check_grad_near(&matrix, &[2, 3], &[1.0; 6], 1e-6);
    check_grad_near(&column, &[2, 1], &[3.0, 3.0], 1e-6);
    Ok(())
}

#[test]
fn test_add_backward_same_operand_twice() -> Result<(), QuillError> {
    let a = create_test_tensor(vec![1.0, -1.0], vec![2]);
    add_op(&a, &a)?.backward()?;
    check_grad_near(&a, &[2], &[2.0, 2.0], 1e-6);
    Ok(())
}

#[test]
fn test_add_grad_check() {
    let a = seeded_uniform(&[3, 4], 1);
    let b = seeded_uniform(&[4], 2);
    let output_grad = seeded_output_grad(&[3, 4], 3);
    let result = check_grad(|inputs| add_op(&inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-3, 1e-2);
    assert!(result.is_ok(), "{:?}", result);
}
