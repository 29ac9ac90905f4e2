use super::*;
use crate::autograd::grad_check::check_grad;
use crate::ops::arithmetic::add_op;
use crate::ops::partition::{concatenate_op, stack_op};
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_output_grad, seeded_uniform};

#[test]
fn test_split_values_and_indices() -> Result<(), QuillError> {
    let x = create_test_tensor((0..12).map(|v| v as f32).collect(), vec![6, 2]);
    let parts = split_op(&x, 3, 0)?;
    assert_eq!(parts.len(), 3);
    for (i, part) in parts.iter().enumerate() {
        assert_eq!(part.partition_index(), Some(i));
        assert_eq!(part.shape(), vec![2, 2]);
    }
    check_tensor_near(&parts[1], &[2, 2], &[4.0, 5.0, 6.0, 7.0], 1e-6);
    Ok(())
}

#[test]
fn test_split_rejects_uneven_and_zero() {
    let x = create_test_tensor(vec![0.0; 5], vec![5]);
    assert_eq!(
        split_op(&x, 2, 0).unwrap_err(),
        QuillError::UnevenSplit { len: 5, sections: 2 }
    );
    assert!(matches!(
        split_op(&x, 0, 0),
        Err(QuillError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_split_round_trip_gradient() -> Result<(), QuillError> {
    let x = create_test_tensor(vec![0.5; 24], vec![6, 4]);
    for part in split_op(&x, 3, 0)? {
        part.backward()?;
    }
    check_grad_near(&x, &[6, 4], &[1.0; 24], 1e-6);
    Ok(())
}

#[test]
fn test_split_children_scatter_to_their_region() -> Result<(), QuillError> {
    let x = create_test_tensor(vec![0.0; 6], vec![6]);
    let parts = split_op(&x, 3, -1)?;
    parts[2].backward()?;
    check_grad_near(&x, &[6], &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0], 1e-6);
    Ok(())
}

#[test]
fn test_split_siblings_fan_in() -> Result<(), QuillError> {
    let x = create_test_tensor(vec![1.0; 8], vec![4, 2]);
    let parts = split_op(&x, 2, 0)?;
    let total = add_op(&add_op(&parts[0], &parts[1])?, &parts[0])?;
    total.backward()?;
    check_grad_near(&x, &[4, 2], &[2.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0], 1e-6);
    Ok(())
}

#[test]
fn test_partition_index_out_of_bounds_is_lazy() -> Result<(), QuillError> {
    let x = create_test_tensor(vec![0.0; 4], vec![4]);
    let bogus = Tensor::from_partition(
        ndarray::ArrayD::zeros(ndarray::IxDyn(&[2])),
        BackwardOp::Split {
            input: x.clone(),
            axis: 0,
            sections: 2,
        },
        5,
    );
    let result = bogus.backward();
    assert!(matches!(
        result,
        Err(QuillError::PartitionIndexOutOfBounds { index: 5, .. })
    ));
    Ok(())
}

#[test]
fn test_unstack_values_and_gradient() -> Result<(), QuillError> {
    let x = create_test_tensor((0..6).map(|v| v as f32).collect(), vec![2, 3]);
    let columns = unstack_op(&x, 1)?;
    assert_eq!(columns.len(), 3);
    check_tensor_near(&columns[2], &[2], &[2.0, 5.0], 1e-6);
    columns[0].backward()?;
    columns[2].backward()?;
    check_grad_near(&x, &[2, 3], &[1.0, 0.0, 1.0, 1.0, 0.0, 1.0], 1e-6);
    Ok(())
}

#[test]
fn test_unstack_then_stack_is_identity_for_gradients() -> Result<(), QuillError> {
    let x = seeded_uniform(&[3, 2], 111);
    let rebuilt = stack_op(&unstack_op(&x, 0)?, 0)?;
    check_tensor_near(&rebuilt, &[3, 2], &x.to_vec(), 1e-6);
    rebuilt.backward()?;
    check_grad_near(&x, &[3, 2], &[1.0; 6], 1e-6);
    Ok(())
}

#[test]
fn test_split_grad_check() {
    let x = seeded_uniform(&[2, 6], 112);
    let output_grad = seeded_output_grad(&[2, 4], 113);
    let result = check_grad(
        |inputs| {
            let parts = split_op(&inputs[0], 3, 1)?;
            concatenate_op(&[parts[2].clone(), parts[0].clone()], 1)
        },
        &[x],
        &output_grad,
        1e-3,
        1e-2,
    );
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_unstack_grad_check() {
    let x = seeded_uniform(&[3, 2, 2], 114);
    let output_grad = seeded_output_grad(&[2, 2], 115);
    let result = check_grad(
        |inputs| {
            let slices = unstack_op(&inputs[0], 0)?;
            add_op(&slices[0], &slices[2])
        },
        &[x],
        &output_grad,
        1e-3,
        1e-2,
    );
    assert!(result.is_ok(), "{:?}", result);
}
