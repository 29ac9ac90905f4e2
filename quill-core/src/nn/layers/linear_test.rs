use super::*;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fixed_layer() -> Linear {
    let weight = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2]);
    let bias = create_test_tensor(vec![0.5, -0.5], vec![2]);
    Linear::from_parts(weight, Some(bias)).unwrap()
}

#[test]
fn test_linear_single_example() -> Result<(), QuillError> {
    let layer = fixed_layer();
    let x = create_test_tensor(vec![1.0, 0.0, -1.0], vec![3]);
    let y = layer.forward(&x)?;
    // [1 - 5, 2 - 6] + bias
    check_tensor_near(&y, &[2], &[-3.5, -4.5], 1e-6);
    Ok(())
}

#[test]
fn test_linear_batch_and_gradients() -> Result<(), QuillError> {
    let layer = fixed_layer();
    let x = create_test_tensor(vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.0], vec![2, 3]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), vec![2, 2]);
    y.backward()?;
    check_grad_near(layer.bias().unwrap(), &[2], &[2.0, 2.0], 1e-6);
    // dW = xᵀ · 1
    check_grad_near(layer.weight(), &[3, 2], &[3.0, 3.0, 1.0, 1.0, -1.0, -1.0], 1e-6);
    // dx = 1 · Wᵀ
    check_grad_near(&x, &[2, 3], &[3.0, 7.0, 11.0, 3.0, 7.0, 11.0], 1e-6);
    Ok(())
}

#[test]
fn test_linear_parameters() -> Result<(), QuillError> {
    let mut rng = StdRng::seed_from_u64(1);
    let with_bias = Linear::new(4, 3, true, &mut rng)?;
    let names: Vec<String> = with_bias.named_parameters().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["bias", "weight"]);
    let without_bias = Linear::new(4, 3, false, &mut rng)?;
    assert_eq!(without_bias.parameters().leaves().len(), 1);
    assert!(Linear::new(4, 0, true, &mut rng).is_err());
    Ok(())
}

#[test]
fn test_linear_from_parts_validation() {
    let weight = create_test_tensor(vec![0.0; 6], vec![3, 2]);
    let bias = create_test_tensor(vec![0.0; 3], vec![3]);
    assert!(matches!(
        Linear::from_parts(weight, Some(bias)),
        Err(QuillError::ShapeMismatch { .. })
    ));
}
