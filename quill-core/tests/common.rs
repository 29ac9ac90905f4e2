use quill_core::tensor::Tensor;

// Shared by several integration test crates; each only uses part of it.
#[allow(dead_code)]
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn assert_all_close(actual: &[f32], expected: &[f32], tol: f32) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "mismatch at {}: actual {}, expected {}",
            i,
            a,
            e
        );
    }
}

/// Mean of `0.5 * (prediction - target)^2` as a scalar graph node.
#[allow(dead_code)]
pub fn mean_squared_error(prediction: &Tensor, target: &Tensor) -> Tensor {
    let per_element = quill_core::ops::mse_loss_op(prediction, target).expect("mse_loss failed");
    let n = per_element.numel() as f32;
    let total = quill_core::ops::sum_op(&per_element, None).expect("sum failed");
    quill_core::ops::mul_op(&total, &Tensor::scalar(1.0 / n)).expect("scaling failed")
}
