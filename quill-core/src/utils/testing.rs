use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::tensor::{self, Tensor};

/// Checks that a tensor's value has `expected_shape` and is element-wise within
/// `tolerance` of `expected_data`.
///
/// Panics with the offending index on mismatch.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    check_values_near(&actual.to_vec(), expected_data, tolerance);
}

/// Same as [`check_tensor_near`] but for the accumulated gradient.
pub fn check_grad_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.grad().shape(), expected_shape, "Gradient shape mismatch");
    check_values_near(&actual.grad_vec(), expected_data, tolerance);
}

fn check_values_near(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "Data length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a leaf tensor for tests.
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Leaf tensor of uniform values in `[-1, 1)`, reproducible from `seed`.
pub fn seeded_uniform(shape: &[usize], seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    tensor::rand_uniform(shape, -1.0, 1.0, &mut rng).expect("Failed to create random tensor")
}

/// Leaf tensor whose values are pairwise at least `gap` apart, shuffled.
///
/// Keeps finite differences away from the kinks of `relu` and `max`.
pub fn seeded_distinct(shape: &[usize], gap: f32, seed: u64) -> Tensor {
    use rand::seq::SliceRandom;
    let numel: usize = shape.iter().product();
    let offset = numel as f32 / 2.0;
    let mut data: Vec<f32> = (0..numel).map(|i| (i as f32 - offset + 0.5) * gap).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    data.shuffle(&mut rng);
    Tensor::new(data, shape.to_vec()).expect("Failed to create distinct tensor")
}

/// Upstream gradient for gradient checks: seeded uniform values of `shape`.
pub fn seeded_output_grad(shape: &[usize], seed: u64) -> ArrayD<f32> {
    seeded_uniform(shape, seed).value()
}
