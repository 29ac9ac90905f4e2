use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};

use crate::error::QuillError;
use crate::tensor::Tensor;

/// Creates a leaf tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor {
    Tensor::from_array(ArrayD::zeros(IxDyn(shape)))
}

/// Creates a leaf tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor {
    Tensor::from_array(ArrayD::ones(IxDyn(shape)))
}

/// Creates a leaf tensor filled with `fill_value`.
pub fn full(shape: &[usize], fill_value: f32) -> Tensor {
    Tensor::from_array(ArrayD::from_elem(IxDyn(shape), fill_value))
}

/// Creates a zero leaf with the same shape as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Tensor {
    zeros(&tensor.shape())
}

/// Creates a leaf of ones with the same shape as `tensor`.
pub fn ones_like(tensor: &Tensor) -> Tensor {
    ones(&tensor.shape())
}

/// Creates a leaf with values drawn uniformly from `[low, high)`.
///
/// # Errors
/// Returns `QuillError::ValueOutOfRange` when `low >= high`.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<Tensor, QuillError> {
    if !(low < high) {
        return Err(QuillError::ValueOutOfRange {
            name: "high".to_string(),
            value: high.to_string(),
            constraint: format!("a bound strictly greater than low ({low})"),
        });
    }
    let dist = Uniform::new(low, high);
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel).map(|_| dist.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates a leaf with values drawn from the standard normal distribution.
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Tensor, QuillError> {
    let numel: usize = shape.iter().product();
    let data: Vec<f32> = (0..numel)
        .map(|_| <StandardNormal as Distribution<f32>>::sample(&StandardNormal, rng))
        .collect();
    Tensor::new(data, shape.to_vec())
}
