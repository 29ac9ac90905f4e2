use rand::Rng;

use crate::error::QuillError;
use crate::tensor::{self, Tensor};

/// Draws a leaf uniformly from `[-1/sqrt(fan_in), 1/sqrt(fan_in))`.
///
/// # Errors
/// Returns `ValueOutOfRange` when `fan_in` is zero.
pub fn uniform_fan_in<R: Rng + ?Sized>(
    shape: &[usize],
    fan_in: usize,
    rng: &mut R,
) -> Result<Tensor, QuillError> {
    if fan_in == 0 {
        return Err(QuillError::ValueOutOfRange {
            name: "fan_in".to_string(),
            value: fan_in.to_string(),
            constraint: "a positive count".to_string(),
        });
    }
    let bound = 1.0 / (fan_in as f32).sqrt();
    tensor::rand_uniform(shape, -bound, bound, rng)
}

// --- Tests ---
#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
