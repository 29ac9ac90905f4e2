use ndarray::{ArrayD, Axis, IxDyn};
use std::cmp::max;

use crate::error::QuillError;

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
/// 4. The resulting dimension is the larger of the two.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, QuillError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(QuillError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Sums a broadcast gradient back down to `target_shape`.
///
/// Leading axes the target does not have are summed away; axes where the target
/// has size 1 but the gradient does not are summed with the axis kept.
pub fn reduce_to_shape(grad: &ArrayD<f32>, target_shape: &[usize]) -> Result<ArrayD<f32>, QuillError> {
    if grad.shape() == target_shape {
        return Ok(grad.clone());
    }
    let rank = grad.ndim();
    if target_shape.len() > rank {
        return Err(QuillError::BroadcastError {
            shape1: grad.shape().to_vec(),
            shape2: target_shape.to_vec(),
        });
    }

    let mut reduced = grad.clone();
    for _ in 0..(rank - target_shape.len()) {
        reduced = reduced.sum_axis(Axis(0));
    }
    for (axis, &dim) in target_shape.iter().enumerate() {
        if dim == 1 && reduced.shape()[axis] != 1 {
            reduced = reduced.sum_axis(Axis(axis)).insert_axis(Axis(axis));
        }
    }

    if reduced.shape() != target_shape {
        return Err(QuillError::BroadcastError {
            shape1: grad.shape().to_vec(),
            shape2: target_shape.to_vec(),
        });
    }
    Ok(reduced)
}

/// Resolves a possibly negative axis against `rank`.
///
/// `-1` is the last axis. Operations that insert an axis pass `rank + 1`.
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize, QuillError> {
    let signed_rank = rank as isize;
    let normalized = if axis < 0 { axis + signed_rank } else { axis };
    if normalized < 0 || normalized >= signed_rank {
        return Err(QuillError::InvalidAxis { axis, rank });
    }
    Ok(normalized as usize)
}

/// Copies `array` into a standard-layout array of `shape`, reading it in logical
/// row-major order regardless of its memory layout.
pub fn reshape_array(array: &ArrayD<f32>, shape: &[usize]) -> Result<ArrayD<f32>, QuillError> {
    let numel: usize = shape.iter().product();
    if numel != array.len() {
        return Err(QuillError::ShapeMismatch {
            expected: array.shape().to_vec(),
            actual: shape.to_vec(),
            operation: "reshape".to_string(),
        });
    }
    Ok(ArrayD::from_shape_vec(IxDyn(shape), array.iter().copied().collect())?)
}
