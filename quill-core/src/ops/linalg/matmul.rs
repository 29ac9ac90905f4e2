// quill-core/src/ops/linalg/matmul.rs

use ndarray::{Array3, ArrayD, Axis, IxDyn};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::{broadcast_shapes, reduce_to_shape};
use crate::tensor::Tensor;

/// Batched matrix product over the trailing two axes.
///
/// `a` has shape `(..., n, k)` and `b` has shape `(..., k, m)`; the leading (batch)
/// axes broadcast against each other and the result has shape `(batch..., n, m)`.
///
/// # Errors
/// - `RankMismatch` if either operand has rank below 2.
/// - `IncompatibleShapes` if the contracted dimensions differ.
/// - `BroadcastError` if the batch axes cannot be broadcast.
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, QuillError> {
    let value = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        batched_matmul(&a_guard.value, &b_guard.value)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Matmul {
            a: a.clone(),
            b: b.clone(),
        },
    ))
}

pub(crate) fn batched_matmul(a: &ArrayD<f32>, b: &ArrayD<f32>) -> Result<ArrayD<f32>, QuillError> {
    for operand in [a, b] {
        if operand.ndim() < 2 {
            return Err(QuillError::RankMismatch {
                operation: "matmul".to_string(),
                expected: vec![2],
                actual: operand.ndim(),
            });
        }
    }
    let (a_rank, b_rank) = (a.ndim(), b.ndim());
    let (n, k) = (a.shape()[a_rank - 2], a.shape()[a_rank - 1]);
    let (k_b, m) = (b.shape()[b_rank - 2], b.shape()[b_rank - 1]);
    if k != k_b {
        return Err(QuillError::IncompatibleShapes {
            shape1: a.shape().to_vec(),
            shape2: b.shape().to_vec(),
            operation: "matmul".to_string(),
        });
    }

    let batch = broadcast_shapes(&a.shape()[..a_rank - 2], &b.shape()[..b_rank - 2])?;
    let batch_count: usize = batch.iter().product();
    let a3 = broadcast_to_batches(a, &batch, batch_count, n, k)?;
    let b3 = broadcast_to_batches(b, &batch, batch_count, k, m)?;

    let mut out = Array3::<f32>::zeros((batch_count, n, m));
    for (i, mut out_mat) in out.axis_iter_mut(Axis(0)).enumerate() {
        out_mat.assign(&a3.index_axis(Axis(0), i).dot(&b3.index_axis(Axis(0), i)));
    }

    let mut out_shape = batch;
    out_shape.extend([n, m]);
    Ok(out.into_shape(IxDyn(&out_shape))?)
}

/// Broadcasts the batch axes of `x` to `batch` and flattens them into one axis.
fn broadcast_to_batches(
    x: &ArrayD<f32>,
    batch: &[usize],
    batch_count: usize,
    rows: usize,
    cols: usize,
) -> Result<Array3<f32>, QuillError> {
    let mut full_shape = batch.to_vec();
    full_shape.extend([rows, cols]);
    let view = x
        .broadcast(IxDyn(&full_shape))
        .ok_or_else(|| QuillError::BroadcastError {
            shape1: x.shape().to_vec(),
            shape2: full_shape.clone(),
        })?;
    Ok(Array3::from_shape_vec(
        (batch_count, rows, cols),
        view.iter().copied().collect(),
    )?)
}

fn transpose_last_two(x: &ArrayD<f32>) -> ArrayD<f32> {
    let rank = x.ndim();
    let mut view = x.view();
    view.swap_axes(rank - 2, rank - 1);
    view.to_owned()
}

/// `da += g · bᵀ`, `db += aᵀ · g`, each summed over broadcast batch axes.
pub(crate) fn matmul_backward(a: &Tensor, b: &Tensor, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    let (grad_a, grad_b) = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        let grad_a = batched_matmul(grad, &transpose_last_two(&b_guard.value))?;
        let grad_b = batched_matmul(&transpose_last_two(&a_guard.value), grad)?;
        (
            reduce_to_shape(&grad_a, a_guard.shape())?,
            reduce_to_shape(&grad_b, b_guard.shape())?,
        )
    };
    a.accumulate_grad(&grad_a)?;
    b.accumulate_grad(&grad_b)
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
