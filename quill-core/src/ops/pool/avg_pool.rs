use ndarray::{s, Array3, ArrayD};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::ops::window::{fold_leading, output_size, require_spatial_rank, unfold_leading, Size2};
use crate::tensor::Tensor;

/// Validated geometry of a pooling call.
pub(crate) struct PoolGeometry {
    pub(crate) leading: Vec<usize>,
    pub(crate) out: Size2,
}

pub(crate) fn pool_geometry(
    shape: &[usize],
    kernel: Size2,
    stride: Size2,
    operation: &str,
) -> Result<PoolGeometry, QuillError> {
    require_spatial_rank(shape, operation)?;
    kernel.require_positive("kernel")?;
    stride.require_positive("stride")?;
    let rank = shape.len();
    let out = output_size(
        Size2::new(shape[rank - 2], shape[rank - 1]),
        kernel,
        stride,
        Size2::from(0),
    )?;
    Ok(PoolGeometry {
        leading: shape[..rank - 2].to_vec(),
        out,
    })
}

/// 2-D average pooling over the last two axes of a `(C, H, W)` or `(N, C, H, W)` input.
///
/// No padding; the output extent per axis is `floor((in - k) / s) + 1`, so trailing
/// cells a window cannot reach are ignored.
///
/// # Errors
/// - `RankMismatch` for inputs that are not rank 3 or 4.
/// - `ValueOutOfRange` for zero kernel/stride entries or a kernel larger than the input.
pub fn avg_pool2d_op(
    input: &Tensor,
    kernel: impl Into<Size2>,
    stride: impl Into<Size2>,
) -> Result<Tensor, QuillError> {
    let (kernel, stride) = (kernel.into(), stride.into());
    let value = {
        let guard = input.read_data();
        let geometry = pool_geometry(guard.shape(), kernel, stride, "avg_pool2d")?;
        let x = fold_leading(&guard.value)?;
        let area = kernel.area() as f32;
        let mut out = Array3::<f32>::zeros((x.dim().0, geometry.out.height, geometry.out.width));
        for ((b, i, j), cell) in out.indexed_iter_mut() {
            let (r, c) = (i * stride.height, j * stride.width);
            *cell = x.slice(s![b, r..r + kernel.height, c..c + kernel.width]).sum() / area;
        }
        unfold_leading(out, &geometry.leading)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::AvgPool2d {
            input: input.clone(),
            kernel,
            stride,
        },
    ))
}

/// Spreads each output gradient evenly over the cells of its window.
pub(crate) fn avg_pool2d_backward(
    input: &Tensor,
    kernel: Size2,
    stride: Size2,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let shape = input.shape();
    let rank = shape.len();
    let g = fold_leading(grad)?;
    let area = kernel.area() as f32;
    let mut dx = Array3::<f32>::zeros((g.dim().0, shape[rank - 2], shape[rank - 1]));
    for ((b, i, j), &cell) in g.indexed_iter() {
        let (r, c) = (i * stride.height, j * stride.width);
        let mut window = dx.slice_mut(s![b, r..r + kernel.height, c..c + kernel.width]);
        window += cell / area;
    }
    input.accumulate_grad(&unfold_leading(dx, &shape[..rank - 2])?)
}

#[cfg(test)]
#[path = "avg_pool_test.rs"]
mod tests;
