// quill-core/src/ops/conv/conv2d.rs

use ndarray::{s, Array4, ArrayD, Axis, Ix4};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::ops::conv::correlate::{cross_correlate, dilate, zero_pad};
use crate::ops::window::{output_size, require_spatial_rank, Size2};
use crate::tensor::Tensor;

/// Lifts a `(C, H, W)` array to `(1, C, H, W)`; leaves rank-4 arrays as they are.
fn to_batched(array: &ArrayD<f32>) -> Result<Array4<f32>, QuillError> {
    let batched = if array.ndim() == 3 {
        array.clone().insert_axis(Axis(0))
    } else {
        array.clone()
    };
    Ok(batched.into_dimensionality::<Ix4>()?)
}

/// Drops the batch axis added by [`to_batched`] when the input was rank 3.
fn from_batched(array: Array4<f32>, unbatched: bool) -> ArrayD<f32> {
    let array = array.into_dyn();
    if unbatched {
        array.remove_axis(Axis(0))
    } else {
        array
    }
}

/// 2-D cross-correlation of `input` with `kernel` (no kernel flip, as in most
/// deep-learning libraries).
///
/// * `input`: `(C, H, W)` or `(N, C, H, W)`.
/// * `kernel`: `(O, C, kh, kw)`.
///
/// The result is `(O, oh, ow)` or `(N, O, oh, ow)` with
/// `oh = floor((H + 2 * padding.height - kh) / stride.height) + 1` (same for width).
/// Padding is zero-filled and symmetric.
///
/// # Errors
/// - `RankMismatch` if `input` is not rank 3/4 or `kernel` is not rank 4.
/// - `IncompatibleShapes` if the channel counts differ.
/// - `ValueOutOfRange` for a zero stride or kernel extent, or a kernel larger than the padded input.
pub fn conv2d_op(
    input: &Tensor,
    kernel: &Tensor,
    stride: impl Into<Size2>,
    padding: impl Into<Size2>,
) -> Result<Tensor, QuillError> {
    let (stride, padding) = (stride.into(), padding.into());
    let value = {
        let x_guard = input.read_data();
        let k_guard = kernel.read_data();
        let x_shape = x_guard.shape();
        let k_shape = k_guard.shape();
        require_spatial_rank(x_shape, "conv2d")?;
        if k_shape.len() != 4 {
            return Err(QuillError::RankMismatch {
                operation: "conv2d kernel".to_string(),
                expected: vec![4],
                actual: k_shape.len(),
            });
        }
        let rank = x_shape.len();
        if x_shape[rank - 3] != k_shape[1] {
            return Err(QuillError::IncompatibleShapes {
                shape1: x_shape.to_vec(),
                shape2: k_shape.to_vec(),
                operation: "conv2d".to_string(),
            });
        }
        stride.require_positive("stride")?;
        let kernel_size = Size2::new(k_shape[2], k_shape[3]);
        kernel_size.require_positive("kernel")?;
        output_size(
            Size2::new(x_shape[rank - 2], x_shape[rank - 1]),
            kernel_size,
            stride,
            padding,
        )?;

        let x = to_batched(&x_guard.value)?;
        let k = k_guard.value.view().into_dimensionality::<Ix4>()?;
        let y = cross_correlate(x.view(), k, stride, padding)?;
        from_batched(y, rank == 3)
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::Conv2d {
            input: input.clone(),
            kernel: kernel.clone(),
            stride,
            padding,
        },
    ))
}

/// Input gradient: full correlation of the dilated output gradient with the
/// flipped, channel-transposed kernel, then cropped back to the unpadded input.
fn input_gradient(
    grad: &Array4<f32>,
    kernel: &Array4<f32>,
    input_dim: (usize, usize, usize, usize),
    stride: Size2,
    padding: Size2,
) -> Result<Array4<f32>, QuillError> {
    let (batches, channels, height, width) = input_dim;
    let (_, _, kh, kw) = kernel.dim();
    let dilated = dilate(grad.view(), stride);
    let flipped = kernel.view().permuted_axes([1, 0, 2, 3]);
    let flipped = flipped.slice(s![.., .., ..;-1, ..;-1]);
    let full = cross_correlate(dilated.view(), flipped, Size2::from(1), Size2::new(kh - 1, kw - 1))?;

    // Cells past the last window position (the floor remainder) received nothing.
    let (_, _, reached_h, reached_w) = full.dim();
    let mut padded = Array4::<f32>::zeros((
        batches,
        channels,
        height + 2 * padding.height,
        width + 2 * padding.width,
    ));
    padded
        .slice_mut(s![.., .., ..reached_h, ..reached_w])
        .assign(&full);
    let cropped = padded
        .slice(s![
            ..,
            ..,
            padding.height..padding.height + height,
            padding.width..padding.width + width
        ])
        .to_owned();
    Ok(cropped)
}

/// Kernel gradient: the padded input correlated against the dilated output
/// gradient, batch playing the role of the contracted channel.
fn kernel_gradient(
    grad: &Array4<f32>,
    input: &Array4<f32>,
    kernel_size: Size2,
    stride: Size2,
    padding: Size2,
) -> Result<Array4<f32>, QuillError> {
    let dilated = dilate(grad.view(), stride);
    let xp = zero_pad(input.view(), padding);
    let per_channel = cross_correlate(
        xp.view().permuted_axes([1, 0, 2, 3]),
        dilated.view().permuted_axes([1, 0, 2, 3]),
        Size2::from(1),
        Size2::from(0),
    )?;
    let per_kernel = per_channel.permuted_axes([1, 0, 2, 3]);
    let cropped = per_kernel
        .slice(s![.., .., ..kernel_size.height, ..kernel_size.width])
        .to_owned();
    Ok(cropped)
}

pub(crate) fn conv2d_backward(
    input: &Tensor,
    kernel: &Tensor,
    stride: Size2,
    padding: Size2,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let unbatched = input.ndim() == 3;
    let (grad_input, grad_kernel) = {
        let x_guard = input.read_data();
        let k_guard = kernel.read_data();
        let x = to_batched(&x_guard.value)?;
        let k = k_guard.value.clone().into_dimensionality::<Ix4>()?;
        let g = to_batched(grad)?;
        let (_, _, kh, kw) = k.dim();

        let dx = input_gradient(&g, &k, x.dim(), stride, padding)?;
        let dk = kernel_gradient(&g, &x, Size2::new(kh, kw), stride, padding)?;
        (from_batched(dx, unbatched), dk.into_dyn())
    };
    input.accumulate_grad(&grad_input)?;
    kernel.accumulate_grad(&grad_kernel)
}

#[cfg(test)]
#[path = "conv2d_test.rs"]
mod tests;
