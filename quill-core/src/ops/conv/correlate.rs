//! Batched multi-channel 2-D cross-correlation, the building block of the
//! convolution forward pass and of both of its gradients.

use ndarray::{s, Array4, ArrayView4, Zip};

use crate::error::QuillError;
use crate::ops::window::{output_size, Size2};

/// Copies `input` into the centre of a zero array grown by `padding` on every side.
pub(crate) fn zero_pad(input: ArrayView4<'_, f32>, padding: Size2) -> Array4<f32> {
    let (batches, channels, height, width) = input.dim();
    let mut padded = Array4::<f32>::zeros((
        batches,
        channels,
        height + 2 * padding.height,
        width + 2 * padding.width,
    ));
    padded
        .slice_mut(s![
            ..,
            ..,
            padding.height..padding.height + height,
            padding.width..padding.width + width
        ])
        .assign(&input);
    padded
}

/// Inserts `stride - 1` zeros between neighbouring cells of the two spatial axes.
pub(crate) fn dilate(input: ArrayView4<'_, f32>, stride: Size2) -> Array4<f32> {
    let (batches, channels, height, width) = input.dim();
    let mut dilated = Array4::<f32>::zeros((
        batches,
        channels,
        (height - 1) * stride.height + 1,
        (width - 1) * stride.width + 1,
    ));
    dilated
        .slice_mut(s![
            ..,
            ..,
            ..;stride.height as isize,
            ..;stride.width as isize
        ])
        .assign(&input);
    dilated
}

/// `out[n, o, i, j] = sum_{c, a, b} pad(input)[n, c, i*sh + a, j*sw + b] * kernel[o, c, a, b]`.
///
/// `input` is `(B, C, H, W)` and `kernel` is `(O, C, kh, kw)`; channel counts must
/// already agree.
pub(crate) fn cross_correlate(
    input: ArrayView4<'_, f32>,
    kernel: ArrayView4<'_, f32>,
    stride: Size2,
    padding: Size2,
) -> Result<Array4<f32>, QuillError> {
    let (batches, _, height, width) = input.dim();
    let (out_channels, _, kh, kw) = kernel.dim();
    let out = output_size(
        Size2::new(height, width),
        Size2::new(kh, kw),
        stride,
        padding,
    )?;
    let padded = zero_pad(input, padding);

    let mut result = Array4::<f32>::zeros((batches, out_channels, out.height, out.width));
    for ((n, o, i, j), cell) in result.indexed_iter_mut() {
        let (r, c) = (i * stride.height, j * stride.width);
        let window = padded.slice(s![n, .., r..r + kh, c..c + kw]);
        let weights = kernel.slice(s![o, .., .., ..]);
        *cell = Zip::from(&window)
            .and(&weights)
            .fold(0.0, |acc, &x, &w| acc + x * w);
    }
    Ok(result)
}
