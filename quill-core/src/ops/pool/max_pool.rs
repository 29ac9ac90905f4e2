use ndarray::{Array3, ArrayD};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::ops::pool::avg_pool::pool_geometry;
use crate::ops::window::{fold_leading, unfold_leading, Size2};
use crate::tensor::Tensor;

/// Position of the largest value in the window starting at `(row, col)` of batch `b`.
///
/// Ties resolve to the first maximum in row-major order.
fn window_argmax(x: &Array3<f32>, b: usize, row: usize, col: usize, kernel: Size2) -> (usize, usize) {
    let mut best = (row, col);
    let mut best_value = x[[b, row, col]];
    for r in row..row + kernel.height {
        for c in col..col + kernel.width {
            if x[[b, r, c]] > best_value {
                best_value = x[[b, r, c]];
                best = (r, c);
            }
        }
    }
    best
}

/// 2-D max pooling over the last two axes of a `(C, H, W)` or `(N, C, H, W)` input.
///
/// Same geometry and errors as [`avg_pool2d_op`](crate::ops::pool::avg_pool2d_op).
pub fn max_pool2d_op(
    input: &Tensor,
    kernel: impl Into<Size2>,
    stride: impl Into<Size2>,
) -> Result<Tensor, QuillError> {
    let (kernel, stride) = (kernel.into(), stride.into());
    let value = {
        let guard = input.read_data();
        let geometry = pool_geometry(guard.shape(), kernel, stride, "max_pool2d")?;
        let x = fold_leading(&guard.value)?;
        let mut out = Array3::<f32>::zeros((x.dim().0, geometry.out.height, geometry.out.width));
        for ((b, i, j), cell) in out.indexed_iter_mut() {
            let (r, c) = window_argmax(&x, b, i * stride.height, j * stride.width, kernel);
            *cell = x[[b, r, c]];
        }
        unfold_leading(out, &geometry.leading)?
    };
    Ok(Tensor::from_op(
        value,
        BackwardOp::MaxPool2d {
            input: input.clone(),
            kernel,
            stride,
        },
    ))
}

/// Routes each output gradient to the argmax of its window.
pub(crate) fn max_pool2d_backward(
    input: &Tensor,
    kernel: Size2,
    stride: Size2,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let (dx, leading) = {
        let guard = input.read_data();
        let x = fold_leading(&guard.value)?;
        let g = fold_leading(grad)?;
        let mut dx = Array3::<f32>::zeros(x.raw_dim());
        for ((b, i, j), &cell) in g.indexed_iter() {
            let (r, c) = window_argmax(&x, b, i * stride.height, j * stride.width, kernel);
            dx[[b, r, c]] += cell;
        }
        let rank = guard.value.ndim();
        (dx, guard.shape()[..rank - 2].to_vec())
    };
    input.accumulate_grad(&unfold_leading(dx, &leading)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_check::check_grad;
    use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, seeded_distinct, seeded_output_grad};

    #[test]
    fn test_max_pool_forward_and_backward() -> Result<(), QuillError> {
        let x = create_test_tensor(
            vec![
                1.0, 3.0, 2.0, 0.0, //
                4.0, 2.0, 1.0, 5.0, //
                0.0, 1.0, 7.0, 2.0, //
                6.0, 2.0, 3.0, 1.0,
            ],
            vec![1, 4, 4],
        );
        let y = max_pool2d_op(&x, 2, 2)?;
        check_tensor_near(&y, &[1, 2, 2], &[4.0, 5.0, 6.0, 7.0], 1e-6);
        y.backward()?;
        check_grad_near(
            &x,
            &[1, 4, 4],
            &[
                0.0, 0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ],
            1e-6,
        );
        Ok(())
    }

    #[test]
    fn test_max_pool_ties_pick_first_in_row_major_order() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![2.0, 2.0, 2.0, 2.0], vec![1, 2, 2]);
        let y = max_pool2d_op(&x, 2, 2)?;
        y.backward()?;
        check_grad_near(&x, &[1, 2, 2], &[1.0, 0.0, 0.0, 0.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_max_pool_overlapping_windows_accumulate() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![0.0, 0.0, 0.0, 0.0, 9.0, 0.0, 0.0, 0.0, 0.0], vec![1, 3, 3]);
        let y = max_pool2d_op(&x, 2, 1)?;
        check_tensor_near(&y, &[1, 2, 2], &[9.0; 4], 1e-6);
        y.backward()?;
        check_grad_near(&x, &[1, 3, 3], &[0.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0], 1e-6);
        Ok(())
    }

    #[test]
    fn test_max_pool_batched_shape() -> Result<(), QuillError> {
        let x = seeded_distinct(&[2, 3, 5, 5], 0.01, 131);
        assert_eq!(max_pool2d_op(&x, 2, 2)?.shape(), vec![2, 3, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_max_pool_grad_check() {
        // Distinct values spaced well beyond epsilon keep the argmax stable.
        let x = seeded_distinct(&[2, 4, 4], 0.05, 132);
        let output_grad = seeded_output_grad(&[2, 2, 2], 133);
        let result = check_grad(|inputs| max_pool2d_op(&inputs[0], 2, 2), &[x], &output_grad, 1e-3, 1e-2);
        assert!(result.is_ok(), "{:?}", result);
    }
}
