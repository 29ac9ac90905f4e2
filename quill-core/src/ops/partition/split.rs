//! `split` and `unstack`: one input, several children.
//!
//! Every child carries a `partition_index` and shares the parent. Its backward
//! rule adds the child's gradient into the matching region of the parent's
//! gradient only; the other regions are left untouched.

use ndarray::{ArrayD, ArrayViewMutD, Axis, Slice};

use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor::utils::normalize_axis;
use crate::tensor::Tensor;

/// Splits `input` into `sections` equal parts along `axis`.
///
/// Child `i` covers `[i * len / sections, (i + 1) * len / sections)`.
///
/// # Errors
/// - `ValueOutOfRange` if `sections` is zero.
/// - `UnevenSplit` if the axis length is not a multiple of `sections`.
pub fn split_op(input: &Tensor, sections: usize, axis: isize) -> Result<Vec<Tensor>, QuillError> {
    if sections == 0 {
        return Err(QuillError::ValueOutOfRange {
            name: "sections".to_string(),
            value: sections.to_string(),
            constraint: "a positive count".to_string(),
        });
    }
    let guard = input.read_data();
    let axis = normalize_axis(axis, guard.value.ndim())?;
    let len = guard.shape()[axis];
    if len % sections != 0 {
        return Err(QuillError::UnevenSplit { len, sections });
    }
    let extent = len / sections;

    let grad_fn = BackwardOp::Split {
        input: input.clone(),
        axis,
        sections,
    };
    let children = (0..sections)
        .map(|i| {
            let start = i * extent;
            let value = guard
                .value
                .slice_axis(Axis(axis), Slice::from(start..start + extent))
                .to_owned();
            Tensor::from_partition(value, grad_fn.clone(), i)
        })
        .collect();
    Ok(children)
}

/// Splits `input` into its slices along `axis`, removing that axis.
pub fn unstack_op(input: &Tensor, axis: isize) -> Result<Vec<Tensor>, QuillError> {
    let guard = input.read_data();
    let axis = normalize_axis(axis, guard.value.ndim())?;
    let grad_fn = BackwardOp::Unstack {
        input: input.clone(),
        axis,
    };
    let children = guard
        .value
        .axis_iter(Axis(axis))
        .enumerate()
        .map(|(i, slice)| Tensor::from_partition(slice.to_owned(), grad_fn.clone(), i))
        .collect();
    Ok(children)
}

fn require_index(partition_index: Option<usize>, op: &str) -> Result<usize, QuillError> {
    partition_index.ok_or_else(|| QuillError::BackwardInvariantViolation {
        node: op.to_string(),
        detail: "partition child without a partition index".to_string(),
    })
}

fn add_into(mut region: ArrayViewMutD<'_, f32>, grad: &ArrayD<f32>) -> Result<(), QuillError> {
    if region.shape() != grad.shape() {
        return Err(QuillError::GradientShapeMismatch {
            expected: region.shape().to_vec(),
            actual: grad.shape().to_vec(),
        });
    }
    region += grad;
    Ok(())
}

pub(crate) fn split_backward(
    input: &Tensor,
    axis: usize,
    sections: usize,
    partition_index: Option<usize>,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let index = require_index(partition_index, "split")?;
    let mut parent_grad = input.grad_mut();
    let len = parent_grad.shape()[axis];
    let extent = len / sections;
    let start = index * extent;
    if index >= sections || start + extent > len {
        return Err(QuillError::PartitionIndexOutOfBounds { index, extent, len });
    }
    add_into(
        parent_grad.slice_axis_mut(Axis(axis), Slice::from(start..start + extent)),
        grad,
    )
}

pub(crate) fn unstack_backward(
    input: &Tensor,
    axis: usize,
    partition_index: Option<usize>,
    grad: &ArrayD<f32>,
) -> Result<(), QuillError> {
    let index = require_index(partition_index, "unstack")?;
    let mut parent_grad = input.grad_mut();
    let len = parent_grad.shape()[axis];
    if index >= len {
        return Err(QuillError::PartitionIndexOutOfBounds {
            index,
            extent: 1,
            len,
        });
    }
    add_into(parent_grad.index_axis_mut(Axis(axis), index), grad)
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
