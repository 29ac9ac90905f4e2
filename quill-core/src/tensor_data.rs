// src/tensor_data.rs
use ndarray::ArrayD;
use std::fmt::Debug;

use crate::autograd::BackwardOp;

/// Internal storage of a graph node.
///
/// Holds the forward value, the gradient accumulator and the autograd metadata.
/// It is wrapped in `Rc<RefCell<TensorData>>` by [`Tensor`](crate::Tensor) so that one
/// node can be shared by every child that consumes it.
#[derive(Debug)]
pub struct TensorData {
    /// The array produced by the forward computation (or supplied for a leaf).
    pub(crate) value: ArrayD<f32>,
    /// Gradient accumulator. Always has the same shape as `value`.
    pub(crate) grad: ArrayD<f32>,
    /// The backward rule of the operation that produced this node, carrying its
    /// parent handles. Leaf tensors have `grad_fn = None`.
    pub(crate) grad_fn: Option<BackwardOp>,
    /// Which slice of the parent this node represents. Only set by partitioning
    /// operations (`split_op`, `unstack_op`).
    pub(crate) partition_index: Option<usize>,
}

impl TensorData {
    /// Creates leaf storage with a zero gradient of the value's shape.
    pub fn new(value: ArrayD<f32>) -> Self {
        let grad = ArrayD::zeros(value.raw_dim());
        TensorData {
            value,
            grad,
            grad_fn: None,
            partition_index: None,
        }
    }

    /// Creates storage for a node produced by an operation.
    pub(crate) fn from_op(
        value: ArrayD<f32>,
        grad_fn: BackwardOp,
        partition_index: Option<usize>,
    ) -> Self {
        let grad = ArrayD::zeros(value.raw_dim());
        TensorData {
            value,
            grad,
            grad_fn: Some(grad_fn),
            partition_index,
        }
    }

    /// The shape of the stored value.
    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    /// Read access to the forward value.
    pub fn value(&self) -> &ArrayD<f32> {
        &self.value
    }

    /// Read access to the accumulated gradient.
    pub fn grad(&self) -> &ArrayD<f32> {
        &self.grad
    }

    pub fn grad_fn(&self) -> Option<&BackwardOp> {
        self.grad_fn.as_ref()
    }

    pub fn partition_index(&self) -> Option<usize> {
        self.partition_index
    }

    pub fn is_leaf(&self) -> bool {
        self.grad_fn.is_none()
    }
}
