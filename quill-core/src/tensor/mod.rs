// src/tensor/mod.rs

use ndarray::{ArrayD, IxDyn};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::QuillError;
use crate::tensor_data::TensorData;

mod autograd_methods;
pub mod create;
mod op_methods;
pub mod utils;


// Re-export creation functions to make them public
pub use create::{full, ones, ones_like, rand_uniform, randn, zeros, zeros_like};

/// A node of the computation graph.
///
/// `Tensor` is a cheap handle around `Rc<RefCell<TensorData>>`:
/// 1.  **Shared Ownership:** a node consumed by several operations (fan-out) is
///     referenced by each child's backward rule and stays alive as long as any
///     child or external handle does.
/// 2.  **Interior Mutability:** the gradient accumulator (and, for the optimizer,
///     the value) can be updated through a shared handle.
///
/// Cloning a `Tensor` clones the handle, not the data.
#[derive(Clone)]
pub struct Tensor {
    pub(crate) data: Rc<RefCell<TensorData>>,
}

impl Tensor {
    /// Creates a new leaf tensor from flat row-major data and a shape.
    ///
    /// # Errors
    /// Returns `QuillError::TensorCreationError` if the length of `data_vec` does not match
    /// the number of elements described by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, QuillError> {
        let numel: usize = shape.iter().product();
        let data_len = data_vec.len();
        if data_len != numel {
            return Err(QuillError::TensorCreationError { data_len, shape });
        }
        let value = ArrayD::from_shape_vec(IxDyn(&shape), data_vec)?;
        Ok(Self::from_array(value))
    }

    /// Wraps an existing array as a leaf tensor.
    pub fn from_array(value: ArrayD<f32>) -> Self {
        Tensor {
            data: Rc::new(RefCell::new(TensorData::new(value))),
        }
    }

    /// Creates a 0-dimensional leaf tensor.
    pub fn scalar(value: f32) -> Self {
        Self::from_array(ArrayD::from_elem(IxDyn(&[]), value))
    }

    /// Creates the output node of an operation.
    pub(crate) fn from_op(value: ArrayD<f32>, grad_fn: BackwardOp) -> Self {
        Tensor {
            data: Rc::new(RefCell::new(TensorData::from_op(value, grad_fn, None))),
        }
    }

    /// Creates one child of a partitioning operation, tagged with its slice index.
    pub(crate) fn from_partition(value: ArrayD<f32>, grad_fn: BackwardOp, index: usize) -> Self {
        Tensor {
            data: Rc::new(RefCell::new(TensorData::from_op(value, grad_fn, Some(index)))),
        }
    }

    // --- Accessors ---

    /// Borrows the node's storage immutably.
    ///
    /// Panics if the node is currently mutably borrowed, which only happens inside
    /// gradient accumulation.
    pub fn read_data(&self) -> Ref<'_, TensorData> {
        self.data.borrow()
    }

    pub(crate) fn write_data(&self) -> RefMut<'_, TensorData> {
        self.data.borrow_mut()
    }

    /// Identity of the node, stable for as long as any handle to it is alive.
    pub fn node_id(&self) -> NodeId {
        Rc::as_ptr(&self.data)
    }

    /// Returns `true` if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Tensor) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().value.shape().to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.read_data().value.ndim()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().value.len()
    }

    /// Returns a copy of the forward value.
    pub fn value(&self) -> ArrayD<f32> {
        self.read_data().value.clone()
    }

    /// Returns a copy of the accumulated gradient.
    pub fn grad(&self) -> ArrayD<f32> {
        self.read_data().grad.clone()
    }

    /// The forward value as a flat row-major `Vec`.
    pub fn to_vec(&self) -> Vec<f32> {
        self.read_data().value.iter().copied().collect()
    }

    /// The gradient as a flat row-major `Vec`.
    pub fn grad_vec(&self) -> Vec<f32> {
        self.read_data().grad.iter().copied().collect()
    }

    /// Extracts the single value of a one-element tensor.
    pub fn item(&self) -> Result<f32, QuillError> {
        let guard = self.read_data();
        if guard.value.len() != 1 {
            return Err(QuillError::ShapeMismatch {
                expected: vec![1],
                actual: guard.value.shape().to_vec(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.value.iter().copied().next().unwrap_or_default())
    }

    /// Leaves have no backward rule; their gradient is only ever accumulated into.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    pub fn partition_index(&self) -> Option<usize> {
        self.read_data().partition_index
    }

    /// Name of the operation that produced this node, if any.
    pub fn op_name(&self) -> Option<&'static str> {
        self.read_data().grad_fn.as_ref().map(BackwardOp::name)
    }

    /// The nodes this one was derived from, in operand order.
    pub fn parents(&self) -> Vec<Tensor> {
        match self.read_data().grad_fn.as_ref() {
            Some(op) => op.inputs().into_iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Replaces the forward value in place, keeping the gradient.
    ///
    /// Used by optimizers between training steps.
    pub fn set_value(&self, value: ArrayD<f32>) -> Result<(), QuillError> {
        let mut guard = self.write_data();
        if guard.value.shape() != value.shape() {
            return Err(QuillError::ShapeMismatch {
                expected: guard.value.shape().to_vec(),
                actual: value.shape().to_vec(),
                operation: "set_value".to_string(),
            });
        }
        guard.value = value;
        Ok(())
    }

    /// Returns a new leaf holding a copy of this tensor's value.
    pub fn detach(&self) -> Tensor {
        Tensor::from_array(self.value())
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.try_borrow() {
            Ok(guard) => f
                .debug_struct("Tensor")
                .field("shape", &guard.value.shape())
                .field("grad_fn", &guard.grad_fn.as_ref().map(BackwardOp::name))
                .field("partition_index", &guard.partition_index)
                .finish(),
            Err(_) => f.write_str("Tensor(<borrowed>)"),
        }
    }
}
