use thiserror::Error;

/// Custom error type for the Quill framework.
///
/// Validation variants are returned synchronously by the call that violates them,
/// before any graph node is built. `BackwardInvariantViolation` is the only variant
/// raised mid-traversal; once it surfaces the graph's gradient state is undefined
/// and the graph has to be rebuilt.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum QuillError {
    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Cannot build '{operation}' from an empty list of tensors")]
    EmptyTensorList { operation: String },

    #[error("Rank mismatch in '{operation}': expected rank {expected:?}, got {actual}")]
    RankMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Incompatible shapes for operation '{operation}': {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: isize, rank: usize },

    #[error("Parameter '{name}' must have {expected} entries, got {actual}")]
    InvalidParameterLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Value out of range for '{name}': {value} (expected {constraint})")]
    ValueOutOfRange {
        name: String,
        value: String,
        constraint: String,
    },

    #[error("Axis of length {len} cannot be split into {sections} equal sections")]
    UnevenSplit { len: usize, sections: usize },

    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Partition index {index} (extent {extent}) falls outside axis of length {len}")]
    PartitionIndexOutOfBounds {
        index: usize,
        extent: usize,
        len: usize,
    },

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Backward invariant violated at node {node}: {detail}")]
    BackwardInvariantViolation { node: String, detail: String },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
