// quill-core/src/ops/view/mod.rs

pub mod reshape;
pub mod squeeze_unsqueeze;

pub use reshape::{flatten_op, reshape_op};
pub use squeeze_unsqueeze::{expand_dims_op, squeeze_op};
