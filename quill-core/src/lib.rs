//! # quill-core
//!
//! Reverse-mode automatic differentiation over `ndarray` values.
//!
//! A forward pass builds a graph of [`Tensor`] nodes by calling the primitives in
//! [`ops`]; [`Tensor::backward`] then runs one scheduled traversal that adds every
//! node's gradient into its parents exactly once. [`nn`] and [`optim`] build small
//! trainable models on top of those primitives.

pub mod autograd;
pub mod error;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use error::QuillError;
pub use ops::Size2;
pub use tensor::Tensor;
