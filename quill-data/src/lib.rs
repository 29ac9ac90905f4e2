//! Datasets and batching for Quill.
//!
//! A [`Dataset`] hands out examples as lists of leaf tensors (one per column); a
//! [`DataLoader`] groups them into batches by stacking every column along a new
//! leading axis, so gradients of a batch flow back to the per-example leaves.

pub mod dataloader;
pub mod dataset;
pub mod tensor_dataset;

pub use dataloader::{DataLoader, DataLoaderConfig};
pub use dataset::Dataset;
pub use tensor_dataset::TensorDataset;
