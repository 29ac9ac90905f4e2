//! Optimizers for training neural networks.
//!
//! An optimizer holds handles to trainable leaves and updates their values in
//! place from the gradients left by a backward pass.

pub mod optimizer_trait;
pub mod sgd;

pub use optimizer_trait::Optimizer;
pub use sgd::{Sgd, SgdConfig};
