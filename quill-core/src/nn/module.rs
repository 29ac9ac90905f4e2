use std::fmt;

use crate::error::QuillError;
use crate::nn::parameter::Parameters;
use crate::tensor::Tensor;

/// The base trait for all neural network modules (layers and containers).
///
/// A module only composes primitive operations; it owns its trainable leaves
/// and exposes them through [`Module::parameters`].
///
/// There is no train/eval mode: every layer computes the same way in both. The
/// `Debug` supertrait is the module's printable description.
pub trait Module: fmt::Debug {
    /// Performs a forward pass, building graph nodes on top of `input`.
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError>;

    /// The module's trainable leaves, nested by sub-module.
    ///
    /// Modules without parameters keep the default empty tree.
    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    /// Dotted names and handles of every unique trainable leaf.
    fn named_parameters(&self) -> Vec<(String, Tensor)> {
        self.parameters().named_leaves()
    }
}
