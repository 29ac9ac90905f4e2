use ndarray::ArrayD;
use std::cell::RefMut;

use crate::autograd::graph;
use crate::error::QuillError;
use crate::tensor::Tensor;

impl Tensor {
    /// Performs the backward pass starting from this tensor.
    ///
    /// The tensor is treated as the loss: its gradient is seeded with ones of its own
    /// shape (a multi-element root behaves like the sum of its elements), then every
    /// node reachable through the graph receives its share of the gradient.
    ///
    /// Gradients accumulate: calling `backward` twice without `zero_grad` in between
    /// adds the contributions twice.
    ///
    /// # Errors
    /// Returns `QuillError` if a backward rule fails (shape problems, a partition index
    /// out of range) or if the scheduler detects a broken consumer count.
    pub fn backward(&self) -> Result<(), QuillError> {
        let seed = ArrayD::ones(self.read_data().value.raw_dim());
        self.backward_with_grad(seed)
    }

    /// Performs the backward pass with an explicit seed gradient.
    ///
    /// # Errors
    /// Returns `QuillError::GradientShapeMismatch` if `seed` does not have this tensor's shape.
    pub fn backward_with_grad(&self, seed: ArrayD<f32>) -> Result<(), QuillError> {
        self.accumulate_grad(&seed)?;
        if self.is_leaf() {
            log::warn!("backward() called on a leaf tensor: only its own gradient is seeded");
        }
        graph::run_backward(self).map(|_| ())
    }

    /// Resets the gradient accumulator to zeros.
    pub fn zero_grad(&self) {
        self.write_data().grad.fill(0.0);
    }

    /// Adds `contribution` into this node's gradient.
    ///
    /// # Errors
    /// Returns `QuillError::GradientShapeMismatch` when shapes differ, leaving the
    /// gradient untouched.
    pub(crate) fn accumulate_grad(&self, contribution: &ArrayD<f32>) -> Result<(), QuillError> {
        let mut guard = self.write_data();
        if guard.grad.shape() != contribution.shape() {
            return Err(QuillError::GradientShapeMismatch {
                expected: guard.grad.shape().to_vec(),
                actual: contribution.shape().to_vec(),
            });
        }
        guard.grad += contribution;
        Ok(())
    }

    /// Mutable access to the gradient buffer, for rules that scatter into a region.
    pub(crate) fn grad_mut(&self) -> RefMut<'_, ArrayD<f32>> {
        RefMut::map(self.write_data(), |data| &mut data.grad)
    }
}
