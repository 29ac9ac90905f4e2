use crate::error::QuillError;

/// Trait defining the common interface for all optimizers.
///
/// Optimizers are responsible for updating model parameters based on their gradients.
pub trait Optimizer {
    /// Performs a single optimization step over every managed leaf.
    ///
    /// Gradients are consumed by the step: each one is reset to zero after the
    /// leaf's value has been updated.
    fn step(&mut self) -> Result<(), QuillError>;

    /// Clears the gradients of all parameters managed by the optimizer.
    fn zero_grad(&mut self);

    /// Drops any per-parameter state accumulated by previous steps.
    fn reset_velocity(&mut self);
}
