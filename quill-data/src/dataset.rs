use quill_core::{QuillError, Tensor};

/// Trait representing a dataset.
///
/// A dataset provides access to individual examples via an index. An example is
/// one tensor per column (e.g. `[features, target]`).
pub trait Dataset {
    /// Returns the example at `index`.
    ///
    /// # Errors
    /// `QuillError::IndexOutOfBounds` when `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Vec<Tensor>, QuillError>;

    /// Returns the total number of examples in the dataset.
    fn len(&self) -> usize;

    /// Returns true if the dataset contains no examples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
