use ndarray::Axis;
use quill_core::{QuillError, Tensor};

use crate::dataset::Dataset;

/// An in-memory dataset made of columns of per-example leaves.
///
/// `columns[c][i]` is column `c` of example `i`. Every column holds the same
/// number of examples, and within a column all examples share one shape so that
/// they can be stacked into a batch.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    columns: Vec<Vec<Tensor>>,
    length: usize,
}

impl TensorDataset {
    /// Creates a dataset from per-example columns.
    ///
    /// An empty list of columns gives an empty dataset.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the columns differ in length.
    /// * `IncompatibleShapes` if two examples of one column differ in shape.
    pub fn new(columns: Vec<Vec<Tensor>>) -> Result<Self, QuillError> {
        let length = columns.first().map_or(0, Vec::len);
        for column in &columns {
            if column.len() != length {
                return Err(QuillError::ShapeMismatch {
                    expected: vec![length],
                    actual: vec![column.len()],
                    operation: "TensorDataset::new".to_string(),
                });
            }
            if let Some(first) = column.first() {
                let shape = first.shape();
                if let Some(other) = column.iter().find(|t| t.shape() != shape) {
                    return Err(QuillError::IncompatibleShapes {
                        shape1: shape,
                        shape2: other.shape(),
                        operation: "TensorDataset::new".to_string(),
                    });
                }
            }
        }
        Ok(TensorDataset { columns, length })
    }

    /// Creates a dataset by cutting each tensor along its first axis.
    ///
    /// Each example is a fresh leaf holding a copy of one row.
    ///
    /// # Errors
    /// * `RankMismatch` if a tensor is a scalar.
    /// * `ShapeMismatch` if the first dimensions differ.
    pub fn from_stacked(tensors: &[Tensor]) -> Result<Self, QuillError> {
        let mut columns = Vec::with_capacity(tensors.len());
        for tensor in tensors {
            if tensor.ndim() == 0 {
                return Err(QuillError::RankMismatch {
                    operation: "TensorDataset::from_stacked".to_string(),
                    expected: vec![1],
                    actual: 0,
                });
            }
            let value = tensor.value();
            let rows: Vec<Tensor> = value
                .axis_iter(Axis(0))
                .map(|row| Tensor::from_array(row.to_owned()))
                .collect();
            columns.push(rows);
        }
        Self::new(columns)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// All examples of column `c`.
    pub fn column(&self, c: usize) -> Option<&[Tensor]> {
        self.columns.get(c).map(Vec::as_slice)
    }
}

impl Dataset for TensorDataset {
    fn get(&self, index: usize) -> Result<Vec<Tensor>, QuillError> {
        if index >= self.length {
            return Err(QuillError::IndexOutOfBounds {
                index,
                len: self.length,
            });
        }
        Ok(self.columns.iter().map(|column| column[index].clone()).collect())
    }

    fn len(&self) -> usize {
        self.length
    }
}

#[cfg(test)]
#[path = "tensor_dataset_test.rs"]
mod tests;
