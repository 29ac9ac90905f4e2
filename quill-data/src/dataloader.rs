//! # DataLoader
//!
//! Groups the examples of a [`Dataset`] into batches. Every column of a batch is
//! built with `stack_op` along a new axis 0, so the batch tensors are graph nodes
//! whose gradients flow back to the dataset's per-example leaves.
//!
//! ```rust
//! use quill_core::Tensor;
//! use quill_data::{DataLoader, DataLoaderConfig, TensorDataset};
//!
//! let xs = Tensor::new((0..12).map(|v| v as f32).collect(), vec![6, 2]).unwrap();
//! let dataset = TensorDataset::from_stacked(&[xs]).unwrap();
//! let config = DataLoaderConfig { batch_size: 4, ..DataLoaderConfig::default() };
//! let loader = DataLoader::new(dataset, config).unwrap();
//! for batch in loader.iter() {
//!     let batch = batch.unwrap();
//!     println!("batch of shape {:?}", batch[0].shape());
//! }
//! ```

use quill_core::ops::stack_op;
use quill_core::{QuillError, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::RefCell;

use crate::dataset::Dataset;

/// Batching options for a [`DataLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoaderConfig {
    /// Examples per batch. Must be positive.
    pub batch_size: usize,
    /// Shuffle the example order at the start of every epoch.
    pub shuffle: bool,
    /// Skip a trailing batch smaller than `batch_size`.
    pub drop_last: bool,
    /// Seed of the shuffling generator; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        DataLoaderConfig {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }
}

/// Batching front end over a dataset.
pub struct DataLoader<D: Dataset> {
    dataset: D,
    config: DataLoaderConfig,
    rng: RefCell<StdRng>,
}

impl<D: Dataset> DataLoader<D> {
    /// # Errors
    /// `ValueOutOfRange` when `batch_size` is zero.
    pub fn new(dataset: D, config: DataLoaderConfig) -> Result<Self, QuillError> {
        if config.batch_size == 0 {
            return Err(QuillError::ValueOutOfRange {
                name: "batch_size".to_string(),
                value: config.batch_size.to_string(),
                constraint: "a positive count".to_string(),
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(DataLoader {
            dataset,
            config,
            rng: RefCell::new(rng),
        })
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> DataLoaderConfig {
        self.config
    }

    /// Number of batches one epoch yields.
    pub fn num_batches(&self) -> usize {
        let len = self.dataset.len();
        if self.config.drop_last {
            len / self.config.batch_size
        } else {
            (len + self.config.batch_size - 1) / self.config.batch_size
        }
    }

    /// Starts an epoch. With shuffling on, each call draws a new order.
    pub fn iter(&self) -> Batches<'_, D> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.config.shuffle {
            order.shuffle(&mut *self.rng.borrow_mut());
        }
        log::debug!(
            "dataloader: epoch over {} examples in {} batches",
            order.len(),
            self.num_batches()
        );
        Batches {
            loader: self,
            order,
            cursor: 0,
        }
    }

    /// Collects one whole epoch.
    pub fn batches(&self) -> Result<Vec<Vec<Tensor>>, QuillError> {
        self.iter().collect()
    }
}

/// Iterator over the batches of one epoch.
pub struct Batches<'a, D: Dataset> {
    loader: &'a DataLoader<D>,
    order: Vec<usize>,
    cursor: usize,
}

impl<D: Dataset> Batches<'_, D> {
    fn collate(&self, indices: &[usize]) -> Result<Vec<Tensor>, QuillError> {
        let mut columns: Vec<Vec<Tensor>> = Vec::new();
        for &index in indices {
            let example = self.loader.dataset.get(index)?;
            if columns.is_empty() {
                columns = vec![Vec::with_capacity(indices.len()); example.len()];
            } else if example.len() != columns.len() {
                return Err(QuillError::InvalidParameterLength {
                    name: format!("columns of example {}", index),
                    expected: columns.len(),
                    actual: example.len(),
                });
            }
            for (column, tensor) in columns.iter_mut().zip(example) {
                column.push(tensor);
            }
        }
        columns.iter().map(|column| stack_op(column, 0)).collect()
    }
}

impl<D: Dataset> Iterator for Batches<'_, D> {
    type Item = Result<Vec<Tensor>, QuillError>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch_size = self.loader.config.batch_size;
        let remaining = self.order.len() - self.cursor;
        if remaining == 0 || (self.loader.config.drop_last && remaining < batch_size) {
            return None;
        }
        let end = self.cursor + remaining.min(batch_size);
        let indices = self.order[self.cursor..end].to_vec();
        self.cursor = end;
        Some(self.collate(&indices))
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
