use super::*;
use crate::tensor_dataset::TensorDataset;
use quill_core::ops::{mul_op, sum_op};

fn dataset(n: usize) -> TensorDataset {
    let xs = Tensor::new((0..n * 2).map(|v| v as f32).collect(), vec![n, 2]).unwrap();
    let ys = Tensor::new((0..n).map(|v| v as f32).collect(), vec![n]).unwrap();
    TensorDataset::from_stacked(&[xs, ys]).unwrap()
}

fn config(batch_size: usize) -> DataLoaderConfig {
    DataLoaderConfig {
        batch_size,
        ..DataLoaderConfig::default()
    }
}

#[test]
fn test_sequential_batches_keep_last_partial_batch() -> Result<(), QuillError> {
    let loader = DataLoader::new(dataset(5), config(2))?;
    assert_eq!(loader.num_batches(), 3);

    let batches = loader.batches()?;
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0][0].shape(), vec![2, 2]);
    assert_eq!(batches[0][1].shape(), vec![2]);
    assert_eq!(batches[0][0].to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(batches[2][0].shape(), vec![1, 2]);
    assert_eq!(batches[2][1].to_vec(), vec![4.0]);
    Ok(())
}

#[test]
fn test_drop_last() -> Result<(), QuillError> {
    let loader = DataLoader::new(
        dataset(5),
        DataLoaderConfig {
            drop_last: true,
            ..config(2)
        },
    )?;
    assert_eq!(loader.num_batches(), 2);
    assert_eq!(loader.iter().count(), 2);
    Ok(())
}

#[test]
fn test_zero_batch_size_is_rejected() {
    let result = DataLoader::new(dataset(3), config(0));
    assert!(matches!(result, Err(QuillError::ValueOutOfRange { .. })));
}

#[test]
fn test_shuffle_is_a_seeded_permutation() -> Result<(), QuillError> {
    let shuffled = DataLoaderConfig {
        shuffle: true,
        seed: Some(42),
        ..config(10)
    };
    let first = DataLoader::new(dataset(10), shuffled)?;
    let second = DataLoader::new(dataset(10), shuffled)?;

    let a = first.batches()?[0][1].to_vec();
    let b = second.batches()?[0][1].to_vec();
    assert_eq!(a, b);

    let mut sorted = a.clone();
    sorted.sort_by(|x, y| x.partial_cmp(y).unwrap());
    assert_eq!(sorted, (0..10).map(|v| v as f32).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_gradients_flow_back_to_examples() -> Result<(), QuillError> {
    let ds = dataset(4);
    let loader = DataLoader::new(ds.clone(), config(4))?;
    let batch = loader.iter().next().unwrap()?;

    // sum(x * x) over the stacked batch
    let loss = sum_op(&mul_op(&batch[0], &batch[0])?, None)?;
    loss.backward()?;

    let examples = loader.dataset().column(0).unwrap();
    assert_eq!(examples[1].grad_vec(), vec![4.0, 6.0]);
    assert_eq!(examples[3].grad_vec(), vec![12.0, 14.0]);
    assert_eq!(ds.get(3)?[0].grad_vec(), vec![12.0, 14.0]);
    Ok(())
}
