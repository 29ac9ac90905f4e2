#[cfg(test)]
mod tests {
    use crate::autograd::graph::{count_consumers, run_backward, Countdown, NodeId};
    use crate::error::QuillError;
    use crate::ops::activation::sigmoid::sigmoid_op;
    use crate::ops::arithmetic::add::add_op;
    use crate::ops::arithmetic::mul::mul_op;
    use crate::tensor::Tensor;
    use ndarray::{ArrayD, IxDyn};

    fn seed(t: &Tensor) {
        let ones = ArrayD::ones(IxDyn(&t.shape()));
        t.accumulate_grad(&ones).unwrap();
    }

    fn position(order: &[NodeId], t: &Tensor) -> usize {
        order
            .iter()
            .position(|id| *id == t.node_id())
            .expect("node did not fire")
    }

    #[test]
    fn test_count_consumers_counts_every_slot() -> Result<(), QuillError> {
        let x = Tensor::new(vec![1.0, 2.0], vec![2])?;
        let a = sigmoid_op(&x)?;
        let b = add_op(&a, &a)?;
        let c = mul_op(&a, &b)?;

        let countdown = count_consumers(&c);
        assert_eq!(countdown.pending(a.node_id()), 3);
        assert_eq!(countdown.pending(b.node_id()), 1);
        assert_eq!(countdown.pending(x.node_id()), 1);
        assert_eq!(countdown.pending(c.node_id()), 0);
        Ok(())
    }

    #[test]
    fn test_each_node_fires_once_after_all_consumers() -> Result<(), QuillError> {
        let x = Tensor::new(vec![0.5, -1.0, 2.0], vec![3])?;
        let a = sigmoid_op(&x)?;
        let b = add_op(&a, &a)?;
        let c = mul_op(&a, &b)?;

        seed(&c);
        let order = run_backward(&c)?;

        for node in [&x, &a, &b, &c] {
            let count = order.iter().filter(|id| **id == node.node_id()).count();
            assert_eq!(count, 1, "{:?} fired {} times", node, count);
        }
        assert_eq!(order.len(), 4);
        assert_eq!(position(&order, &c), 0);
        assert!(position(&order, &b) < position(&order, &a));
        assert!(position(&order, &a) < position(&order, &x));
        Ok(())
    }

    #[test]
    fn test_fan_out_gradients_sum() -> Result<(), QuillError> {
        // l = x*x + x*x, dl/dx = 4x
        let x = Tensor::new(vec![2.0, -3.0], vec![2])?;
        let sq = mul_op(&x, &x)?;
        let l = add_op(&sq, &sq)?;
        l.backward()?;
        assert_eq!(x.grad_vec(), vec![8.0, -12.0]);
        Ok(())
    }

    #[test]
    fn test_shared_leaf_across_two_graphs_accumulates() -> Result<(), QuillError> {
        let w = Tensor::new(vec![3.0], vec![1])?;
        let x1 = Tensor::new(vec![2.0], vec![1])?;
        let x2 = Tensor::new(vec![5.0], vec![1])?;

        mul_op(&w, &x1)?.backward()?;
        mul_op(&w, &x2)?.backward()?;
        assert_eq!(w.grad_vec(), vec![7.0]);

        w.zero_grad();
        mul_op(&w, &x2)?.backward()?;
        assert_eq!(w.grad_vec(), vec![5.0]);
        Ok(())
    }

    #[test]
    fn test_release_beyond_count_is_an_error() {
        let x = Tensor::scalar(1.0);
        let mut countdown = Countdown::default();
        countdown.register(x.node_id());
        assert_eq!(countdown.release(x.node_id()), Ok(true));
        assert!(countdown.is_drained());

        let err = countdown.release(x.node_id()).unwrap_err();
        assert!(matches!(err, QuillError::BackwardInvariantViolation { .. }));
    }

    #[test]
    fn test_release_of_unknown_node_is_an_error() {
        let x = Tensor::scalar(1.0);
        let mut countdown = Countdown::default();
        assert!(countdown.release(x.node_id()).is_err());
    }

    #[test]
    fn test_leaf_backward_seeds_only_itself() -> Result<(), QuillError> {
        let x = Tensor::new(vec![1.0, 2.0], vec![2])?;
        x.backward()?;
        assert_eq!(x.grad_vec(), vec![1.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_backward_with_wrong_seed_shape() -> Result<(), QuillError> {
        let x = Tensor::new(vec![1.0, 2.0], vec![2])?;
        let y = sigmoid_op(&x)?;
        let result = y.backward_with_grad(ArrayD::ones(IxDyn(&[3])));
        assert!(matches!(
            result,
            Err(QuillError::GradientShapeMismatch { .. })
        ));
        Ok(())
    }
}
