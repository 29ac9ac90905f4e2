use crate::error::QuillError;
use crate::ops;
use crate::tensor::Tensor;

/// Method forms of the most common primitives, so graphs read left to right.
impl Tensor {
    pub fn add(&self, other: &Tensor) -> Result<Tensor, QuillError> {
        ops::add_op(self, other)
    }

    pub fn mul(&self, other: &Tensor) -> Result<Tensor, QuillError> {
        ops::mul_op(self, other)
    }

    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, QuillError> {
        ops::matmul_op(self, other)
    }

    pub fn relu(&self) -> Result<Tensor, QuillError> {
        ops::relu_op(self)
    }

    pub fn sigmoid(&self) -> Result<Tensor, QuillError> {
        ops::sigmoid_op(self)
    }

    pub fn tanh(&self) -> Result<Tensor, QuillError> {
        ops::tanh_op(self)
    }

    pub fn reshape(&self, shape: &[isize]) -> Result<Tensor, QuillError> {
        ops::reshape_op(self, shape)
    }

    pub fn flatten(&self) -> Result<Tensor, QuillError> {
        ops::flatten_op(self)
    }

    /// Sums every element into a 0-d tensor.
    pub fn sum(&self) -> Result<Tensor, QuillError> {
        ops::sum_op(self, None)
    }

    pub fn sum_axis(&self, axis: isize) -> Result<Tensor, QuillError> {
        ops::sum_op(self, Some(axis))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::QuillError;
    use crate::utils::testing::{check_grad_near, create_test_tensor};

    #[test]
    fn test_method_chain_matches_ops() -> Result<(), QuillError> {
        let x = create_test_tensor(vec![1.0, -2.0, 3.0, 4.0], vec![2, 2]);
        let w = create_test_tensor(vec![0.5, 0.5, 0.5, 0.5], vec![2, 2]);
        let loss = x.matmul(&w)?.relu()?.sum()?;
        assert_eq!(loss.op_name(), Some("sum"));
        loss.backward()?;
        // Row 0 of x·w is negative and masked by relu.
        check_grad_near(&x, &[2, 2], &[0.0, 0.0, 1.0, 1.0], 1e-6);
        Ok(())
    }
}
