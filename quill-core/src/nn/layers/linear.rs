use rand::Rng;

use crate::error::QuillError;
use crate::nn::init::uniform_fan_in;
use crate::nn::module::Module;
use crate::nn::parameter::Parameters;
use crate::ops::{add_bias_op, expand_dims_op, matmul_op, squeeze_op};
use crate::tensor::Tensor;

/// Fully connected layer `y = x · W + b`.
///
/// `weight` has shape `(in_features, out_features)`. The input may be a single
/// example `(in_features,)` or a batch `(..., in_features)`.
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Tensor,
    bias: Option<Tensor>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a layer with weights drawn uniformly from `±1/sqrt(in_features)`.
    ///
    /// # Errors
    /// Returns `ValueOutOfRange` if either size is zero.
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        bias: bool,
        rng: &mut R,
    ) -> Result<Self, QuillError> {
        if out_features == 0 {
            return Err(QuillError::ValueOutOfRange {
                name: "out_features".to_string(),
                value: out_features.to_string(),
                constraint: "a positive count".to_string(),
            });
        }
        let weight = uniform_fan_in(&[in_features, out_features], in_features, rng)?;
        let bias = if bias {
            Some(uniform_fan_in(&[out_features], in_features, rng)?)
        } else {
            None
        };
        Ok(Linear {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    /// Builds a layer around existing leaves, checking their shapes agree.
    pub fn from_parts(weight: Tensor, bias: Option<Tensor>) -> Result<Self, QuillError> {
        let shape = weight.shape();
        if shape.len() != 2 {
            return Err(QuillError::RankMismatch {
                operation: "Linear weight".to_string(),
                expected: vec![2],
                actual: shape.len(),
            });
        }
        if let Some(b) = &bias {
            if b.shape() != [shape[1]] {
                return Err(QuillError::ShapeMismatch {
                    expected: vec![shape[1]],
                    actual: b.shape(),
                    operation: "Linear bias".to_string(),
                });
            }
        }
        Ok(Linear {
            weight,
            bias,
            in_features: shape[0],
            out_features: shape[1],
        })
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        let row = expand_dims_op(input, -2)?;
        let y = squeeze_op(&matmul_op(&row, &self.weight)?, -2)?;
        match &self.bias {
            Some(bias) => add_bias_op(&y, bias, -1),
            None => Ok(y),
        }
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert("weight", &self.weight);
        if let Some(bias) = &self.bias {
            params.insert("bias", bias);
        }
        params
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
