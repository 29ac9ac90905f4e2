use rand::Rng;

use crate::error::QuillError;
use crate::nn::init::uniform_fan_in;
use crate::nn::module::Module;
use crate::nn::parameter::Parameters;
use crate::ops::{add_bias_op, conv2d_op, Size2};
use crate::tensor::Tensor;

/// Stride, padding and bias switch of a [`Conv2d`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2dConfig {
    pub stride: Size2,
    pub padding: Size2,
    pub bias: bool,
}

impl Default for Conv2dConfig {
    fn default() -> Self {
        Conv2dConfig {
            stride: Size2::from(1),
            padding: Size2::from(0),
            bias: true,
        }
    }
}

/// 2-D convolution layer over `(C, H, W)` or `(N, C, H, W)` inputs.
///
/// `weight` has shape `(out_channels, in_channels, kh, kw)`; the optional bias has
/// one entry per output channel and is added along the channel axis.
#[derive(Debug, Clone)]
pub struct Conv2d {
    weight: Tensor,
    bias: Option<Tensor>,
    config: Conv2dConfig,
}

impl Conv2d {
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: impl Into<Size2>,
        config: Conv2dConfig,
        rng: &mut R,
    ) -> Result<Self, QuillError> {
        let kernel_size = kernel_size.into();
        kernel_size.require_positive("kernel_size")?;
        config.stride.require_positive("stride")?;
        if out_channels == 0 {
            return Err(QuillError::ValueOutOfRange {
                name: "out_channels".to_string(),
                value: out_channels.to_string(),
                constraint: "a positive count".to_string(),
            });
        }
        let fan_in = in_channels * kernel_size.area();
        let weight = uniform_fan_in(
            &[out_channels, in_channels, kernel_size.height, kernel_size.width],
            fan_in,
            rng,
        )?;
        let bias = if config.bias {
            Some(uniform_fan_in(&[out_channels], fan_in, rng)?)
        } else {
            None
        };
        Ok(Conv2d {
            weight,
            bias,
            config,
        })
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }

    pub fn config(&self) -> Conv2dConfig {
        self.config
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        let y = conv2d_op(input, &self.weight, self.config.stride, self.config.padding)?;
        match &self.bias {
            Some(bias) => add_bias_op(&y, bias, -3),
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
mod tests {
    use super::*;
    use crate::utils::testing::seeded_uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_conv2d_layer_shapes_and_bias_gradient() -> Result<(), QuillError> {
        let mut rng = StdRng::seed_from_u64(5);
        let config = Conv2dConfig {
            padding: Size2::from(1),
            ..Conv2dConfig::default()
        };
        let layer = Conv2d::new(3, 2, 3, config, &mut rng)?;
        assert_eq!(layer.weight().shape(), vec![2, 3, 3, 3]);

        let x = seeded_uniform(&[4, 3, 5, 5], 9);
        let y = layer.forward(&x)?;
        assert_eq!(y.shape(), vec![4, 2, 5, 5]);
        y.backward()?;
        // Each bias entry sums a gradient of one over 4 * 5 * 5 positions.
        let bias_grad = layer.bias().unwrap().grad_vec();
        assert!(bias_grad.iter().all(|g| (g - 100.0).abs() < 1e-3));
        Ok(())
    }

    #[test]
    fn test_conv2d_layer_without_bias() -> Result<(), QuillError> {
        let mut rng = StdRng::seed_from_u64(6);
        let config = Conv2dConfig {
            stride: Size2::from(2),
            bias: false,
            ..Conv2dConfig::default()
        };
        let layer = Conv2d::new(1, 4, (2, 3), config, &mut rng)?;
        assert!(layer.bias().is_none());
        assert_eq!(layer.parameters().leaves().len(), 1);
        let y = layer.forward(&seeded_uniform(&[1, 6, 7], 10))?;
        assert_eq!(y.shape(), vec![4, 3, 3]);
        Ok(())
    }

    #[test]
    fn test_conv2d_layer_rejects_zero_sizes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Conv2d::new(1, 1, 0, Conv2dConfig::default(), &mut rng).is_err());
        assert!(Conv2d::new(1, 0, 3, Conv2dConfig::default(), &mut rng).is_err());
        assert!(Conv2d::new(0, 1, 3, Conv2dConfig::default(), &mut rng).is_err());
    }
}
