use std::collections::HashMap;

use ndarray::ArrayD;

use crate::autograd::NodeId;
use crate::error::QuillError;
use crate::nn::parameter::Parameters;
use crate::optim::optimizer_trait::Optimizer;
use crate::tensor::Tensor;

/// Hyperparameters of [`Sgd`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SgdConfig {
    pub lr: f32,
    pub momentum: f32,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            lr: 0.001,
            momentum: 0.0,
        }
    }
}

/// Stochastic gradient descent with optional momentum.
///
/// For every leaf: `v = momentum * v + lr * grad`, then `value -= v`. Velocities
/// live in the optimizer, keyed by node identity, so two optimizers over the same
/// leaves keep independent state.
#[derive(Debug)]
pub struct Sgd {
    params: Vec<Tensor>,
    config: SgdConfig,
    velocity: HashMap<NodeId, ArrayD<f32>>,
}

impl Sgd {
    /// Creates an optimizer over the unique leaves of a parameter tree.
    pub fn new(params: &Parameters, config: SgdConfig) -> Result<Self, QuillError> {
        Self::from_tensors(params.leaves(), config)
    }

    /// Creates an optimizer over an explicit list of leaves.
    ///
    /// # Errors
    /// `ValueOutOfRange` for a negative or non-finite learning rate, or a momentum
    /// outside `[0, 1)`.
    pub fn from_tensors(params: Vec<Tensor>, config: SgdConfig) -> Result<Self, QuillError> {
        if !config.lr.is_finite() || config.lr < 0.0 {
            return Err(QuillError::ValueOutOfRange {
                name: "lr".to_string(),
                value: config.lr.to_string(),
                constraint: "a finite, non-negative rate".to_string(),
            });
        }
        if !(0.0..1.0).contains(&config.momentum) {
            return Err(QuillError::ValueOutOfRange {
                name: "momentum".to_string(),
                value: config.momentum.to_string(),
                constraint: "within [0, 1)".to_string(),
            });
        }
        let mut unique: Vec<Tensor> = Vec::with_capacity(params.len());
        for param in params {
            if !unique.iter().any(|p| p.ptr_eq(&param)) {
                unique.push(param);
            }
        }
        Ok(Sgd {
            params: unique,
            config,
            velocity: HashMap::new(),
        })
    }

    pub fn config(&self) -> SgdConfig {
        self.config
    }

    pub fn params(&self) -> &[Tensor] {
        &self.params
    }

    /// The velocity buffer of `param`, if a step has produced one.
    pub fn velocity(&self, param: &Tensor) -> Option<&ArrayD<f32>> {
        self.velocity.get(&param.node_id())
    }
}

impl Optimizer for Sgd {
    fn step(&mut self) -> Result<(), QuillError> {
        let SgdConfig { lr, momentum } = self.config;
        for param in &self.params {
            let grad = param.grad();
            let update = if momentum == 0.0 {
                grad.mapv(|g| lr * g)
            } else {
                let velocity = self
                    .velocity
                    .entry(param.node_id())
                    .or_insert_with(|| ArrayD::zeros(grad.raw_dim()));
                velocity.zip_mut_with(&grad, |v, &g| *v = momentum * *v + lr * g);
                velocity.clone()
            };
            param.set_value(param.value() - &update)?;
            param.zero_grad();
        }
        log::debug!(
            "sgd: stepped {} parameters (lr {}, momentum {})",
            self.params.len(),
            lr,
            momentum
        );
        Ok(())
    }

    fn zero_grad(&mut self) {
        for param in &self.params {
            param.zero_grad();
        }
    }

    fn reset_velocity(&mut self) {
        self.velocity.clear();
    }
}
