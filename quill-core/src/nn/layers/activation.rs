//! Parameter-free activation layers.

use crate::error::QuillError;
use crate::nn::module::Module;
use crate::ops::{relu_op, sigmoid_op, tanh_op};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ReLU {
    pub fn new() -> Self {
        ReLU
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        relu_op(input)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn new() -> Self {
        Sigmoid
    }
}

impl Module for Sigmoid {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        sigmoid_op(input)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl Tanh {
    pub fn new() -> Self {
        Tanh
    }
}

impl Module for Tanh {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        tanh_op(input)
    }
}
