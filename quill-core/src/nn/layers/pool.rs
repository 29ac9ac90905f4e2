use crate::error::QuillError;
use crate::nn::module::Module;
use crate::ops::{avg_pool2d_op, max_pool2d_op, Size2};
use crate::tensor::Tensor;

/// Max pooling layer. Without an explicit stride, windows step by the kernel size.
#[derive(Debug, Clone, Copy)]
pub struct MaxPool2d {
    kernel: Size2,
    stride: Option<Size2>,
}

impl MaxPool2d {
    pub fn new(kernel: impl Into<Size2>) -> Self {
        Self::with_options(kernel, None)
    }

    pub fn with_stride(kernel: impl Into<Size2>, stride: impl Into<Size2>) -> Self {
        Self::with_options(kernel, Some(stride.into()))
    }

    /// `stride: None` falls back to the kernel size.
    pub fn with_options(kernel: impl Into<Size2>, stride: Option<Size2>) -> Self {
        MaxPool2d {
            kernel: kernel.into(),
            stride,
        }
    }

    pub fn kernel(&self) -> Size2 {
        self.kernel
    }

    /// The stride windows actually move by.
    pub fn stride(&self) -> Size2 {
        self.stride.unwrap_or(self.kernel)
    }
}

impl Module for MaxPool2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        max_pool2d_op(input, self.kernel, self.stride())
    }
}

/// Average pooling layer. Without an explicit stride, windows step by the kernel size.
#[derive(Debug, Clone, Copy)]
pub struct AvgPool2d {
    kernel: Size2,
    stride: Option<Size2>,
}

impl AvgPool2d {
    pub fn new(kernel: impl Into<Size2>) -> Self {
        Self::with_options(kernel, None)
    }

    pub fn with_stride(kernel: impl Into<Size2>, stride: impl Into<Size2>) -> Self {
        Self::with_options(kernel, Some(stride.into()))
    }

    /// `stride: None` falls back to the kernel size.
    pub fn with_options(kernel: impl Into<Size2>, stride: Option<Size2>) -> Self {
        AvgPool2d {
            kernel: kernel.into(),
            stride,
        }
    }

    pub fn kernel(&self) -> Size2 {
        self.kernel
    }

    pub fn stride(&self) -> Size2 {
        self.stride.unwrap_or(self.kernel)
    }
}

impl Module for AvgPool2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        avg_pool2d_op(input, self.kernel, self.stride())
    }
}
