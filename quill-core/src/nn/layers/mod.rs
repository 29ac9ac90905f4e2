// src/nn/layers/mod.rs

pub mod activation;
pub mod conv2d;
pub mod flatten;
pub mod linear;
pub mod lstm;
pub mod pool;
pub mod sequential;

pub use activation::{ReLU, Sigmoid, Tanh};
pub use conv2d::{Conv2d, Conv2dConfig};
pub use flatten::Flatten;
pub use linear::Linear;
pub use lstm::Lstm;
pub use pool::{AvgPool2d, MaxPool2d};
pub use sequential::Sequential;
