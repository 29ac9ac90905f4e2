// src/nn/mod.rs
//! Neural-network building blocks composed from the primitive operations.

pub mod init;
pub mod layers;
pub mod module;
pub mod parameter;

pub use layers::{AvgPool2d, Conv2d, Conv2dConfig, Flatten, Linear, Lstm, MaxPool2d, ReLU, Sequential, Sigmoid, Tanh};
pub use module::Module;
pub use parameter::{Param, Parameters};
