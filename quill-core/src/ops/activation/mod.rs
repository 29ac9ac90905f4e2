//! # Activation Functions
//!
//! Element-wise non-linearities. Each backward rule uses either the input value
//! (`relu`) or the node's own output (`sigmoid`, `tanh`).

pub mod relu;
pub mod sigmoid;
pub mod tanh;

pub use relu::relu_op;
pub use sigmoid::sigmoid_op;
pub use tanh::tanh_op;
