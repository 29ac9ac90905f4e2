//! # Tensor Operations Module (`ops`)
//!
//! The primitive operation library. Operations are grouped into submodules by
//! functionality.
//!
//! ## Structure:
//!
//! - **`_op` Functions:** Each operation has a forward function named `xxx_op` that
//!   validates its arguments, computes the value and returns a new [`Tensor`](crate::Tensor)
//!   carrying the matching [`BackwardOp`](crate::autograd::BackwardOp) variant.
//!   Validation happens before any node is built.
//! - **`_backward` Kernels:** Each operation has a `pub(crate)` gradient kernel that
//!   the `BackwardOp` dispatch calls with the node's accumulated gradient. A kernel
//!   finishes reading its parents' values before it adds into their gradients, so a
//!   node passed twice (e.g. `mul_op(&a, &a)`) is handled like any other fan-out.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: broadcasting element-wise `add` and `mul`.
//! - [`activation`]: `relu`, `sigmoid`, `tanh`.
//! - [`linalg`]: batched `matmul` and `add_bias`.
//! - [`view`]: `reshape`/`flatten`, `expand_dims`/`squeeze`.
//! - [`partition`]: `stack`, `split`/`unstack`, `concatenate`.
//! - [`pool`]: 2-D average and max pooling.
//! - [`conv`]: strided, padded 2-D cross-correlation.
//! - [`reduction`]: `sum`.
//! - [`loss`]: squared-error loss.
//! - [`window`]: `Size2` and the sliding-window shape law shared by pooling and convolution.

pub mod activation;
pub mod arithmetic;
pub mod conv;
pub mod linalg;
pub mod loss;
pub mod partition;
pub mod pool;
pub mod reduction;
pub mod view;
pub mod window;

#[cfg(test)]
mod window_test;

pub use activation::{relu_op, sigmoid_op, tanh_op};
pub use arithmetic::{add_op, mul_op};
pub use conv::conv2d_op;
pub use linalg::{add_bias_op, matmul_op};
pub use loss::mse_loss_op;
pub use partition::{concatenate_op, split_op, stack_op, unstack_op};
pub use pool::{avg_pool2d_op, max_pool2d_op};
pub use reduction::sum_op;
pub use view::{expand_dims_op, flatten_op, reshape_op, squeeze_op};
pub use window::Size2;
