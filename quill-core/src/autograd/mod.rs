//! # Automatic differentiation
//!
//! - [`backward_op`]: the closed set of backward rules, one variant per operation kind.
//! - [`graph`]: the backward scheduler (fan-in countdown, exactly-once firing).
//! - [`grad_check`]: finite-difference verification of analytic gradients.

pub mod backward_op;
pub mod grad_check;
pub mod graph;

#[cfg(test)]
mod graph_test;

pub use backward_op::BackwardOp;
pub use graph::NodeId;
