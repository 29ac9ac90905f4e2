//! # Partitioning
//!
//! Operations that join several tensors into one (`stack`, `concatenate`) or cut
//! one tensor into several children (`split`, `unstack`). Children of a cut share
//! one backward rule and are told apart by their `partition_index`.

pub mod concatenate;
pub mod split;
pub mod stack;

pub use concatenate::concatenate_op;
pub use split::{split_op, unstack_op};
pub use stack::stack_op;
