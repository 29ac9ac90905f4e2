//! The backward scheduler.
//!
//! A traversal starts with a pre-pass that counts, for every node reachable from
//! the root, how many parent slots of reachable consumers point at it. Those counts
//! are frozen in a [`Countdown`] owned by the traversal, never stored on the nodes,
//! so a node shared by several forward passes carries no stale state between them.
//!
//! The root counts as satisfied. Firing a node runs its backward rule once, then
//! releases each parent slot; a parent whose every consumer has called back becomes
//! ready. Readiness is driven lazily by the counters rather than by a precomputed
//! topological order, and ordering among ready siblings is not observable.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::QuillError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

/// Identity of a graph node: the address of its shared storage.
///
/// Only used as a map key; never dereferenced.
pub type NodeId = *const RefCell<TensorData>;

/// Per-traversal fan-in bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct Countdown {
    /// Consumers that list the node as a parent (with multiplicity).
    pending: HashMap<NodeId, usize>,
    /// Consumers that have already called back.
    satisfied: HashMap<NodeId, usize>,
}

impl Countdown {
    /// Registers one more consumer slot pointing at `id`.
    pub(crate) fn register(&mut self, id: NodeId) {
        *self.pending.entry(id).or_insert(0) += 1;
    }

    /// Records that one consumer of `id` has contributed its gradient.
    ///
    /// Returns `Ok(true)` once every registered consumer has called back.
    ///
    /// # Errors
    /// Returns `QuillError::BackwardInvariantViolation` if this would exceed the frozen
    /// count. The traversal must then be abandoned.
    pub(crate) fn release(&mut self, id: NodeId) -> Result<bool, QuillError> {
        let pending = self.pending.get(&id).copied().unwrap_or(0);
        let satisfied = self.satisfied.entry(id).or_insert(0);
        if *satisfied >= pending {
            log::error!(
                "backward invariant violated: node {:p} released {} times with {} consumers",
                id,
                *satisfied + 1,
                pending
            );
            return Err(QuillError::BackwardInvariantViolation {
                node: format!("{:p}", id),
                detail: format!(
                    "released {} times but only {} consumers were counted",
                    *satisfied + 1,
                    pending
                ),
            });
        }
        *satisfied += 1;
        Ok(*satisfied == pending)
    }

    /// Consumers of `id` that have not called back yet.
    pub(crate) fn remaining(&self, id: NodeId) -> usize {
        let pending = self.pending.get(&id).copied().unwrap_or(0);
        let satisfied = self.satisfied.get(&id).copied().unwrap_or(0);
        pending - satisfied
    }

    pub(crate) fn pending(&self, id: NodeId) -> usize {
        self.pending.get(&id).copied().unwrap_or(0)
    }

    /// `true` when every registered consumer of every node has called back.
    pub(crate) fn is_drained(&self) -> bool {
        self.pending.keys().all(|id| self.remaining(*id) == 0)
    }
}

/// Walks the subgraph reachable from `root` and counts consumer slots per node.
pub(crate) fn count_consumers(root: &Tensor) -> Countdown {
    let mut countdown = Countdown::default();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![root.clone()];
    visited.insert(root.node_id());

    while let Some(node) = stack.pop() {
        let guard = node.read_data();
        if let Some(op) = guard.grad_fn.as_ref() {
            for parent in op.inputs() {
                let parent_id = parent.node_id();
                countdown.register(parent_id);
                if visited.insert(parent_id) {
                    stack.push(parent.clone());
                }
            }
        }
    }
    countdown
}

/// Runs one backward traversal from `root`, whose gradient must already be seeded.
///
/// Returns the order in which nodes fired (leaves included, they fire a no-op).
pub(crate) fn run_backward(root: &Tensor) -> Result<Vec<NodeId>, QuillError> {
    let mut countdown = count_consumers(root);
    log::debug!(
        "backward: starting traversal from {:p} ({} nodes below the root)",
        root.node_id(),
        countdown.pending.len()
    );

    let mut fired: Vec<NodeId> = Vec::new();
    let mut ready = vec![root.clone()];

    while let Some(node) = ready.pop() {
        let parents: Vec<Tensor> = {
            let guard = node.read_data();
            match guard.grad_fn.as_ref() {
                Some(op) => {
                    log::trace!(
                        "backward: firing {} at {:p} after {} consumers",
                        op.name(),
                        node.node_id(),
                        countdown.pending(node.node_id())
                    );
                    op.backward(&guard.value, &guard.grad, guard.partition_index)?;
                    op.inputs().into_iter().cloned().collect()
                }
                None => Vec::new(),
            }
        };
        fired.push(node.node_id());

        for parent in parents {
            if countdown.release(parent.node_id())? {
                ready.push(parent);
            }
        }
    }

    if !countdown.is_drained() {
        return Err(QuillError::BackwardInvariantViolation {
            node: format!("{:p}", root.node_id()),
            detail: "traversal finished with unsatisfied consumers".to_string(),
        });
    }
    log::debug!("backward: traversal finished, {} nodes fired", fired.len());
    Ok(fired)
}
