use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::autograd::NodeId;
use crate::tensor::Tensor;

/// One entry of a parameter tree.
#[derive(Debug, Clone)]
pub enum Param {
    /// A trainable leaf.
    Tensor(Tensor),
    /// The parameters of a sub-module.
    Group(Parameters),
}

/// Name-keyed tree of a module's trainable leaves.
///
/// The same leaf may be reachable through several paths (weight sharing); the
/// traversal helpers yield it once.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: BTreeMap<String, Param>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, tensor: &Tensor) {
        self.entries.insert(name.into(), Param::Tensor(tensor.clone()));
    }

    /// Adds a sub-tree under `name`. Empty sub-trees are skipped.
    pub fn insert_group(&mut self, name: impl Into<String>, group: Parameters) {
        if !group.is_empty() {
            self.entries.insert(name.into(), Param::Group(group));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.entries.get(name)
    }

    /// Number of direct entries (leaves and groups).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every unique leaf, visiting the tree breadth-first in name order.
    pub fn leaves(&self) -> Vec<Tensor> {
        self.named_leaves().into_iter().map(|(_, t)| t).collect()
    }

    /// Every unique leaf with its dotted path (`"0.weight"`, `"encoder.bias"`).
    ///
    /// A leaf reachable through several paths keeps the first name found.
    pub fn named_leaves(&self) -> Vec<(String, Tensor)> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut result = Vec::new();
        let mut queue: VecDeque<(String, &Parameters)> = VecDeque::new();
        queue.push_back((String::new(), self));

        while let Some((prefix, group)) = queue.pop_front() {
            for (name, param) in &group.entries {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                match param {
                    Param::Tensor(tensor) => {
                        if seen.insert(tensor.node_id()) {
                            result.push((path, tensor.clone()));
                        }
                    }
                    Param::Group(sub) => queue.push_back((path, sub)),
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
