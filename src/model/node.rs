//! Network nodes: the accessor endpoints attached to a process variable.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Identifier of a network node, unique within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Who provides the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Application,
    Device,
}

/// Data flow seen from the accessing module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataDirection {
    /// The module writes the variable.
    Feeding,
    /// The module reads the variable.
    Consuming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableDirection {
    pub dir: DataDirection,
    pub with_return: bool,
}

impl VariableDirection {
    pub fn feeding() -> Self {
        Self { dir: DataDirection::Feeding, with_return: false }
    }

    pub fn consuming() -> Self {
        Self { dir: DataDirection::Consuming, with_return: false }
    }

    pub fn with_return(mut self) -> Self {
        self.with_return = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateMode {
    Push,
    Poll,
}

/// Descriptor of one accessor of a process variable.
///
/// Two descriptors are equal when their ids are equal; the remaining fields
/// are informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: NodeId,
    pub node_type: NodeType,
    pub direction: VariableDirection,
    pub mode: UpdateMode,
    pub tags: HashSet<String>,
}

impl NetworkNode {
    pub fn new(id: NodeId, node_type: NodeType, direction: VariableDirection, mode: UpdateMode) -> Self {
        Self { id, node_type, direction, mode, tags: HashSet::new() }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn is_feeding(&self) -> bool {
        self.direction.dir == DataDirection::Feeding
    }
}

impl PartialEq for NetworkNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NetworkNode {}
