//! Edges of the model graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Opaque edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Relationship carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Owner to owned module or variable.
    Ownership,
    /// Directory to sub-directory or variable.
    Parenthood,
    /// Module to the directory holding its namespace. Root points to itself.
    Neighbourhood,
    /// Feeding module to PV, or PV to consuming module.
    PvAccess,
    /// Trigger PV to the device module it synchronises.
    Trigger,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ownership => "ownership",
            Self::Parenthood => "parenthood",
            Self::Neighbourhood => "neighbourhood",
            Self::PvAccess => "pvAccess",
            Self::Trigger => "trigger",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProperties {
    pub kind: EdgeKind,
    /// Set on pv-access edges whose network node has a return channel.
    pub with_return_channel: bool,
    /// Network node that created this edge (ownership and pv-access edges of PVs).
    pub node: Option<NodeId>,
}

impl EdgeProperties {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind, with_return_channel: false, node: None }
    }

    pub fn for_node(kind: EdgeKind, node: NodeId) -> Self {
        Self { kind, with_return_channel: false, node: Some(node) }
    }

    pub fn with_return_channel(mut self, with_return: bool) -> Self {
        self.with_return_channel = with_return;
        self
    }
}

impl From<EdgeKind> for EdgeProperties {
    fn from(kind: EdgeKind) -> Self {
        Self::new(kind)
    }
}
