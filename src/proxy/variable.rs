//! Proxy of a process variable.

use hashbrown::HashSet;

use crate::model::{NetworkNode, VertexProperties};
use crate::Result;

use super::{wrong_kind, AnyProxy};

proxy_type! {
    ProcessVariableProxy => ProcessVariable
}

impl ProcessVariableProxy {
    pub fn name(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::ProcessVariable(v) => v.name.clone(),
            other => wrong_kind("ProcessVariableProxy", other.kind()),
        })
    }

    /// Attached network nodes in attach order.
    pub fn nodes(&self) -> Result<Vec<NetworkNode>> {
        self.0.read(|p| match p {
            VertexProperties::ProcessVariable(v) => v.nodes.clone(),
            other => wrong_kind("ProcessVariableProxy", other.kind()),
        })
    }

    pub fn tags(&self) -> Result<HashSet<String>> {
        self.0.read(|p| match p {
            VertexProperties::ProcessVariable(v) => v.tags.clone(),
            other => wrong_kind("ProcessVariableProxy", other.kind()),
        })
    }

    pub fn add_tag(&self, tag: &str) -> Result<()> {
        self.0.mutate(|b, v| b.add_tag(v, tag))
    }

    /// Detach `node`. The variable disappears from the model once no
    /// accessor is left, which invalidates this proxy.
    ///
    /// Detaching a node that is not attached does nothing.
    pub fn remove_node(&self, node: &NetworkNode) -> Result<()> {
        self.0.mutate(|b, v| b.remove_node(v, node.id)).map(|_| ())
    }

    pub fn visit_by_path(&self, path: &str, visitor: impl FnOnce(AnyProxy)) -> Result<bool> {
        self.0.visit_by_path(path, visitor)
    }
}
