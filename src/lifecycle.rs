//! # Native Object Lifecycle
//!
//! The interface surrounding module code uses to mirror its objects in the
//! model:
//!
//! - [`register_child`] / [`unregister_child`] when a module is constructed
//!   or destroyed, or use a [`Registration`] guard that unregisters on drop
//! - [`inform_move`] after a native object moved to another slot
//! - [`attach_variable`] / [`detach_variable`] for accessors
//!
//! Native objects are addressed through a [`SlotTable`], so the graph only
//! ever stores stable [`NativeRef`] indices.

use hashbrown::HashSet;

use crate::model::{NativeRef, NetworkNode, NodeType, UpdateMode, VariableDirection, VertexKind};
use crate::proxy::{AnyProxy, ModelProxy, ProcessVariableProxy};
use crate::relations::ChildSpec;
use crate::{Error, Result};

// ============================================================================
// Registration
// ============================================================================

/// Register a new module under `parent` and return its proxy.
pub fn register_child(parent: &AnyProxy, child: &ChildSpec, native: NativeRef) -> Result<AnyProxy> {
    let base = parent.base().add_child(child, native)?;
    let (model, vertex) = base.handle()?;
    Ok(AnyProxy::new(model.clone(), vertex, child.kind()))
}

/// Remove a module from the model. Its proxies become invalid.
pub fn unregister_child(child: &AnyProxy) -> Result<()> {
    if child.proxy_kind() == VertexKind::Root {
        return Err(Error::Structural("The application root cannot be unregistered.".into()));
    }
    let owner = child
        .visit_first(&crate::traversal::presets::get_owner(), |owner| owner)?
        .ok_or_else(|| Error::Structural("Module has no owner; it was already unregistered.".into()))?;
    owner.base().remove_child(child.base())
}

/// Point the vertex of `proxy` at the new location of its native object.
pub fn inform_move(proxy: &impl ModelProxy, native: NativeRef) -> Result<()> {
    proxy.base().inform_move(native)
}

// ============================================================================
// Accessors
// ============================================================================

/// Describes one accessor about to be attached.
#[derive(Debug, Clone)]
pub struct AccessorSpec {
    pub node_type: NodeType,
    pub direction: VariableDirection,
    pub mode: UpdateMode,
    pub tags: HashSet<String>,
}

impl AccessorSpec {
    pub fn new(direction: VariableDirection, mode: UpdateMode) -> Self {
        Self { node_type: NodeType::Application, direction, mode, tags: HashSet::new() }
    }

    pub fn device(mut self) -> Self {
        self.node_type = NodeType::Device;
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Attach an accessor of `owner` to the variable `variable_name`.
///
/// The name is resolved relative to the owner's directory and may use `.`,
/// `..` and a leading `/`. Missing directories and the variable itself are
/// created. Returns the variable and the node that now represents the
/// accessor; keep the node to detach it later.
///
/// The owner must be able to access variables. If it cannot, nothing is
/// created.
pub fn attach_variable(
    owner: &AnyProxy,
    variable_name: &str,
    accessor: AccessorSpec,
) -> Result<(ProcessVariableProxy, NetworkNode)> {
    let base = owner.base();
    let (model, _) = base.handle()?;
    let node = NetworkNode::new(model.next_node_id(), accessor.node_type, accessor.direction, accessor.mode)
        .with_tags(accessor.tags);
    let attached = node.clone();
    let pv = base.mutate(|b, owner| {
        b.accessing_module(owner)?;
        let dir = b.neighbour_directory(owner)?;
        let pv = b.add_variable_by_path(dir, variable_name)?;
        if let Err(e) = b.add_variable_node(owner, pv, attached) {
            b.collect_if_dead(pv);
            return Err(e);
        }
        Ok(pv)
    })?;
    Ok((ProcessVariableProxy(base.sibling(pv)?), node))
}

/// Detach the accessor `node` from `pv`. The variable is removed from the
/// model once its last accessor is gone.
pub fn detach_variable(pv: &ProcessVariableProxy, node: &NetworkNode) -> Result<()> {
    pv.remove_node(node)
}

// ============================================================================
// Registration guard
// ============================================================================

/// Keeps a module registered for as long as the guard lives.
#[derive(Debug)]
pub struct Registration {
    proxy: Option<AnyProxy>,
}

impl Registration {
    pub fn new(parent: &AnyProxy, child: &ChildSpec, native: NativeRef) -> Result<Self> {
        Ok(Self { proxy: Some(register_child(parent, child, native)?) })
    }

    /// The registered module, or `None` once disabled.
    pub fn proxy(&self) -> Option<&AnyProxy> {
        self.proxy.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.proxy.is_some()
    }

    /// Unregister now. Further calls do nothing.
    pub fn disable(&mut self) -> Result<()> {
        match self.proxy.take() {
            Some(proxy) if proxy.is_valid() => unregister_child(&proxy),
            _ => Ok(()),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            tracing::warn!(error = %e, "failed to unregister module on drop");
        }
    }
}

// ============================================================================
// SlotTable
// ============================================================================

/// Stable storage for native objects referenced from the model.
///
/// Slots are never reused. [`relocate`](Self::relocate) moves an object to a
/// fresh slot, after which the owner calls [`inform_move`].
#[derive(Debug)]
pub struct SlotTable<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> SlotTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> NativeRef {
        self.slots.push(Some(value));
        NativeRef(self.slots.len() as u64 - 1)
    }

    pub fn get(&self, native: NativeRef) -> Option<&T> {
        self.slots.get(native.0 as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, native: NativeRef) -> Option<&mut T> {
        self.slots.get_mut(native.0 as usize).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, native: NativeRef) -> Option<T> {
        self.slots.get_mut(native.0 as usize).and_then(Option::take)
    }

    /// Move the object at `native` into a new slot.
    pub fn relocate(&mut self, native: NativeRef) -> Option<NativeRef> {
        let value = self.remove(native)?;
        Some(self.insert(value))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
