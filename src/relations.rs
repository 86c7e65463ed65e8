//! # Relationship Builder
//!
//! Every structural mutation of the model graph goes through
//! [`RelationshipBuilder`], which borrows the locked [`GraphStore`] for the
//! duration of one operation:
//!
//! - registering modules under an owner (`generic_add`) and removing them
//!   again (`generic_remove`)
//! - creating directories, single-level or along a relative path
//! - attaching network nodes to process variables and detaching them,
//!   including collection of process variables nobody uses anymore

use crate::model::*;
use crate::path::{self, Component};
use crate::storage::{EdgeRecord, GraphStore};
use crate::traversal::{presets, search, SearchConfig};
use crate::{Error, Result};

// ============================================================================
// ChildSpec
// ============================================================================

/// Kind and payload of a module registered under an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSpec {
    ModuleGroup { name: String },
    ApplicationModule { name: String },
    VariableGroup { name: String },
    /// Device modules have no namespace of their own; their registers live
    /// in the owner's directory.
    DeviceModule { alias_or_cdd: String, trigger: Option<String> },
}

impl ChildSpec {
    pub fn kind(&self) -> VertexKind {
        match self {
            Self::ModuleGroup { .. } => VertexKind::ModuleGroup,
            Self::ApplicationModule { .. } => VertexKind::ApplicationModule,
            Self::VariableGroup { .. } => VertexKind::VariableGroup,
            Self::DeviceModule { .. } => VertexKind::DeviceModule,
        }
    }

    fn check_owner(&self, owner: VertexKind) -> Result<()> {
        let allowed = match self {
            Self::VariableGroup { .. } => {
                matches!(owner, VertexKind::ApplicationModule | VertexKind::VariableGroup)
            }
            _ => matches!(owner, VertexKind::Root | VertexKind::ModuleGroup),
        };
        if allowed {
            return Ok(());
        }
        let expected = match self {
            Self::VariableGroup { .. } => "an ApplicationModule or another VariableGroup",
            _ => "the application or a ModuleGroup",
        };
        Err(Error::Structural(format!(
            "A {} must be owned by {expected}, not by a {owner}.",
            self.kind()
        )))
    }
}

// ============================================================================
// Read-only lookups
// ============================================================================

fn first(graph: &GraphStore, start: VertexId, config: SearchConfig) -> Option<VertexId> {
    search(graph, start, &config.first_hit()).into_iter().next()
}

/// Walk ownership upwards from `owner` through variable groups to the
/// module that actually accesses variables.
pub fn accessing_module(graph: &GraphStore, owner: VertexId) -> Result<VertexId> {
    let mut current = owner;
    loop {
        match graph.expect_vertex(current)?.kind() {
            VertexKind::ApplicationModule | VertexKind::DeviceModule => return Ok(current),
            VertexKind::VariableGroup => {
                current = first(graph, current, presets::get_owner()).ok_or_else(|| {
                    Error::Structural(format!("VariableGroup {current} has no owner."))
                })?;
            }
            other => {
                return Err(Error::Structural(format!(
                    "Process variables cannot be owned by a {other}."
                )));
            }
        }
    }
}

// ============================================================================
// RelationshipBuilder
// ============================================================================

pub struct RelationshipBuilder<'g> {
    graph: &'g mut GraphStore,
    root: VertexId,
}

impl<'g> RelationshipBuilder<'g> {
    pub fn new(graph: &'g mut GraphStore, root: VertexId) -> Self {
        Self { graph, root }
    }

    fn first(&self, start: VertexId, config: SearchConfig) -> Option<VertexId> {
        first(&*self.graph, start, config)
    }

    fn kind_of(&self, v: VertexId) -> Result<VertexKind> {
        Ok(self.graph.expect_vertex(v)?.kind())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// The directory holding the namespace of module `v`.
    pub fn neighbour_directory(&self, v: VertexId) -> Result<VertexId> {
        self.graph.expect_vertex(v)?;
        self.first(v, presets::get_neighbour_directory())
            .ok_or_else(|| Error::Structural(format!("Vertex {v} has no neighbourhood directory.")))
    }

    pub fn owner(&self, v: VertexId) -> Option<VertexId> {
        self.first(v, presets::get_owner())
    }

    pub fn parent_directory(&self, v: VertexId) -> Option<VertexId> {
        self.first(v, presets::get_parent())
    }

    pub fn accessing_module(&self, owner: VertexId) -> Result<VertexId> {
        accessing_module(&*self.graph, owner)
    }

    // ========================================================================
    // Directories and variables
    // ========================================================================

    fn expect_directory(&self, v: VertexId) -> Result<()> {
        match self.kind_of(v)? {
            VertexKind::Directory | VertexKind::Root => Ok(()),
            other => Err(Error::Structural(format!("Expected a directory, found a {other} ({v})."))),
        }
    }

    fn validate_single_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Structural("Names must not be empty.".into()));
        }
        path::validate_name(name, false)
    }

    /// Find or create the directory `name` below `parent`.
    pub fn add_directory(&mut self, parent: VertexId, name: &str) -> Result<VertexId> {
        Self::validate_single_name(name)?;
        self.expect_directory(parent)?;
        if let Some(existing) = self.first(parent, presets::child_directory_named(name)) {
            return Ok(existing);
        }
        let dir = self
            .graph
            .add_vertex(VertexProperties::Directory(DirectoryProperties { name: name.to_string() }));
        self.graph.add_edge(parent, dir, EdgeKind::Parenthood)?;
        tracing::debug!(vertex = %dir, parent = %parent, name, "created directory");
        Ok(dir)
    }

    fn depth(&self, dir: VertexId) -> usize {
        std::iter::successors(self.parent_directory(dir), |&d| self.parent_directory(d)).count()
    }

    /// Fail if `path` climbs above the root when walked from `start`.
    fn check_in_bounds(&self, start: VertexId, path: &str, components: &[Component<'_>]) -> Result<()> {
        let mut depth = self.depth(start);
        for component in components {
            match component {
                Component::Root => depth = 0,
                Component::Current => {}
                Component::Parent if depth == 0 => {
                    return Err(Error::Structural(format!(
                        "{path}: Path component '..' at root directory level found."
                    )));
                }
                Component::Parent => depth -= 1,
                Component::Name(_) => depth += 1,
            }
        }
        Ok(())
    }

    /// Walk `path` from `start`, creating missing directories on the way.
    /// Nothing is created if the path is invalid.
    pub fn add_directory_recursive(&mut self, start: VertexId, path: &str) -> Result<VertexId> {
        self.expect_directory(start)?;
        let components = path::components(path)?;
        self.check_in_bounds(start, path, &components)?;
        let mut current = start;
        for component in components {
            current = match component {
                Component::Root => self.root,
                Component::Current => current,
                Component::Parent => self.parent_directory(current).ok_or_else(|| {
                    Error::Structural(format!(
                        "{path}: Path component '..' at root directory level found."
                    ))
                })?,
                Component::Name(name) => self.add_directory(current, name)?,
            };
        }
        Ok(current)
    }

    /// Find or create the process variable `name` in directory `parent`.
    pub fn add_variable(&mut self, parent: VertexId, name: &str) -> Result<VertexId> {
        Self::validate_single_name(name)?;
        self.expect_directory(parent)?;
        if let Some(existing) = self.first(parent, presets::child_variable_named(name)) {
            return Ok(existing);
        }
        let pv = self.graph.add_vertex(VertexProperties::ProcessVariable(ProcessVariableProperties {
            name: name.to_string(),
            ..Default::default()
        }));
        self.graph.add_edge(parent, pv, EdgeKind::Parenthood)?;
        tracing::debug!(vertex = %pv, parent = %parent, name, "created process variable");
        Ok(pv)
    }

    /// Find or create the process variable at the (possibly relative or
    /// absolute) `qualified` name, seen from directory `start`.
    pub fn add_variable_by_path(&mut self, start: VertexId, qualified: &str) -> Result<VertexId> {
        path::components(qualified)?;
        Self::validate_single_name(path::unqualified_name(qualified))?;
        let dir = self.add_directory_recursive(start, path::path_name(qualified))?;
        self.add_variable(dir, path::unqualified_name(qualified))
    }

    // ========================================================================
    // Modules
    // ========================================================================

    /// Register a new module under `owner` and wire its ownership and
    /// neighbourhood edges.
    pub fn generic_add(&mut self, owner: VertexId, child: &ChildSpec, native: NativeRef) -> Result<VertexId> {
        child.check_owner(self.kind_of(owner)?)?;
        let parent_dir = self.neighbour_directory(owner)?;

        let (props, directory, trigger) = match child {
            ChildSpec::DeviceModule { alias_or_cdd, trigger } => {
                let trigger = trigger
                    .as_deref()
                    .map(|t| self.add_variable_by_path(parent_dir, t))
                    .transpose()?;
                let props = VertexProperties::DeviceModule(DeviceModuleProperties {
                    alias_or_cdd: alias_or_cdd.clone(),
                    trigger,
                    module: native,
                });
                (props, parent_dir, trigger)
            }
            ChildSpec::ModuleGroup { name }
            | ChildSpec::ApplicationModule { name }
            | ChildSpec::VariableGroup { name } => {
                if name.is_empty() {
                    return Err(Error::Structural(format!("A {} must have a name.", child.kind())));
                }
                let directory = self.add_directory_recursive(parent_dir, name)?;
                let name = name.clone();
                let props = match child {
                    ChildSpec::ModuleGroup { .. } => {
                        VertexProperties::ModuleGroup(ModuleGroupProperties { name, module_group: native })
                    }
                    ChildSpec::ApplicationModule { .. } => {
                        VertexProperties::ApplicationModule(ApplicationModuleProperties { name, module: native })
                    }
                    _ => VertexProperties::VariableGroup(VariableGroupProperties { name, module: native }),
                };
                (props, directory, None)
            }
        };

        let kind = props.kind();
        let v = self.graph.add_vertex(props);
        self.graph.add_edge(owner, v, EdgeKind::Ownership)?;
        if let Some(trigger) = trigger {
            self.graph.add_edge(trigger, v, EdgeKind::Trigger)?;
        }
        self.graph.add_edge(v, directory, EdgeKind::Neighbourhood)?;
        tracing::debug!(vertex = %v, owner = %owner, kind = %kind, "registered module");
        Ok(v)
    }

    /// Remove module `child`, which must be owned by `owner`.
    ///
    /// Process variables attached through the module lose those network
    /// nodes and are collected if nothing else uses them.
    pub fn generic_remove(&mut self, owner: VertexId, child: VertexId) -> Result<()> {
        let props = self.graph.expect_vertex(child)?;
        if !props.kind().is_module() {
            return Err(Error::Structural(format!("Cannot remove a {} like a module.", props.kind())));
        }
        let trigger = match props {
            VertexProperties::DeviceModule(p) => p.trigger,
            _ => None,
        };
        let owned = self
            .graph
            .in_edges(child)
            .any(|(_, e)| e.source == owner && e.props.kind == EdgeKind::Ownership);
        if !owned {
            return Err(Error::Structural(format!("Vertex {child} is not owned by {owner}.")));
        }

        let removed = self.graph.clear_vertex(child);
        self.graph.remove_vertex(child);
        tracing::debug!(vertex = %child, owner = %owner, "removed module");

        let mut touched: Vec<(VertexId, NodeId)> = removed
            .iter()
            .filter_map(|e: &EdgeRecord| {
                let node = e.props.node?;
                let other = if e.source == child { e.target } else { e.source };
                Some((other, node))
            })
            .collect();
        touched.dedup();
        for (pv, node) in touched {
            self.drop_orphaned_node(pv, node);
        }
        if let Some(trigger) = trigger {
            self.collect_if_dead(trigger);
        }
        Ok(())
    }

    fn drop_orphaned_node(&mut self, pv: VertexId, node: NodeId) {
        if let Some(VertexProperties::ProcessVariable(p)) = self.graph.vertex_mut(pv) {
            p.nodes.retain(|n| n.id != node);
        }
        let leftover: Vec<EdgeId> = self
            .graph
            .in_edges(pv)
            .chain(self.graph.out_edges(pv))
            .filter(|(_, e)| e.props.node == Some(node))
            .map(|(id, _)| id)
            .collect();
        for e in leftover {
            self.graph.remove_edge(e);
        }
        self.collect_if_dead(pv);
    }

    /// Replace the native back-reference of `v`.
    pub fn inform_move(&mut self, v: VertexId, native: NativeRef) -> Result<()> {
        let props = self.graph.expect_vertex_mut(v)?;
        if !props.set_native(native) {
            return Err(Error::Structural(format!("A {} has no native back-reference.", props.kind())));
        }
        Ok(())
    }

    // ========================================================================
    // Network nodes
    // ========================================================================

    fn expect_variable_mut(&mut self, pv: VertexId) -> Result<&mut ProcessVariableProperties> {
        match self.graph.expect_vertex_mut(pv)? {
            VertexProperties::ProcessVariable(p) => Ok(p),
            other => Err(Error::Structural(format!("Expected a ProcessVariable, found a {}.", other.kind()))),
        }
    }

    /// Attach `node` to process variable `pv` on behalf of `owner`.
    pub fn add_variable_node(&mut self, owner: VertexId, pv: VertexId, node: NetworkNode) -> Result<()> {
        let accessor = self.accessing_module(owner)?;
        if self.expect_variable_mut(pv)?.nodes.iter().any(|n| n.id == node.id) {
            return Err(Error::Structural(format!("Network node {} is already attached to {pv}.", node.id)));
        }

        self.graph.add_edge(owner, pv, EdgeProperties::for_node(EdgeKind::Ownership, node.id))?;
        let access = EdgeProperties::for_node(EdgeKind::PvAccess, node.id)
            .with_return_channel(node.direction.with_return);
        match node.direction.dir {
            DataDirection::Feeding => self.graph.add_edge(accessor, pv, access)?,
            DataDirection::Consuming => self.graph.add_edge(pv, accessor, access)?,
        };

        tracing::debug!(vertex = %pv, owner = %owner, node = %node.id, "attached network node");
        let variable = self.expect_variable_mut(pv)?;
        variable.tags.extend(node.tags.iter().cloned());
        variable.nodes.push(node);
        Ok(())
    }

    /// Detach network node `node` from `pv`. Returns `false` if the node was
    /// not attached.
    ///
    /// # Panics
    ///
    /// If the node is listed but its ownership or pv-access edge is not
    /// present exactly once. That means the graph was corrupted earlier.
    pub fn remove_node(&mut self, pv: VertexId, node: NodeId) -> Result<bool> {
        let variable = self.expect_variable_mut(pv)?;
        let Some(position) = variable.nodes.iter().position(|n| n.id == node) else {
            return Ok(false);
        };
        variable.nodes.remove(position);

        let edges_of = |graph: &GraphStore, kind: EdgeKind| -> Vec<EdgeId> {
            graph
                .in_edges(pv)
                .chain(graph.out_edges(pv))
                .filter(|(_, e)| e.props.kind == kind && e.props.node == Some(node))
                .map(|(id, _)| id)
                .collect()
        };
        let ownership = edges_of(&*self.graph, EdgeKind::Ownership);
        assert_eq!(ownership.len(), 1, "ownership edge of {node} at {pv} must exist exactly once");
        let access = edges_of(&*self.graph, EdgeKind::PvAccess);
        assert_eq!(access.len(), 1, "pv-access edge of {node} at {pv} must exist exactly once");
        for e in ownership.into_iter().chain(access) {
            let removed = self.graph.remove_edge(e);
            assert!(removed.is_some(), "edge {e} vanished during removal");
        }

        tracing::debug!(vertex = %pv, node = %node, "detached network node");
        self.collect_if_dead(pv);
        Ok(true)
    }

    /// Merge `tag` into the tags of `pv`.
    pub fn add_tag(&mut self, pv: VertexId, tag: &str) -> Result<()> {
        self.expect_variable_mut(pv)?.tags.insert(tag.to_string());
        Ok(())
    }

    /// Remove `pv` if at most its parenthood edge is left. Returns whether
    /// it was removed.
    pub fn collect_if_dead(&mut self, pv: VertexId) -> bool {
        let is_variable = matches!(self.graph.vertex(pv), Some(VertexProperties::ProcessVariable(_)));
        if !is_variable || self.graph.in_degree(pv) > 1 || self.graph.out_degree(pv) > 0 {
            return false;
        }
        self.graph.remove_vertex(pv);
        tracing::debug!(vertex = %pv, "collected unused process variable");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Model;

    fn with_builder<R>(model: &Model, f: impl FnOnce(&mut RelationshipBuilder<'_>) -> R) -> R {
        let mut graph = model.write();
        let mut builder = RelationshipBuilder::new(&mut graph, model.root());
        f(&mut builder)
    }

    fn node(model: &Model, direction: VariableDirection) -> NetworkNode {
        NetworkNode::new(model.next_node_id(), NodeType::Application, direction, UpdateMode::Push)
    }

    #[test]
    fn test_add_directory_is_idempotent() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        with_builder(&model, |b| {
            let a = b.add_directory(root, "a").unwrap();
            assert_eq!(b.add_directory(root, "a").unwrap(), a);
        });
        assert_eq!(model.read().vertex_count(), 2);
    }

    #[test]
    fn test_add_directory_rejects_illegal_names() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        with_builder(&model, |b| {
            assert!(b.add_directory(root, "a-b").is_err());
            assert!(b.add_directory(root, "").is_err());
            assert!(b.add_directory(root, "a/b").is_err());
        });
    }

    #[test]
    fn test_add_directory_recursive() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        with_builder(&model, |b| {
            let ab = b.add_directory_recursive(root, "a/./b").unwrap();
            let a = b.add_directory(root, "a").unwrap();
            assert_eq!(b.parent_directory(ab), Some(a));
            assert_eq!(b.add_directory_recursive(ab, "..").unwrap(), a);
            assert_eq!(b.add_directory_recursive(ab, "/").unwrap(), root);
            let c = b.add_directory_recursive(ab, "/c").unwrap();
            assert_eq!(b.parent_directory(c), Some(root));
            assert!(b.add_directory_recursive(root, "..").is_err());
        });
    }

    #[test]
    fn test_generic_add_checks_owner_kind() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        with_builder(&model, |b| {
            let vg = ChildSpec::VariableGroup { name: "vg".into() };
            assert!(matches!(b.generic_add(root, &vg, NativeRef(1)), Err(Error::Structural(_))));
            let m = b
                .generic_add(root, &ChildSpec::ApplicationModule { name: "m".into() }, NativeRef(1))
                .unwrap();
            let group = ChildSpec::ModuleGroup { name: "g".into() };
            assert!(b.generic_add(m, &group, NativeRef(2)).is_err());
            assert!(b.generic_add(m, &vg, NativeRef(2)).is_ok());
        });
    }

    #[test]
    fn test_device_module_trigger() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        let device = ChildSpec::DeviceModule {
            alias_or_cdd: "Dummy0".into(),
            trigger: Some("/trigger/tick".into()),
        };
        let dev = with_builder(&model, |b| b.generic_add(root, &device, NativeRef(1)).unwrap());
        let graph = model.read();
        let Some(VertexProperties::DeviceModule(props)) = graph.vertex(dev) else {
            panic!("not a device module");
        };
        let trigger = props.trigger.expect("trigger");
        assert!(graph
            .out_edges(trigger)
            .any(|(_, e)| e.target == dev && e.props.kind == EdgeKind::Trigger));
        // No namespace of its own.
        assert!(graph
            .out_edges(dev)
            .any(|(_, e)| e.target == root && e.props.kind == EdgeKind::Neighbourhood));
    }

    #[test]
    fn test_attach_and_detach() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        let feed = node(&model, VariableDirection::feeding());
        let consume = node(&model, VariableDirection::consuming());
        let (pv, a, b) = with_builder(&model, |b| {
            let ma = b.generic_add(root, &ChildSpec::ApplicationModule { name: "A".into() }, NativeRef(1)).unwrap();
            let mb = b.generic_add(root, &ChildSpec::ApplicationModule { name: "B".into() }, NativeRef(2)).unwrap();
            let pv = b.add_variable(root, "y").unwrap();
            b.add_variable_node(ma, pv, feed.clone()).unwrap();
            b.add_variable_node(mb, pv, consume.clone()).unwrap();
            (pv, ma, mb)
        });
        {
            let graph = model.read();
            assert!(graph.out_edges(a).any(|(_, e)| e.target == pv && e.props.kind == EdgeKind::PvAccess));
            assert!(graph.out_edges(pv).any(|(_, e)| e.target == b && e.props.kind == EdgeKind::PvAccess));
        }

        with_builder(&model, |b| {
            assert!(b.remove_node(pv, feed.id).unwrap());
            assert!(!b.remove_node(pv, feed.id).unwrap());
        });
        assert!(model.read().contains(pv));

        with_builder(&model, |b| assert!(b.remove_node(pv, consume.id).unwrap()));
        assert!(!model.read().contains(pv));
    }

    #[test]
    fn test_variable_group_accesses_through_module() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        let n = node(&model, VariableDirection::feeding().with_return());
        with_builder(&model, |b| {
            let m = b.generic_add(root, &ChildSpec::ApplicationModule { name: "m".into() }, NativeRef(1)).unwrap();
            let vg = b.generic_add(m, &ChildSpec::VariableGroup { name: "g".into() }, NativeRef(2)).unwrap();
            let inner = b.generic_add(vg, &ChildSpec::VariableGroup { name: "h".into() }, NativeRef(3)).unwrap();
            assert_eq!(b.accessing_module(inner).unwrap(), m);

            let pv = b.add_variable(root, "x").unwrap();
            b.add_variable_node(inner, pv, n.clone()).unwrap();
            let access: Vec<_> = b
                .graph
                .in_edges(pv)
                .filter(|(_, e)| e.props.kind == EdgeKind::PvAccess)
                .map(|(_, e)| (e.source, e.props.with_return_channel))
                .collect();
            assert_eq!(access, vec![(m, true)]);
        });
    }

    #[test]
    fn test_generic_remove_collects_variables() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        let n = node(&model, VariableDirection::feeding());
        let (m, pv) = with_builder(&model, |b| {
            let m = b.generic_add(root, &ChildSpec::ApplicationModule { name: "m".into() }, NativeRef(1)).unwrap();
            let pv = b.add_variable(root, "x").unwrap();
            b.add_variable_node(m, pv, n.clone()).unwrap();
            (m, pv)
        });
        with_builder(&model, |b| {
            assert!(b.generic_remove(root, pv).is_err());
            b.generic_remove(root, m).unwrap();
        });
        let graph = model.read();
        assert!(!graph.contains(m));
        assert!(!graph.contains(pv));
    }

    #[test]
    fn test_same_node_cannot_attach_twice() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        let n = node(&model, VariableDirection::feeding());
        let (m, pv) = with_builder(&model, |b| {
            let m = b.generic_add(root, &ChildSpec::ApplicationModule { name: "m".into() }, NativeRef(1)).unwrap();
            let pv = b.add_variable(root, "x").unwrap();
            b.add_variable_node(m, pv, n.clone()).unwrap();
            (m, pv)
        });
        let edges = model.read().edge_count();
        with_builder(&model, |b| {
            assert!(matches!(b.add_variable_node(m, pv, n.clone()), Err(Error::Structural(_))));
        });
        assert_eq!(model.read().edge_count(), edges);

        with_builder(&model, |b| assert!(b.remove_node(pv, n.id).unwrap()));
        assert!(!model.read().contains(pv));
    }

    #[test]
    fn test_paths_above_root_create_nothing() {
        let model = Model::new(NativeRef(0));
        let root = model.root();
        with_builder(&model, |b| {
            assert!(b.add_directory_recursive(root, "a/../..").is_err());
            assert!(b.add_variable_by_path(root, "b/c/../../../x").is_err());
            assert!(b.add_variable_by_path(root, "d/..").is_err());
            let module = ChildSpec::ApplicationModule { name: "e/../..".into() };
            assert!(b.generic_add(root, &module, NativeRef(1)).is_err());
        });
        assert_eq!(model.read().vertex_count(), 1);

        with_builder(&model, |b| {
            let a = b.add_directory(root, "a").unwrap();
            assert!(b.add_directory_recursive(a, "../..").is_err());
            assert_eq!(b.add_directory_recursive(a, "./..").unwrap(), root);
        });
        assert_eq!(model.read().vertex_count(), 2);
    }
}
