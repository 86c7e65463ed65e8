//! # Model Proxies
//!
//! Typed, cheaply clonable views onto one vertex of a [`Model`]. Proxies are
//! the only way external code touches the graph.
//!
//! | Proxy | Vertex kind | Adds |
//! |-------|-------------|------|
//! | [`RootProxy`] | Root | module groups, application modules, devices, directories |
//! | [`ModuleGroupProxy`] | ModuleGroup | module groups, application modules, devices |
//! | [`ApplicationModuleProxy`] | ApplicationModule | variable groups, variables |
//! | [`VariableGroupProxy`] | VariableGroup | variable groups, variables |
//! | [`DeviceModuleProxy`] | DeviceModule | variables |
//! | [`ProcessVariableProxy`] | ProcessVariable | tags |
//! | [`DirectoryProxy`] | Directory | directories, variables |
//!
//! A proxy stays valid as long as its vertex exists. Operating on an invalid
//! proxy is a structural error. Equality is identity: same model, same vertex.

/// Newtype boilerplate shared by the typed proxies.
macro_rules! proxy_type {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name(pub(crate) $crate::proxy::ProxyBase);

        impl $crate::proxy::ModelProxy for $name {
            fn base(&self) -> &$crate::proxy::ProxyBase {
                &self.0
            }
        }

        impl From<$name> for $crate::proxy::AnyProxy {
            fn from(proxy: $name) -> Self {
                Self::$variant(proxy)
            }
        }
    };
}

mod directory;
mod module;
mod root;
mod variable;

use std::fmt;

use crate::model::{NativeRef, VertexId, VertexKind};
use crate::path::qualified;
use crate::relations::{ChildSpec, RelationshipBuilder};
use crate::storage::{GraphStore, Model};
use crate::traversal::{search, SearchConfig};
use crate::{Error, Result};

pub use directory::DirectoryProxy;
pub use module::{ApplicationModuleProxy, DeviceModuleProxy, ModuleGroupProxy, VariableGroupProxy};
pub use root::RootProxy;
pub use variable::ProcessVariableProxy;

// ============================================================================
// ProxyBase
// ============================================================================

/// Shared handle plus vertex id. The default value is an invalid proxy.
#[derive(Clone, Default)]
pub struct ProxyBase {
    handle: Option<(Model, VertexId)>,
}

impl ProxyBase {
    pub(crate) fn new(model: Model, vertex: VertexId) -> Self {
        Self { handle: Some((model, vertex)) }
    }

    pub(crate) fn handle(&self) -> Result<(&Model, VertexId)> {
        self.handle
            .as_ref()
            .map(|(m, v)| (m, *v))
            .ok_or_else(|| Error::Structural("Operation on an invalid proxy.".into()))
    }

    pub fn is_valid(&self) -> bool {
        self.handle.as_ref().is_some_and(|(m, v)| m.read().contains(*v))
    }

    pub fn model(&self) -> Option<&Model> {
        self.handle.as_ref().map(|(m, _)| m)
    }

    pub fn vertex(&self) -> Option<VertexId> {
        self.handle.as_ref().map(|(_, v)| *v)
    }

    /// A proxy for another vertex of the same model.
    pub(crate) fn sibling(&self, vertex: VertexId) -> Result<Self> {
        let (model, _) = self.handle()?;
        Ok(Self::new(model.clone(), vertex))
    }

    /// Run `f` on the payload under the read lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&crate::model::VertexProperties) -> R) -> Result<R> {
        let (model, v) = self.handle()?;
        let graph = model.read();
        Ok(f(graph.expect_vertex(v)?))
    }

    /// Run `f` on the whole store under the read lock.
    pub(crate) fn read_graph<R>(&self, f: impl FnOnce(&GraphStore, VertexId) -> Result<R>) -> Result<R> {
        let (model, v) = self.handle()?;
        let graph = model.read();
        graph.expect_vertex(v)?;
        f(&graph, v)
    }

    /// Run one mutation under the write lock.
    pub(crate) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut RelationshipBuilder<'_>, VertexId) -> Result<R>,
    ) -> Result<R> {
        let (model, v) = self.handle()?;
        let mut graph = model.write();
        graph.expect_vertex(v)?;
        let mut builder = RelationshipBuilder::new(&mut graph, model.root());
        f(&mut builder, v)
    }

    pub(crate) fn add_child(&self, child: &ChildSpec, native: NativeRef) -> Result<Self> {
        let v = self.mutate(|b, owner| b.generic_add(owner, child, native))?;
        self.sibling(v)
    }

    pub(crate) fn remove_child(&self, child: &ProxyBase) -> Result<()> {
        let (model, child_vertex) = child.handle()?;
        let (own_model, _) = self.handle()?;
        if !model.ptr_eq(own_model) {
            return Err(Error::Structural("Cannot remove a module of another model.".into()));
        }
        self.mutate(|b, owner| b.generic_remove(owner, child_vertex))
    }

    pub(crate) fn inform_move(&self, native: NativeRef) -> Result<()> {
        self.mutate(|b, v| b.inform_move(v, native))
    }

    pub(crate) fn visit_by_path(&self, path: &str, visitor: impl FnOnce(AnyProxy)) -> Result<bool> {
        let (model, v) = self.handle()?;
        let found = {
            let graph = model.read();
            graph.expect_vertex(v)?;
            qualified::find_by_path(&graph, model.root(), v, path)
                .and_then(|hit| graph.vertex(hit).map(|p| (hit, p.kind())))
        };
        match found {
            Some((hit, kind)) => {
                visitor(AnyProxy::new(model.clone(), hit, kind));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl PartialEq for ProxyBase {
    fn eq(&self, other: &Self) -> bool {
        match (&self.handle, &other.handle) {
            (Some((ma, va)), Some((mb, vb))) => va == vb && ma.ptr_eq(mb),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for ProxyBase {}

impl fmt::Debug for ProxyBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vertex() {
            Some(v) => write!(f, "Proxy({v})"),
            None => f.write_str("Proxy(invalid)"),
        }
    }
}

/// Panic for an access to the wrong payload variant behind a typed proxy.
#[track_caller]
pub(crate) fn wrong_kind(proxy: &str, found: VertexKind) -> ! {
    panic!("{proxy} refers to a {found} vertex")
}

// ============================================================================
// ModelProxy
// ============================================================================

/// Operations shared by every proxy type.
pub trait ModelProxy {
    fn base(&self) -> &ProxyBase;

    fn is_valid(&self) -> bool {
        self.base().is_valid()
    }

    fn vertex(&self) -> Option<VertexId> {
        self.base().vertex()
    }

    fn kind(&self) -> Result<VertexKind> {
        self.base().read(|p| p.kind())
    }

    /// Externally visible path, e.g. `/Group/Module/variable`.
    fn qualified_path(&self) -> Result<String> {
        self.base().read_graph(qualified::qualified_path)
    }

    /// All hits of a search from this vertex, honouring the config's
    /// result policy.
    fn collect(&self, config: &SearchConfig) -> Result<Vec<AnyProxy>> {
        let base = self.base();
        let (model, _) = base.handle()?;
        base.read_graph(|graph, v| {
            Ok(search(graph, v, config)
                .into_iter()
                .filter_map(|hit| graph.vertex(hit).map(|p| AnyProxy::new(model.clone(), hit, p.kind())))
                .collect())
        })
    }

    /// Call `visitor` for each hit. The model is unlocked while it runs.
    fn visit(&self, config: &SearchConfig, visitor: impl FnMut(AnyProxy)) -> Result<()> {
        self.collect(config)?.into_iter().for_each(visitor);
        Ok(())
    }

    /// Map each hit through `visitor` and collect the results.
    fn visit_map<R>(&self, config: &SearchConfig, visitor: impl FnMut(AnyProxy) -> R) -> Result<Vec<R>> {
        Ok(self.collect(config)?.into_iter().map(visitor).collect())
    }

    /// Map the first hit through `visitor`, regardless of the config's policy.
    fn visit_first<R>(&self, config: &SearchConfig, visitor: impl FnOnce(AnyProxy) -> R) -> Result<Option<R>> {
        let config = config.clone().first_hit();
        Ok(self.collect(&config)?.into_iter().next().map(visitor))
    }
}

// ============================================================================
// AnyProxy
// ============================================================================

/// A proxy of any kind, as handed to visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyProxy {
    Root(RootProxy),
    ModuleGroup(ModuleGroupProxy),
    ApplicationModule(ApplicationModuleProxy),
    VariableGroup(VariableGroupProxy),
    DeviceModule(DeviceModuleProxy),
    ProcessVariable(ProcessVariableProxy),
    Directory(DirectoryProxy),
}

fn expected(what: &str) -> Error {
    Error::Structural(format!("{what} expected, something else found."))
}

impl AnyProxy {
    pub(crate) fn new(model: Model, vertex: VertexId, kind: VertexKind) -> Self {
        let base = ProxyBase::new(model, vertex);
        match kind {
            VertexKind::Root => Self::Root(RootProxy(base)),
            VertexKind::ModuleGroup => Self::ModuleGroup(ModuleGroupProxy(base)),
            VertexKind::ApplicationModule => Self::ApplicationModule(ApplicationModuleProxy(base)),
            VertexKind::VariableGroup => Self::VariableGroup(VariableGroupProxy(base)),
            VertexKind::DeviceModule => Self::DeviceModule(DeviceModuleProxy(base)),
            VertexKind::ProcessVariable => Self::ProcessVariable(ProcessVariableProxy(base)),
            VertexKind::Directory => Self::Directory(DirectoryProxy(base)),
        }
    }

    /// Kind of the proxy, known without touching the model.
    pub fn proxy_kind(&self) -> VertexKind {
        match self {
            Self::Root(_) => VertexKind::Root,
            Self::ModuleGroup(_) => VertexKind::ModuleGroup,
            Self::ApplicationModule(_) => VertexKind::ApplicationModule,
            Self::VariableGroup(_) => VertexKind::VariableGroup,
            Self::DeviceModule(_) => VertexKind::DeviceModule,
            Self::ProcessVariable(_) => VertexKind::ProcessVariable,
            Self::Directory(_) => VertexKind::Directory,
        }
    }

    /// Name of the vertex; empty for the root and for device modules.
    pub fn name(&self) -> Result<String> {
        self.base().read(|p| p.name().unwrap_or_default().to_string())
    }

    pub fn into_module_group(self) -> Result<ModuleGroupProxy> {
        match self {
            Self::ModuleGroup(p) => Ok(p),
            _ => Err(expected("ModuleGroupProxy")),
        }
    }

    pub fn into_application_module(self) -> Result<ApplicationModuleProxy> {
        match self {
            Self::ApplicationModule(p) => Ok(p),
            _ => Err(expected("ApplicationModuleProxy")),
        }
    }

    pub fn into_variable_group(self) -> Result<VariableGroupProxy> {
        match self {
            Self::VariableGroup(p) => Ok(p),
            _ => Err(expected("VariableGroupProxy")),
        }
    }

    pub fn into_device_module(self) -> Result<DeviceModuleProxy> {
        match self {
            Self::DeviceModule(p) => Ok(p),
            _ => Err(expected("DeviceModuleProxy")),
        }
    }

    pub fn into_process_variable(self) -> Result<ProcessVariableProxy> {
        match self {
            Self::ProcessVariable(p) => Ok(p),
            _ => Err(expected("ProcessVariableProxy")),
        }
    }

    /// The root doubles as the top-level directory.
    pub fn into_directory(self) -> Result<DirectoryProxy> {
        match self {
            Self::Directory(p) => Ok(p),
            Self::Root(r) => Ok(r.as_directory()),
            _ => Err(expected("DirectoryProxy")),
        }
    }
}

impl ModelProxy for AnyProxy {
    fn base(&self) -> &ProxyBase {
        match self {
            Self::Root(p) => p.base(),
            Self::ModuleGroup(p) => p.base(),
            Self::ApplicationModule(p) => p.base(),
            Self::VariableGroup(p) => p.base(),
            Self::DeviceModule(p) => p.base(),
            Self::ProcessVariable(p) => p.base(),
            Self::Directory(p) => p.base(),
        }
    }
}
