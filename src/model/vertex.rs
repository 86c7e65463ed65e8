//! Vertex payloads of the model graph.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::node::NetworkNode;

/// Opaque vertex identifier. Slot indices are never reused, so a stale id
/// never aliases a newer vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle to a native object living outside the graph.
///
/// The value is an index into a slot table owned by the surrounding code
/// (see [`crate::lifecycle::SlotTable`]). Moving the native object only
/// requires updating the handle stored in the vertex via `inform_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NativeRef(pub u64);

impl fmt::Display for NativeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native#{}", self.0)
    }
}

/// Discriminant of [`VertexProperties`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Root,
    ModuleGroup,
    ApplicationModule,
    VariableGroup,
    DeviceModule,
    ProcessVariable,
    Directory,
}

impl VertexKind {
    /// Modules compute their qualified path along ownership edges,
    /// everything else along parenthood edges.
    pub fn is_module(self) -> bool {
        matches!(
            self,
            Self::ModuleGroup | Self::ApplicationModule | Self::VariableGroup | Self::DeviceModule
        )
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Root => "Root",
            Self::ModuleGroup => "ModuleGroup",
            Self::ApplicationModule => "ApplicationModule",
            Self::VariableGroup => "VariableGroup",
            Self::DeviceModule => "DeviceModule",
            Self::ProcessVariable => "ProcessVariable",
            Self::Directory => "Directory",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootProperties {
    pub app: NativeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleGroupProperties {
    pub name: String,
    pub module_group: NativeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationModuleProperties {
    pub name: String,
    pub module: NativeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableGroupProperties {
    pub name: String,
    pub module: NativeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceModuleProperties {
    pub alias_or_cdd: String,
    /// Trigger process variable, if the device is triggered.
    pub trigger: Option<VertexId>,
    pub module: NativeRef,
}

/// Payload of a process variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessVariableProperties {
    pub name: String,
    /// Network nodes in attach order.
    pub nodes: Vec<NetworkNode>,
    pub tags: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryProperties {
    pub name: String,
}

/// Tagged payload of a vertex. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VertexProperties {
    Root(RootProperties),
    ModuleGroup(ModuleGroupProperties),
    ApplicationModule(ApplicationModuleProperties),
    VariableGroup(VariableGroupProperties),
    DeviceModule(DeviceModuleProperties),
    ProcessVariable(ProcessVariableProperties),
    Directory(DirectoryProperties),
}

impl VertexProperties {
    pub fn kind(&self) -> VertexKind {
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

    /// Name of the vertex. Root and device modules have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ModuleGroup(p) => Some(&p.name),
            Self::ApplicationModule(p) => Some(&p.name),
            Self::VariableGroup(p) => Some(&p.name),
            Self::ProcessVariable(p) => Some(&p.name),
            Self::Directory(p) => Some(&p.name),
            Self::Root(_) | Self::DeviceModule(_) => None,
        }
    }

    /// Tags of the vertex. Only process variables carry tags.
    pub fn tags(&self) -> Option<&HashSet<String>> {
        match self {
            Self::ProcessVariable(p) => Some(&p.tags),
            _ => None,
        }
    }

    /// Native back-reference, for the kinds that have one.
    pub fn native(&self) -> Option<NativeRef> {
        match self {
            Self::Root(p) => Some(p.app),
            Self::ModuleGroup(p) => Some(p.module_group),
            Self::ApplicationModule(p) => Some(p.module),
            Self::VariableGroup(p) => Some(p.module),
            Self::DeviceModule(p) => Some(p.module),
            Self::ProcessVariable(_) | Self::Directory(_) => None,
        }
    }

    /// Replace the native back-reference. Returns `false` for kinds without one.
    pub fn set_native(&mut self, native: NativeRef) -> bool {
        let slot = match self {
            Self::Root(p) => &mut p.app,
            Self::ModuleGroup(p) => &mut p.module_group,
            Self::ApplicationModule(p) => &mut p.module,
            Self::VariableGroup(p) => &mut p.module,
            Self::DeviceModule(p) => &mut p.module,
            Self::ProcessVariable(_) | Self::Directory(_) => return false,
        };
        *slot = native;
        true
    }
}
