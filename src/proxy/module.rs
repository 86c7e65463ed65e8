//! Proxies of module vertices.

use crate::model::{NativeRef, NetworkNode, VertexKind, VertexProperties};
use crate::relations::{accessing_module, ChildSpec};
use crate::{Error, Result};

use super::{wrong_kind, ModelProxy, ProcessVariableProxy, ProxyBase};

proxy_type! {
    /// A module group. Obtained from [`RootProxy::as_module_group`](super::RootProxy::as_module_group)
    /// it stands for the application itself.
    ModuleGroupProxy => ModuleGroup
}

proxy_type! {
    ApplicationModuleProxy => ApplicationModule
}

proxy_type! {
    VariableGroupProxy => VariableGroup
}

proxy_type! {
    DeviceModuleProxy => DeviceModule
}

fn add_variable_node(owner: &ProxyBase, pv: &ProcessVariableProxy, node: NetworkNode) -> Result<()> {
    let (pv_model, pv_vertex) = pv.base().handle()?;
    let (model, _) = owner.handle()?;
    if !pv_model.ptr_eq(model) {
        return Err(Error::Structural("Process variable belongs to another model.".into()));
    }
    owner.mutate(|b, v| b.add_variable_node(v, pv_vertex, node))
}

// ============================================================================
// ModuleGroupProxy
// ============================================================================

impl ModuleGroupProxy {
    /// Name of the group. The application root has an empty name.
    pub fn name(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::ModuleGroup(g) => g.name.clone(),
            VertexProperties::Root(_) => String::new(),
            other => wrong_kind("ModuleGroupProxy", other.kind()),
        })
    }

    pub fn module_group(&self) -> Result<NativeRef> {
        self.0.read(|p| match p {
            VertexProperties::ModuleGroup(g) => g.module_group,
            VertexProperties::Root(r) => r.app,
            other => wrong_kind("ModuleGroupProxy", other.kind()),
        })
    }

    pub fn add_module_group(&self, name: &str, native: NativeRef) -> Result<ModuleGroupProxy> {
        let spec = ChildSpec::ModuleGroup { name: name.to_string() };
        Ok(ModuleGroupProxy(self.0.add_child(&spec, native)?))
    }

    pub fn add_application_module(&self, name: &str, native: NativeRef) -> Result<ApplicationModuleProxy> {
        let spec = ChildSpec::ApplicationModule { name: name.to_string() };
        Ok(ApplicationModuleProxy(self.0.add_child(&spec, native)?))
    }

    /// Register a device module. With a `trigger` path, the trigger process
    /// variable is created relative to this group's directory.
    pub fn add_device_module(
        &self,
        alias_or_cdd: &str,
        trigger: Option<&str>,
        native: NativeRef,
    ) -> Result<DeviceModuleProxy> {
        let spec = ChildSpec::DeviceModule {
            alias_or_cdd: alias_or_cdd.to_string(),
            trigger: trigger.map(str::to_string),
        };
        Ok(DeviceModuleProxy(self.0.add_child(&spec, native)?))
    }

    /// Unregister a module owned by this group.
    pub fn remove(&self, child: &impl ModelProxy) -> Result<()> {
        self.0.remove_child(child.base())
    }

    pub fn inform_move(&self, native: NativeRef) -> Result<()> {
        self.0.inform_move(native)
    }
}

// ============================================================================
// ApplicationModuleProxy
// ============================================================================

impl ApplicationModuleProxy {
    pub fn name(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::ApplicationModule(m) => m.name.clone(),
            other => wrong_kind("ApplicationModuleProxy", other.kind()),
        })
    }

    pub fn application_module(&self) -> Result<NativeRef> {
        self.0.read(|p| match p {
            VertexProperties::ApplicationModule(m) => m.module,
            other => wrong_kind("ApplicationModuleProxy", other.kind()),
        })
    }

    /// View this module as the outermost variable group of itself.
    pub fn as_variable_group(&self) -> VariableGroupProxy {
        VariableGroupProxy(self.0.clone())
    }

    pub fn add_variable_group(&self, name: &str, native: NativeRef) -> Result<VariableGroupProxy> {
        let spec = ChildSpec::VariableGroup { name: name.to_string() };
        Ok(VariableGroupProxy(self.0.add_child(&spec, native)?))
    }

    /// Attach `node` to `pv` as an accessor of this module.
    pub fn add_variable(&self, pv: &ProcessVariableProxy, node: NetworkNode) -> Result<()> {
        add_variable_node(&self.0, pv, node)
    }

    pub fn remove(&self, child: &impl ModelProxy) -> Result<()> {
        self.0.remove_child(child.base())
    }

    pub fn inform_move(&self, native: NativeRef) -> Result<()> {
        self.0.inform_move(native)
    }
}

// ============================================================================
// VariableGroupProxy
// ============================================================================

impl VariableGroupProxy {
    pub fn name(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::VariableGroup(g) => g.name.clone(),
            VertexProperties::ApplicationModule(m) => m.name.clone(),
            other => wrong_kind("VariableGroupProxy", other.kind()),
        })
    }

    pub fn variable_group(&self) -> Result<NativeRef> {
        self.0.read(|p| match p {
            VertexProperties::VariableGroup(g) => g.module,
            VertexProperties::ApplicationModule(m) => m.module,
            other => wrong_kind("VariableGroupProxy", other.kind()),
        })
    }

    /// The application module this group belongs to, following ownership
    /// through nested groups.
    pub fn owning_module(&self) -> Result<ApplicationModuleProxy> {
        let module = self.0.read_graph(accessing_module)?;
        let base = self.0.sibling(module)?;
        match base.read(|p| p.kind())? {
            VertexKind::ApplicationModule => Ok(ApplicationModuleProxy(base)),
            other => Err(Error::Structural(format!(
                "VariableGroup is owned by a {other}, not by an ApplicationModule."
            ))),
        }
    }

    pub fn add_variable_group(&self, name: &str, native: NativeRef) -> Result<VariableGroupProxy> {
        let spec = ChildSpec::VariableGroup { name: name.to_string() };
        Ok(VariableGroupProxy(self.0.add_child(&spec, native)?))
    }

    pub fn add_variable(&self, pv: &ProcessVariableProxy, node: NetworkNode) -> Result<()> {
        add_variable_node(&self.0, pv, node)
    }

    pub fn remove(&self, child: &impl ModelProxy) -> Result<()> {
        self.0.remove_child(child.base())
    }

    pub fn inform_move(&self, native: NativeRef) -> Result<()> {
        self.0.inform_move(native)
    }
}

// ============================================================================
// DeviceModuleProxy
// ============================================================================

impl DeviceModuleProxy {
    pub fn alias_or_cdd(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::DeviceModule(d) => d.alias_or_cdd.clone(),
            other => wrong_kind("DeviceModuleProxy", other.kind()),
        })
    }

    pub fn device_module(&self) -> Result<NativeRef> {
        self.0.read(|p| match p {
            VertexProperties::DeviceModule(d) => d.module,
            other => wrong_kind("DeviceModuleProxy", other.kind()),
        })
    }

    /// The trigger variable. Invalid if the device has no trigger or the
    /// trigger variable is gone.
    pub fn trigger(&self) -> Result<ProcessVariableProxy> {
        let trigger = self.0.read(|p| match p {
            VertexProperties::DeviceModule(d) => d.trigger,
            other => wrong_kind("DeviceModuleProxy", other.kind()),
        })?;
        match trigger {
            Some(v) => Ok(ProcessVariableProxy(self.0.sibling(v)?)),
            None => Ok(ProcessVariableProxy::default()),
        }
    }

    /// Attach `node` to `pv` as a register accessor of this device.
    pub fn add_variable(&self, pv: &ProcessVariableProxy, node: NetworkNode) -> Result<()> {
        add_variable_node(&self.0, pv, node)
    }

    pub fn inform_move(&self, native: NativeRef) -> Result<()> {
        self.0.inform_move(native)
    }
}
