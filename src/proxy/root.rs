//! Proxy of the application root.

use crate::model::{NativeRef, VertexProperties};
use crate::storage::Model;
use crate::Result;

use super::{
    wrong_kind, AnyProxy, ApplicationModuleProxy, DeviceModuleProxy, DirectoryProxy,
    ModuleGroupProxy, ProcessVariableProxy, ProxyBase,
};

proxy_type! {
    /// The application root. It is both the top-level module group and the
    /// top-level directory.
    RootProxy => Root
}

impl RootProxy {
    /// Create a new, empty model for the application `app`.
    pub fn new(app: NativeRef) -> Self {
        let model = Model::new(app);
        let root = model.root();
        Self(ProxyBase::new(model, root))
    }

    pub fn app(&self) -> Result<NativeRef> {
        self.0.read(|p| match p {
            VertexProperties::Root(r) => r.app,
            other => wrong_kind("RootProxy", other.kind()),
        })
    }

    pub fn model(&self) -> Option<&Model> {
        self.0.model()
    }

    pub fn as_module_group(&self) -> ModuleGroupProxy {
        ModuleGroupProxy(self.0.clone())
    }

    pub fn as_directory(&self) -> DirectoryProxy {
        DirectoryProxy(self.0.clone())
    }

    pub fn add_module_group(&self, name: &str, native: NativeRef) -> Result<ModuleGroupProxy> {
        self.as_module_group().add_module_group(name, native)
    }

    pub fn add_application_module(&self, name: &str, native: NativeRef) -> Result<ApplicationModuleProxy> {
        self.as_module_group().add_application_module(name, native)
    }

    pub fn add_device_module(
        &self,
        alias_or_cdd: &str,
        trigger: Option<&str>,
        native: NativeRef,
    ) -> Result<DeviceModuleProxy> {
        self.as_module_group().add_device_module(alias_or_cdd, trigger, native)
    }

    pub fn add_directory(&self, name: &str) -> Result<DirectoryProxy> {
        self.as_directory().add_directory(name)
    }

    pub fn add_directory_recursive(&self, path: &str) -> Result<DirectoryProxy> {
        self.as_directory().add_directory_recursive(path)
    }

    pub fn add_variable(&self, name: &str) -> Result<ProcessVariableProxy> {
        self.as_directory().add_variable(name)
    }

    /// Unregister a module owned directly by the application.
    pub fn remove(&self, child: &impl super::ModelProxy) -> Result<()> {
        self.0.remove_child(child.base())
    }

    pub fn visit_by_path(&self, path: &str, visitor: impl FnOnce(AnyProxy)) -> Result<bool> {
        self.0.visit_by_path(path, visitor)
    }

    pub fn inform_move(&self, app: NativeRef) -> Result<()> {
        self.0.inform_move(app)
    }
}
