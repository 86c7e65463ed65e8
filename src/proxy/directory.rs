//! Proxy of a directory.

use crate::model::VertexProperties;
use crate::Result;

use super::{wrong_kind, AnyProxy, ProcessVariableProxy};

proxy_type! {
    /// A directory of the qualified-path namespace. Obtained from
    /// [`RootProxy::as_directory`](super::RootProxy::as_directory) it is the
    /// top-level directory.
    DirectoryProxy => Directory
}

impl DirectoryProxy {
    /// Name of the directory. The top-level directory has an empty name.
    pub fn name(&self) -> Result<String> {
        self.0.read(|p| match p {
            VertexProperties::Directory(d) => d.name.clone(),
            VertexProperties::Root(_) => String::new(),
            other => wrong_kind("DirectoryProxy", other.kind()),
        })
    }

    /// Find or create the sub-directory `name`.
    pub fn add_directory(&self, name: &str) -> Result<DirectoryProxy> {
        let dir = self.0.mutate(|b, v| b.add_directory(v, name))?;
        Ok(DirectoryProxy(self.0.sibling(dir)?))
    }

    /// Find or create every directory along `path`.
    pub fn add_directory_recursive(&self, path: &str) -> Result<DirectoryProxy> {
        let dir = self.0.mutate(|b, v| b.add_directory_recursive(v, path))?;
        Ok(DirectoryProxy(self.0.sibling(dir)?))
    }

    /// Find or create the process variable `name` in this directory.
    pub fn add_variable(&self, name: &str) -> Result<ProcessVariableProxy> {
        let pv = self.0.mutate(|b, v| b.add_variable(v, name))?;
        Ok(ProcessVariableProxy(self.0.sibling(pv)?))
    }

    pub fn visit_by_path(&self, path: &str, visitor: impl FnOnce(AnyProxy)) -> Result<bool> {
        self.0.visit_by_path(path, visitor)
    }
}
