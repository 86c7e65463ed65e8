//! Typed, read-only access to a loaded configuration.

use std::path::Path;

use hashbrown::HashMap;

use super::parser::{self, ArrayEntry, ConfigEntries, ScalarEntry};
use super::tree::{self, ModuleTree};
use super::types::{ConfigArray, ConfigLookup, ConfigValue, UserType};
use crate::lifecycle::{self, AccessorSpec};
use crate::model::{NativeRef, UpdateMode, VariableDirection};
use crate::proxy::{AnyProxy, ApplicationModuleProxy, ModuleGroupProxy, ProcessVariableProxy, VariableGroupProxy};
use crate::{Error, Result};

/// Configuration values loaded from one file.
///
/// Variable names are qualified by their enclosing modules, e.g.
/// `"MyModule/SubModule/var"`. A leading `/` is accepted on lookup.
#[derive(Debug, Clone)]
pub struct ConfigReader {
    file_name: String,
    scalars: HashMap<String, ConfigValue>,
    arrays: HashMap<String, ConfigArray>,
    modules: ModuleTree,
}

fn lookup_key(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

impl ConfigReader {
    /// Parse configuration text. `file_name` only appears in messages.
    pub fn from_str(source: &str, file_name: &str) -> Result<Self> {
        let entries = parser::parse_config(source, file_name)?;
        Self::from_entries(file_name, entries)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.display().to_string();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("ConfigReader: {file_name} does not exist"),
            )));
        }
        let source = std::fs::read_to_string(path)?;
        let reader = Self::from_str(&source, &file_name)?;
        tracing::info!(
            file = %file_name,
            scalars = reader.scalars.len(),
            arrays = reader.arrays.len(),
            "loaded configuration"
        );
        Ok(reader)
    }

    /// Like [`load`](Self::load), but a missing file is not an error.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(
                "Could not load configuration {}, assuming no configuration wanted.",
                path.display()
            );
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Build a reader from raw entries, converting every value to its
    /// declared type.
    pub fn from_entries(file_name: &str, entries: ConfigEntries) -> Result<Self> {
        let fail = |message: String| Error::Parse { file: file_name.to_string(), message };
        let mut reader = Self {
            file_name: file_name.to_string(),
            scalars: HashMap::new(),
            arrays: HashMap::new(),
            modules: ModuleTree::new(),
        };

        for ScalarEntry { name, type_tag, value } in entries.scalars {
            let user_type = parse_type(&type_tag).map_err(&fail)?;
            let converted = ConfigValue::parse(user_type, &value).ok_or_else(|| {
                fail(format!("Cannot convert value '{value}' of variable '{name}' to type '{user_type}'."))
            })?;
            reader.declare(&name).map_err(&fail)?;
            reader.scalars.insert(name, converted);
        }

        for ArrayEntry { name, type_tag, values } in entries.arrays {
            let user_type = parse_type(&type_tag).map_err(&fail)?;
            let raws: Vec<String> = values.into_values().collect();
            let converted = ConfigArray::parse(user_type, &raws).map_err(|i| {
                fail(format!(
                    "Cannot convert value '{}' at index {i} of variable '{name}' to type '{user_type}'.",
                    raws[i]
                ))
            })?;
            reader.declare(&name).map_err(&fail)?;
            reader.arrays.insert(name, converted);
        }

        reader.modules.seal();
        Ok(reader)
    }

    fn declare(&mut self, name: &str) -> std::result::Result<(), String> {
        if self.scalars.contains_key(name) || self.arrays.contains_key(name) {
            return Err(format!("Variable '{name}' is defined more than once."));
        }
        // The tree is unsealed while loading.
        self.modules.get_or_create(tree::branch(name));
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Value of the variable `name`. `T` selects scalar (`u32`) or array
    /// (`Vec<u32>`) lookup, and must match the declared type exactly.
    pub fn get<T: ConfigLookup>(&self, name: &str) -> Result<&T> {
        self.lookup::<T>(name)?.ok_or_else(|| {
            let kind = if T::ARRAY { "array" } else { "scalar" };
            Error::Structural(format!(
                "ConfigReader: Cannot find a {kind} configuration variable of the name '{}' in the config file '{}'.",
                lookup_key(name),
                self.file_name
            ))
        })
    }

    /// Like [`get`](Self::get), but yields `default` when the variable is
    /// absent. A type mismatch is still an error.
    pub fn get_or<'a, T: ConfigLookup>(&'a self, name: &str, default: &'a T) -> Result<&'a T> {
        Ok(self.lookup::<T>(name)?.unwrap_or(default))
    }

    fn lookup<T: ConfigLookup>(&self, name: &str) -> Result<Option<&T>> {
        let key = lookup_key(name);
        let found = if T::ARRAY {
            self.arrays.get(key).map(|a| (T::from_array(a), a.user_type()))
        } else {
            self.scalars.get(key).map(|v| (T::from_scalar(v), v.user_type()))
        };
        match found {
            None => Ok(None),
            Some((Some(value), _)) => Ok(Some(value)),
            Some((None, declared)) => {
                let kind = if T::ARRAY { "array" } else { "scalar" };
                Err(Error::Structural(format!(
                    "ConfigReader: Attempting to read {kind} configuration variable '{key}' with type '{}'. \
                     This does not match type '{declared}' defined in the config file.",
                    T::USER_TYPE
                )))
            }
        }
    }

    /// Declared type of the variable `name`, if present.
    pub fn user_type(&self, name: &str) -> Option<UserType> {
        let key = lookup_key(name);
        self.scalars
            .get(key)
            .map(ConfigValue::user_type)
            .or_else(|| self.arrays.get(key).map(ConfigArray::user_type))
    }

    /// Names of the modules directly below `path`; `""` is the top level.
    /// Unknown paths yield an empty list.
    pub fn get_modules(&self, path: &str) -> Vec<String> {
        self.modules.lookup(path).map(ModuleTree::child_list).unwrap_or_default()
    }

    pub fn module_tree(&self) -> &ModuleTree {
        &self.modules
    }

    /// All variable names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scalars.keys().chain(self.arrays.keys()).map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Mirror the configuration into a model.
    ///
    /// Adds an application module `name` under `owner`, one variable group
    /// per configuration module, and a feeding push-type variable per
    /// configuration value. Returns the new module.
    pub fn register_in_model(
        &self,
        owner: &ModuleGroupProxy,
        name: &str,
        native: NativeRef,
    ) -> Result<ApplicationModuleProxy> {
        let module = owner.add_application_module(name, native)?;
        let mut groups: HashMap<String, VariableGroupProxy> = HashMap::new();
        register_groups(&self.modules, "", &module.as_variable_group(), native, &mut groups)?;
        groups.insert(String::new(), module.as_variable_group());

        let mut attached: Vec<ProcessVariableProxy> = Vec::new();
        for variable in self.names() {
            let group = groups.get(tree::branch(variable)).cloned().ok_or_else(|| {
                Error::Structural(format!("No variable group for configuration variable '{variable}'."))
            })?;
            let accessor = AccessorSpec::new(VariableDirection::feeding(), UpdateMode::Push);
            let (pv, _) = lifecycle::attach_variable(&AnyProxy::from(group), tree::leaf(variable), accessor)?;
            attached.push(pv);
        }
        tracing::debug!(module = name, variables = attached.len(), "registered configuration in model");
        Ok(module)
    }
}

fn parse_type(tag: &str) -> std::result::Result<UserType, String> {
    UserType::from_tag(tag).ok_or_else(|| format!("Incorrect value '{tag}' for attribute 'type' of the 'variable' tag."))
}

fn register_groups(
    node: &ModuleTree,
    prefix: &str,
    parent: &VariableGroupProxy,
    native: NativeRef,
    groups: &mut HashMap<String, VariableGroupProxy>,
) -> Result<()> {
    for (name, child) in node.children() {
        let path = if prefix.is_empty() { name.to_string() } else { format!("{prefix}/{name}") };
        let group = parent.add_variable_group(name, native)?;
        register_groups(child, &path, &group, native, groups)?;
        groups.insert(path, group);
    }
    Ok(())
}
