//! # pvmodel: Application Object Model for Process-Variable Applications
//!
//! Tracks how the modules of a control application are nested and wired
//! together: which module owns which, which directory each module and
//! process variable appears in, and which modules access which variable.
//!
//! ## Design Principles
//!
//! 1. **One graph, many views**: every relationship is an edge kind in a
//!    single multigraph; questions are answered by filtered traversals
//! 2. **Proxies, not pointers**: external code holds typed proxies that
//!    stay valid as long as their vertex exists
//! 3. **Stable native references**: vertices point back at native objects
//!    through indices, updated explicitly when objects move
//! 4. **Paths are derived**: qualified names are computed from the graph,
//!    never stored
//!
//! ## Quick Start
//!
//! ```rust
//! use pvmodel::model::{NativeRef, UpdateMode, VariableDirection};
//! use pvmodel::lifecycle::{attach_variable, AccessorSpec};
//! use pvmodel::proxy::{AnyProxy, ModelProxy, RootProxy};
//!
//! # fn example() -> pvmodel::Result<()> {
//! let root = RootProxy::new(NativeRef(0));
//! let group = root.add_module_group("Motors", NativeRef(1))?;
//! let module = group.add_application_module("Controller", NativeRef(2))?;
//!
//! let accessor = AccessorSpec::new(VariableDirection::feeding(), UpdateMode::Push);
//! let (pv, _node) = attach_variable(&AnyProxy::from(module), "../speed", accessor)?;
//! assert_eq!(pv.qualified_path()?, "/Motors/speed");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | vertex and edge payloads, network nodes |
//! | [`storage`] | the multigraph and the shared [`Model`] handle |
//! | [`traversal`] | filtered searches and preset queries |
//! | [`path`] | name validation, path resolution, qualified paths |
//! | [`relations`] | structural mutations that keep the graph consistent |
//! | [`proxy`] | typed handles onto vertices |
//! | [`lifecycle`] | registration of native objects and accessors |
//! | [`device`] | device backends and register attachment |
//! | [`config`] | XML configuration reader |
//! | [`export`] | GraphViz and JSON export |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod traversal;
pub mod path;
pub mod relations;
pub mod proxy;
pub mod lifecycle;
pub mod device;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    EdgeKind, NativeRef, NetworkNode, NodeId, NodeType, UpdateMode,
    VariableDirection, VertexId, VertexKind,
};
pub use storage::Model;
pub use traversal::{search, ResultPolicy, SearchConfig, SearchType};
pub use proxy::{
    AnyProxy, ApplicationModuleProxy, DeviceModuleProxy, DirectoryProxy,
    ModelProxy, ModuleGroupProxy, ProcessVariableProxy, RootProxy,
    VariableGroupProxy,
};
pub use relations::ChildSpec;
pub use lifecycle::{AccessorSpec, Registration, SlotTable};
pub use config::ConfigReader;

// ============================================================================
// Error types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Misuse of the model: illegal names, paths escaping the root,
    /// invalid proxies, failed or mistyped lookups.
    #[error("{0}")]
    Structural(String),

    #[error("ConfigReader: Error parsing the config file '{file}': {message}")]
    Parse { file: String, message: String },

    /// Reported by a device backend.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
