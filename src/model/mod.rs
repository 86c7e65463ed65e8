//! # Application Model Data
//!
//! Plain data carried by the model graph: vertex payloads, edge properties,
//! network-node descriptors and native back-references.
//!
//! Design rule: no locking, no graph access, no I/O here.
//! This module is pure data.

pub mod vertex;
pub mod edge;
pub mod node;

pub use vertex::{
    VertexId, VertexKind, VertexProperties, NativeRef,
    RootProperties, ModuleGroupProperties, ApplicationModuleProperties,
    VariableGroupProperties, DeviceModuleProperties, ProcessVariableProperties,
    DirectoryProperties,
};
pub use edge::{EdgeId, EdgeKind, EdgeProperties};
pub use node::{NetworkNode, NodeId, NodeType, DataDirection, VariableDirection, UpdateMode};
