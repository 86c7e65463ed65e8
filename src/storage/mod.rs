//! # Model Storage
//!
//! [`GraphStore`] is the multigraph itself. [`Model`] is the shared,
//! reference-counted handle every proxy holds; it owns the store behind a
//! read/write lock.
//!
//! Mutations take the write lock once and run to completion. Traversals
//! take the read lock, collect their hits and release the lock before any
//! visitor runs, so visitors may call back into the model freely.

pub mod memory;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{EdgeKind, NativeRef, NodeId, RootProperties, VertexId, VertexProperties};

pub use memory::{EdgeRecord, GraphStore};

// ============================================================================
// Model
// ============================================================================

/// Shared handle to one application model.
///
/// Cloning is cheap. The store is freed when the last handle (root proxy or
/// any surviving child proxy) is dropped.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

struct ModelInner {
    graph: RwLock<GraphStore>,
    root: VertexId,
    next_node_id: AtomicU64,
}

impl Model {
    /// Create a model holding only the root vertex, which is its own
    /// neighbourhood directory.
    pub fn new(app: NativeRef) -> Self {
        let mut graph = GraphStore::new();
        let root = graph.add_vertex_with_loop(VertexProperties::Root(RootProperties { app }), EdgeKind::Neighbourhood);
        tracing::debug!(vertex = %root, "created application model");
        Self {
            inner: Arc::new(ModelInner {
                graph: RwLock::new(graph),
                root,
                next_node_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn root(&self) -> VertexId {
        self.inner.root
    }

    /// Read access to the store, e.g. for diagnostics.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.inner.graph.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, GraphStore> {
        self.inner.graph.write()
    }

    /// Allocate an id for a new network node.
    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Model) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.read();
        f.debug_struct("Model")
            .field("root", &self.inner.root)
            .field("vertices", &graph.vertex_count())
            .field("edges", &graph.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_own_neighbourhood() {
        let model = Model::new(NativeRef(7));
        let graph = model.read();
        let root = model.root();
        let edges: Vec<_> = graph.out_edges(root).map(|(_, r)| (r.target, r.props.kind)).collect();
        assert_eq!(edges, vec![(root, EdgeKind::Neighbourhood)]);
        assert_eq!(graph.vertex(root).and_then(|p| p.native()), Some(NativeRef(7)));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let model = Model::new(NativeRef::default());
        let a = model.next_node_id();
        let b = model.clone().next_node_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ptr_eq() {
        let a = Model::new(NativeRef::default());
        let b = Model::new(NativeRef::default());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
