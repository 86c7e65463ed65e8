//! In-memory multigraph store.
//!
//! Vertices and edges live in slot tables indexed by their ids. A removed
//! slot stays empty forever, so ids are never reused and a stale id simply
//! stops resolving.
//!
//! Adjacency lists keep edge insertion order; every traversal built on top
//! of the store inherits that order.

use smallvec::SmallVec;

use crate::model::{EdgeId, EdgeKind, EdgeProperties, VertexId, VertexProperties};
use crate::{Error, Result};

// ============================================================================
// Records
// ============================================================================

/// A stored edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub source: VertexId,
    pub target: VertexId,
    pub props: EdgeProperties,
}

#[derive(Debug)]
struct VertexSlot {
    props: VertexProperties,
    out_edges: SmallVec<[EdgeId; 4]>,
    in_edges: SmallVec<[EdgeId; 4]>,
}

// ============================================================================
// GraphStore
// ============================================================================

/// Directed multigraph with tagged vertex and edge payloads.
#[derive(Debug, Default)]
pub struct GraphStore {
    vertices: Vec<Option<VertexSlot>>,
    edges: Vec<Option<EdgeRecord>>,
    live_vertices: usize,
    live_edges: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Vertices
    // ========================================================================

    pub fn add_vertex(&mut self, props: VertexProperties) -> VertexId {
        let id = VertexId(self.vertices.len() as u64);
        self.vertices.push(Some(VertexSlot {
            props,
            out_edges: SmallVec::new(),
            in_edges: SmallVec::new(),
        }));
        self.live_vertices += 1;
        id
    }

    fn slot(&self, v: VertexId) -> Option<&VertexSlot> {
        self.vertices.get(v.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, v: VertexId) -> Option<&mut VertexSlot> {
        self.vertices.get_mut(v.0 as usize).and_then(Option::as_mut)
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.slot(v).is_some()
    }

    pub fn vertex(&self, v: VertexId) -> Option<&VertexProperties> {
        self.slot(v).map(|s| &s.props)
    }

    pub fn vertex_mut(&mut self, v: VertexId) -> Option<&mut VertexProperties> {
        self.slot_mut(v).map(|s| &mut s.props)
    }

    /// Like [`vertex`](Self::vertex) but raises a structural error for a
    /// removed or unknown vertex.
    pub fn expect_vertex(&self, v: VertexId) -> Result<&VertexProperties> {
        self.vertex(v)
            .ok_or_else(|| Error::Structural(format!("Vertex {v} is not part of the model (anymore).")))
    }

    pub fn expect_vertex_mut(&mut self, v: VertexId) -> Result<&mut VertexProperties> {
        self.vertex_mut(v)
            .ok_or_else(|| Error::Structural(format!("Vertex {v} is not part of the model (anymore).")))
    }

    /// Remove every edge touching `v`. Returns the removed edges.
    pub fn clear_vertex(&mut self, v: VertexId) -> Vec<EdgeRecord> {
        let Some(slot) = self.slot(v) else {
            return Vec::new();
        };
        let mut ids: Vec<EdgeId> = slot.out_edges.iter().chain(slot.in_edges.iter()).copied().collect();
        // Self-loops appear in both lists.
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().filter_map(|e| self.remove_edge(e)).collect()
    }

    /// Clear and remove `v`. Returns its payload.
    pub fn remove_vertex(&mut self, v: VertexId) -> Option<VertexProperties> {
        self.clear_vertex(v);
        let slot = self.vertices.get_mut(v.0 as usize)?.take()?;
        self.live_vertices -= 1;
        Some(slot.props)
    }

    pub fn vertex_count(&self) -> usize {
        self.live_vertices
    }

    /// Live vertices in creation order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexProperties)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (VertexId(i as u64), &s.props)))
    }

    // ========================================================================
    // Edges
    // ========================================================================

    pub fn add_edge(&mut self, source: VertexId, target: VertexId, props: impl Into<EdgeProperties>) -> Result<EdgeId> {
        if !self.contains(source) || !self.contains(target) {
            return Err(Error::Structural(format!(
                "Cannot connect {source} -> {target}: endpoint is not part of the model."
            )));
        }
        Ok(self.link(source, target, props.into()))
    }

    /// Add a vertex that is connected to itself, as the model root is.
    pub fn add_vertex_with_loop(&mut self, props: VertexProperties, kind: EdgeKind) -> VertexId {
        let v = self.add_vertex(props);
        self.link(v, v, kind.into());
        v
    }

    fn link(&mut self, source: VertexId, target: VertexId, props: EdgeProperties) -> EdgeId {
        let id = EdgeId(self.edges.len() as u64);
        self.edges.push(Some(EdgeRecord { source, target, props }));
        if let Some(s) = self.slot_mut(source) {
            s.out_edges.push(id);
        }
        if let Some(t) = self.slot_mut(target) {
            t.in_edges.push(id);
        }
        self.live_edges += 1;
        id
    }

    pub fn edge(&self, e: EdgeId) -> Option<&EdgeRecord> {
        self.edges.get(e.0 as usize).and_then(Option::as_ref)
    }

    /// Remove a single edge. Returns `None` if it was already gone.
    pub fn remove_edge(&mut self, e: EdgeId) -> Option<EdgeRecord> {
        let record = self.edges.get_mut(e.0 as usize)?.take()?;
        if let Some(s) = self.slot_mut(record.source) {
            s.out_edges.retain(|x| *x != e);
        }
        if let Some(t) = self.slot_mut(record.target) {
            t.in_edges.retain(|x| *x != e);
        }
        self.live_edges -= 1;
        Some(record)
    }

    /// Outgoing edges of `v` in insertion order.
    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> + '_ {
        self.slot(v)
            .into_iter()
            .flat_map(|s| s.out_edges.iter())
            .filter_map(|e| self.edge(*e).map(|r| (*e, r)))
    }

    /// Incoming edges of `v` in insertion order.
    pub fn in_edges(&self, v: VertexId) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> + '_ {
        self.slot(v)
            .into_iter()
            .flat_map(|s| s.in_edges.iter())
            .filter_map(|e| self.edge(*e).map(|r| (*e, r)))
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.slot(v).map_or(0, |s| s.in_edges.len())
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.slot(v).map_or(0, |s| s.out_edges.len())
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Live edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (EdgeId(i as u64), r)))
    }
}
