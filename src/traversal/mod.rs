//! # Graph Traversal
//!
//! A single search routine parameterised by a [`SearchConfig`]:
//!
//! | Search | Visits |
//! |--------|--------|
//! | `AdjacentOut` | direct successors (default) |
//! | `AdjacentIn` | direct predecessors |
//! | `Adjacent` | successors, then predecessors |
//! | `DepthFirst` | reachable subgraph, depth first, including the start |
//! | `BreadthFirst` | reachable subgraph, level order, including the start |
//!
//! The edge filter restricts which edges are followed. The vertex filter only
//! decides which reached vertices count as hits; it never prunes the walk.
//! Within a branch or level, order follows edge insertion order.

pub mod filter;
pub mod presets;

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::model::VertexId;
use crate::storage::GraphStore;

pub use filter::{EdgeFilter, Filter, VertexFilter};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchType {
    Adjacent,
    AdjacentIn,
    #[default]
    AdjacentOut,
    DepthFirst,
    BreadthFirst,
}

/// What to do with the hits of a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultPolicy {
    #[default]
    CollectAll,
    /// Stop at the first hit.
    FirstHit,
}

/// Parameters of one search.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub search: SearchType,
    pub edge_filter: EdgeFilter,
    pub vertex_filter: VertexFilter,
    pub policy: ResultPolicy,
    /// When the filtered depth-first or breadth-first walk is exhausted,
    /// jump across unfiltered out-edges of the visited vertices into
    /// subtrees not reachable under the edge filter and continue there.
    pub continue_disjunct_trees: bool,
}

impl SearchConfig {
    pub fn new(search: SearchType) -> Self {
        Self { search, ..Self::default() }
    }

    pub fn edges(mut self, filter: EdgeFilter) -> Self {
        self.edge_filter = filter;
        self
    }

    pub fn vertices(mut self, filter: VertexFilter) -> Self {
        self.vertex_filter = filter;
        self
    }

    pub fn first_hit(mut self) -> Self {
        self.policy = ResultPolicy::FirstHit;
        self
    }

    pub fn continue_disjunct_trees(mut self) -> Self {
        self.continue_disjunct_trees = true;
        self
    }
}

// ============================================================================
// Engine
// ============================================================================

struct Hits<'c> {
    config: &'c SearchConfig,
    found: Vec<VertexId>,
}

impl Hits<'_> {
    /// Record `v` if it passes the vertex filter. Returns `true` once the
    /// search should stop.
    fn offer(&mut self, graph: &GraphStore, v: VertexId) -> bool {
        if let Some(props) = graph.vertex(v)
            && self.config.vertex_filter.keep(props)
        {
            self.found.push(v);
        }
        self.done()
    }

    fn done(&self) -> bool {
        self.config.policy == ResultPolicy::FirstHit && !self.found.is_empty()
    }
}

/// Run a search from `start` and return the hits in visit order.
///
/// An unknown `start` yields no hits.
pub fn search(graph: &GraphStore, start: VertexId, config: &SearchConfig) -> Vec<VertexId> {
    let mut hits = Hits { config, found: Vec::new() };
    if !graph.contains(start) {
        return hits.found;
    }
    match config.search {
        SearchType::AdjacentOut => {
            adjacent_out(graph, start, &mut hits);
        }
        SearchType::AdjacentIn => {
            adjacent_in(graph, start, &mut hits);
        }
        SearchType::Adjacent => {
            let _ = adjacent_out(graph, start, &mut hits) || adjacent_in(graph, start, &mut hits);
        }
        SearchType::DepthFirst | SearchType::BreadthFirst => walk(graph, start, &mut hits),
    }
    hits.found
}

fn adjacent_out(graph: &GraphStore, start: VertexId, hits: &mut Hits<'_>) -> bool {
    for (_, edge) in graph.out_edges(start) {
        if hits.config.edge_filter.keep(&edge.props) && hits.offer(graph, edge.target) {
            return true;
        }
    }
    false
}

fn adjacent_in(graph: &GraphStore, start: VertexId, hits: &mut Hits<'_>) -> bool {
    for (_, edge) in graph.in_edges(start) {
        if hits.config.edge_filter.keep(&edge.props) && hits.offer(graph, edge.source) {
            return true;
        }
    }
    false
}

fn walk(graph: &GraphStore, start: VertexId, hits: &mut Hits<'_>) {
    let mut discovered: HashSet<VertexId> = HashSet::new();
    let mut order: Vec<VertexId> = Vec::new();
    let mut scanned = 0usize;
    let mut root = Some(start);

    while let Some(tree_root) = root.take() {
        let stop = match hits.config.search {
            SearchType::BreadthFirst => bfs_tree(graph, tree_root, hits, &mut discovered, &mut order),
            _ => dfs_tree(graph, tree_root, hits, &mut discovered, &mut order),
        };
        if stop || !hits.config.continue_disjunct_trees {
            return;
        }
        // Find the next vertex reachable through any edge from what we saw.
        while root.is_none() && scanned < order.len() {
            let v = order[scanned];
            root = graph
                .out_edges(v)
                .map(|(_, e)| e.target)
                .find(|t| !discovered.contains(t));
            if root.is_none() {
                scanned += 1;
            }
        }
    }
}

fn dfs_tree(
    graph: &GraphStore,
    root: VertexId,
    hits: &mut Hits<'_>,
    discovered: &mut HashSet<VertexId>,
    order: &mut Vec<VertexId>,
) -> bool {
    discovered.insert(root);
    order.push(root);
    if hits.offer(graph, root) {
        return true;
    }
    // (vertex, index of the next out-edge to inspect)
    let mut stack: Vec<(VertexId, usize)> = vec![(root, 0)];
    while let Some(top) = stack.last_mut() {
        let (v, next) = *top;
        let found = graph
            .out_edges(v)
            .enumerate()
            .skip(next)
            .find(|(_, (_, e))| hits.config.edge_filter.keep(&e.props));
        let Some((index, (_, edge))) = found else {
            stack.pop();
            continue;
        };
        top.1 = index + 1;
        let target = edge.target;
        if discovered.insert(target) {
            order.push(target);
            if hits.offer(graph, target) {
                return true;
            }
            stack.push((target, 0));
        }
    }
    false
}

fn bfs_tree(
    graph: &GraphStore,
    root: VertexId,
    hits: &mut Hits<'_>,
    discovered: &mut HashSet<VertexId>,
    order: &mut Vec<VertexId>,
) -> bool {
    discovered.insert(root);
    order.push(root);
    if hits.offer(graph, root) {
        return true;
    }
    let mut queue = VecDeque::from([root]);
    while let Some(v) = queue.pop_front() {
        for (_, edge) in graph.out_edges(v) {
            if !hits.config.edge_filter.keep(&edge.props) || !discovered.insert(edge.target) {
                continue;
            }
            order.push(edge.target);
            if hits.offer(graph, edge.target) {
                return true;
            }
            queue.push_back(edge.target);
        }
    }
    false
}
