//! Qualified paths of vertices.
//!
//! Directories and process variables are addressed through parenthood
//! edges, modules through ownership edges. Module names may carry relative
//! components (`..`, `/abs`), so the collected names are normalised once the
//! walk reaches the root.

use crate::model::{EdgeKind, VertexId, VertexKind};
use crate::storage::GraphStore;
use crate::traversal::{presets, search, SearchConfig};
use crate::traversal::filter::keep_name;
use crate::{Error, Result};

use super::Component;

/// Prefix of paths of vertices no longer connected to the root.
pub const DISJUNCT_MARKER: &str = "<disjunct>";

/// Compute the externally visible path of `v`.
///
/// The root renders as `/`. A vertex whose chain breaks before the root is
/// prefixed with [`DISJUNCT_MARKER`].
pub fn qualified_path(graph: &GraphStore, v: VertexId) -> Result<String> {
    let mut names: Vec<&str> = Vec::new();
    let mut current = v;
    // Ownership and parenthood chains are trees; the bound only guards
    // against a corrupted graph.
    for _ in 0..=graph.vertex_count() {
        let props = graph.expect_vertex(current)?;
        if props.kind() == VertexKind::Root {
            return render(&names, false);
        }
        if let Some(name) = props.name() {
            names.push(name);
        }
        let upwards = if props.kind().is_module() { EdgeKind::Ownership } else { EdgeKind::Parenthood };
        match graph.in_edges(current).find(|(_, e)| e.props.kind == upwards) {
            Some((_, e)) => current = e.source,
            None => return render(&names, true),
        }
    }
    Err(Error::Structural(format!("Cycle detected while computing the path of {v}.")))
}

fn render(names: &[&str], disjunct: bool) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();
    for name in names.iter().rev() {
        for component in super::components(name)? {
            match component {
                Component::Root => segments.clear(),
                Component::Current => {}
                Component::Parent => {
                    // Above a disjunct fragment the parent is unknown.
                    if segments.pop().is_none() && !disjunct {
                        return Err(Error::Structural(format!(
                            "Path component '..' at root level found in '{name}'."
                        )));
                    }
                }
                Component::Name(n) => segments.push(n),
            }
        }
    }
    let prefix = if disjunct { DISJUNCT_MARKER } else { "" };
    Ok(format!("{prefix}/{}", segments.join("/")))
}

/// Resolve `path` starting at `start` along the directory hierarchy.
///
/// Leading `./` is ignored, `..` moves to the parent directory, a leading
/// `/` restarts at `root` and every other segment selects a child directory
/// or variable by name. Returns `None` if any step finds nothing.
pub fn find_by_path(graph: &GraphStore, root: VertexId, start: VertexId, path: &str) -> Option<VertexId> {
    if !graph.contains(start) {
        return None;
    }
    let mut current = start;
    let mut rest = path;
    loop {
        while let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        }
        if rest.is_empty() || rest == "." {
            return Some(current);
        }
        if let Some(stripped) = rest.strip_prefix('/') {
            current = root;
            rest = stripped;
            continue;
        }
        let (head, tail) = rest.split_once('/').unwrap_or((rest, ""));
        let config = if head == ".." {
            presets::get_parent()
        } else {
            SearchConfig { vertex_filter: keep_name(head), ..presets::children() }
        };
        current = search(graph, current, &config.first_hit()).into_iter().next()?;
        rest = tail;
    }
}

/// Whether `v` is still connected to the root along its own hierarchy.
pub fn is_connected(graph: &GraphStore, v: VertexId) -> bool {
    qualified_path(graph, v).is_ok_and(|p| !p.starts_with(DISJUNCT_MARKER))
}
