//! Model export for inspection and debugging.
//!
//! - [`write_graphviz`]: GraphViz `dot` text, optionally restricted by an
//!   edge and a vertex filter
//! - [`ModelSnapshot`]: a serializable copy of the whole graph
//!
//! ```text
//! dot -Tsvg model.dot > model.svg
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::{EdgeId, EdgeKind, EdgeProperties, VertexId, VertexKind, VertexProperties};
use crate::path::qualified;
use crate::storage::{GraphStore, Model};
use crate::traversal::filter::{EdgeFilter, Filter, VertexFilter};
use crate::Result;

// ============================================================================
// GraphViz
// ============================================================================

fn vertex_style(kind: VertexKind) -> &'static str {
    match kind {
        VertexKind::Root => "fillcolor=grey,style=filled",
        VertexKind::ModuleGroup => "fillcolor=lightskyblue,style=filled",
        VertexKind::ApplicationModule => "fillcolor=cyan,style=filled",
        VertexKind::VariableGroup => "fillcolor=springgreen,style=filled",
        VertexKind::DeviceModule => "fillcolor=yellow,style=filled",
        VertexKind::ProcessVariable => "color=black",
        VertexKind::Directory => "fillcolor=peachpuff,style=filled",
    }
}

fn edge_style(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Parenthood => "color=red,arrowhead=diamond",
        EdgeKind::Ownership => "color=blue,arrowhead=odot",
        EdgeKind::PvAccess => "color=black",
        EdgeKind::Neighbourhood => "color=olive,arrowhead=tee",
        EdgeKind::Trigger => "color=grey,arrowhead=crow",
    }
}

fn vertex_label(props: &VertexProperties) -> String {
    let kind = props.kind();
    match props {
        VertexProperties::Root(_) => "Root".to_string(),
        VertexProperties::DeviceModule(d) => format!("{kind}: {}", d.alias_or_cdd),
        VertexProperties::ProcessVariable(pv) => {
            let mut label = format!("{kind}: {}", pv.name);
            for node in &pv.nodes {
                label.push_str(&format!("\\n{} {:?} {:?}", node.id, node.direction.dir, node.mode));
            }
            label
        }
        other => format!("{kind}: {}", other.name().unwrap_or_default()),
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

/// Write the model as a GraphViz digraph.
///
/// Vertices rejected by `vertices` are left out together with their edges.
pub fn write_graphviz(
    model: &Model,
    writer: &mut dyn Write,
    edges: &EdgeFilter,
    vertices: &VertexFilter,
) -> Result<()> {
    let graph = model.read();
    write_graph(&graph, writer, edges, vertices)
}

fn write_graph(
    graph: &GraphStore,
    writer: &mut dyn Write,
    edges: &EdgeFilter,
    vertices: &VertexFilter,
) -> Result<()> {
    let kept = |v: VertexId| graph.vertex(v).is_some_and(|p| vertices.keep(p));

    writeln!(writer, "digraph model {{")?;
    for (v, props) in graph.vertices().filter(|(_, p)| vertices.keep(p)) {
        writeln!(
            writer,
            "  {} [label=\"{}\",{}];",
            v.0,
            escape_label(&vertex_label(props)),
            vertex_style(props.kind())
        )?;
    }
    for (_, edge) in graph.edges() {
        if !edges.keep(&edge.props) || !kept(edge.source) || !kept(edge.target) {
            continue;
        }
        writeln!(writer, "  {} -> {} [{}];", edge.source.0, edge.target.0, edge_style(edge.props.kind))?;
    }
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write the whole model as GraphViz to `path`.
pub fn write_graphviz_file(model: &Model, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_graphviz(model, &mut writer, &EdgeFilter::keep_all(), &VertexFilter::keep_all())?;
    writer.flush()?;
    tracing::debug!(path = %path.as_ref().display(), "wrote graphviz export");
    Ok(())
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VertexSnapshot {
    pub id: VertexId,
    /// Qualified path, absent if it cannot be resolved.
    pub path: Option<String>,
    pub props: VertexProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub props: EdgeProperties,
}

/// Point-in-time copy of a model, in id order.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSnapshot {
    pub root: VertexId,
    pub vertices: Vec<VertexSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl ModelSnapshot {
    pub fn capture(model: &Model) -> Self {
        let graph = model.read();
        let vertices = graph
            .vertices()
            .map(|(id, props)| VertexSnapshot {
                id,
                path: qualified::qualified_path(&graph, id).ok(),
                props: props.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .map(|(id, e)| EdgeSnapshot { id, source: e.source, target: e.target, props: e.props })
            .collect();
        Self { root: model.root(), vertices, edges }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn vertices_of_kind(&self, kind: VertexKind) -> impl Iterator<Item = &VertexSnapshot> {
        self.vertices.iter().filter(move |v| v.props.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NativeRef;
    use crate::proxy::{ModelProxy, RootProxy};
    use crate::traversal::filter::{keep_directories, keep_parenthood, keep_root, or};

    fn sample() -> RootProxy {
        let root = RootProxy::new(NativeRef(0));
        let module = root.add_application_module("Mod", NativeRef(1)).unwrap();
        let pv = root.add_directory("Mod").unwrap().add_variable("value").unwrap();
        let node = crate::model::NetworkNode::new(
            root.model().unwrap().next_node_id(),
            crate::model::NodeType::Application,
            crate::model::VariableDirection::feeding(),
            crate::model::UpdateMode::Push,
        );
        module.add_variable(&pv, node).unwrap();
        root
    }

    fn dot(root: &RootProxy, edges: &EdgeFilter, vertices: &VertexFilter) -> String {
        let mut out = Vec::new();
        write_graphviz(root.model().unwrap(), &mut out, edges, vertices).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_graphviz_styles() {
        let root = sample();
        let text = dot(&root, &EdgeFilter::keep_all(), &VertexFilter::keep_all());
        assert!(text.starts_with("digraph model {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("label=\"Root\",fillcolor=grey"));
        assert!(text.contains("label=\"ApplicationModule: Mod\",fillcolor=cyan"));
        assert!(text.contains("fillcolor=peachpuff"));
        assert!(text.contains("color=blue,arrowhead=odot"));
        assert!(text.contains("color=red,arrowhead=diamond"));
    }

    #[test]
    fn test_graphviz_filters() {
        let root = sample();
        let text = dot(&root, &keep_parenthood(), &or(keep_root(), keep_directories()));
        assert!(!text.contains("cyan"));
        assert!(!text.contains("ProcessVariable"));
        assert!(!text.contains("odot"));
        assert!(text.contains("Directory: Mod"));
        assert!(text.contains("arrowhead=diamond"));
    }

    #[test]
    fn test_snapshot_json() {
        let root = sample();
        let snapshot = ModelSnapshot::capture(root.model().unwrap());
        assert_eq!(Some(snapshot.root), root.vertex());
        let pv = snapshot.vertices_of_kind(VertexKind::ProcessVariable).next().unwrap();
        assert_eq!(pv.path.as_deref(), Some("/Mod/value"));

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["vertices"].as_array().unwrap().len(), snapshot.vertices.len());
        assert_eq!(json["edges"].as_array().unwrap().len(), snapshot.edges.len());
    }

    #[test]
    fn test_graphviz_file() {
        let root = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.dot");
        write_graphviz_file(root.model().unwrap(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("digraph model"));
    }
}
