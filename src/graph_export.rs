//! Graph export of an injector hierarchy for visualization and debugging.
//!
//! A [`HierarchyGraph`] is a snapshot of one injector chain: a node per
//! injector (with the mappings it owns) and an edge from each child to its
//! parent. DOT and Mermaid output is always available; JSON and YAML need
//! the `graph-export` feature.

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::injector::Injector;

const GRAPH_VERSION: &str = "1.0.0";

/// One injector in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct InjectorNode {
    /// Node identifier, stable within one graph (`injector_0` is the root)
    pub id: String,
    /// Injector name
    pub name: String,
    /// Distance from the root
    pub depth: usize,
    /// Mappings owned by this injector, sorted by identifier
    pub mappings: Vec<MappingNode>,
}

/// One entry of an injector's table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct MappingNode {
    pub id: String,
    pub lifetime: String,
    pub resolved: bool,
    /// True when the entry is unqualified and answers every qualified variant
    pub wildcard: bool,
}

/// Child → parent delegation edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct ParentEdge {
    pub from: String,
    pub to: String,
}

/// Metadata about the exported chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphMetadata {
    pub injector_count: usize,
    pub mapping_count: usize,
    pub singleton_count: usize,
    pub transient_count: usize,
    /// Entries already holding a value (constants and promoted singletons)
    pub resolved_count: usize,
    /// Export timestamp
    pub exported_at: String,
    /// Export format version
    pub version: String,
}

/// Snapshot of an injector chain, root first.
///
/// # Examples
///
/// ```
/// use keyed_di::{Injector, Mappings};
/// use keyed_di::graph_export::HierarchyGraph;
///
/// let mut mappings = Mappings::new();
/// mappings.add_value("String name", "Jason".to_string());
/// let root = Injector::new("root", None, mappings);
/// let child = root.create_child("child", Mappings::new());
///
/// let graph = HierarchyGraph::from_injector(&child);
/// assert_eq!(graph.nodes[0].name, "root");
/// assert_eq!(graph.nodes[1].name, "child");
/// assert_eq!(graph.edges[0].from, "injector_1");
/// assert_eq!(graph.edges[0].to, "injector_0");
/// assert_eq!(graph.metadata.mapping_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct HierarchyGraph {
    pub nodes: Vec<InjectorNode>,
    pub edges: Vec<ParentEdge>,
    pub metadata: GraphMetadata,
}

impl HierarchyGraph {
    /// Captures `injector` and all its ancestors.
    pub fn from_injector(injector: &Injector) -> Self {
        let mut chain: Vec<&Injector> = injector.ancestors().collect();
        chain.reverse();

        let mut nodes = Vec::with_capacity(chain.len());
        let mut edges = Vec::new();
        let (mut singleton_count, mut transient_count, mut resolved_count) = (0, 0, 0);

        for (depth, current) in chain.iter().enumerate() {
            let mappings: Vec<MappingNode> = current
                .descriptors()
                .into_iter()
                .map(|d| {
                    match d.lifetime {
                        crate::Lifetime::Singleton => singleton_count += 1,
                        crate::Lifetime::Transient => transient_count += 1,
                    }
                    if d.resolved {
                        resolved_count += 1;
                    }
                    MappingNode {
                        wildcard: d.is_wildcard(),
                        id: d.id.to_string(),
                        lifetime: d.lifetime.as_str().to_string(),
                        resolved: d.resolved,
                    }
                })
                .collect();

            if depth > 0 {
                edges.push(ParentEdge {
                    from: node_id(depth),
                    to: node_id(depth - 1),
                });
            }
            nodes.push(InjectorNode {
                id: node_id(depth),
                name: current.name().to_string(),
                depth,
                mappings,
            });
        }

        let metadata = GraphMetadata {
            injector_count: nodes.len(),
            mapping_count: singleton_count + transient_count,
            singleton_count,
            transient_count,
            resolved_count,
            exported_at: timestamp(),
            version: GRAPH_VERSION.to_string(),
        };

        Self { nodes, edges, metadata }
    }
}

fn node_id(depth: usize) -> String {
    format!("injector_{}", depth)
}

#[cfg(feature = "graph-export")]
fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(not(feature = "graph-export"))]
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

/// Export formats supported for hierarchy graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON (`graph-export` feature)
    Json,
    /// YAML (`graph-export` feature)
    Yaml,
    /// DOT format for Graphviz
    Dot,
    /// Mermaid format for documentation
    Mermaid,
}

/// Renders a [`HierarchyGraph`] in some format.
pub trait GraphExporter {
    fn export(&self, graph: &HierarchyGraph, format: ExportFormat) -> DiResult<String>;
}

/// Built-in exporter for every [`ExportFormat`].
#[derive(Debug, Default)]
pub struct DefaultGraphExporter;

impl GraphExporter for DefaultGraphExporter {
    fn export(&self, graph: &HierarchyGraph, format: ExportFormat) -> DiResult<String> {
        match format {
            ExportFormat::Json => self.export_json(graph),
            ExportFormat::Yaml => self.export_yaml(graph),
            ExportFormat::Dot => Ok(self.export_dot(graph)),
            ExportFormat::Mermaid => Ok(self.export_mermaid(graph)),
        }
    }
}

impl DefaultGraphExporter {
    #[cfg(feature = "graph-export")]
    fn export_json(&self, graph: &HierarchyGraph) -> DiResult<String> {
        serde_json::to_string_pretty(graph).map_err(|e| serialization_failed("JSON", e))
    }

    #[cfg(not(feature = "graph-export"))]
    fn export_json(&self, _graph: &HierarchyGraph) -> DiResult<String> {
        Err(DiError::Config("JSON export requires the `graph-export` feature".into()))
    }

    #[cfg(feature = "graph-export")]
    fn export_yaml(&self, graph: &HierarchyGraph) -> DiResult<String> {
        serde_yaml::to_string(graph).map_err(|e| serialization_failed("YAML", e))
    }

    #[cfg(not(feature = "graph-export"))]
    fn export_yaml(&self, _graph: &HierarchyGraph) -> DiResult<String> {
        Err(DiError::Config("YAML export requires the `graph-export` feature".into()))
    }

    fn export_dot(&self, graph: &HierarchyGraph) -> String {
        let mut output = String::new();
        output.push_str("digraph InjectorHierarchy {\n");
        output.push_str("  rankdir=BT;\n");
        output.push_str("  node [shape=record];\n\n");

        for node in &graph.nodes {
            let mut label = escape_dot(&node.name);
            for mapping in &node.mappings {
                label.push_str(&format!(
                    "|{} ({}{})",
                    escape_dot(&mapping.id),
                    mapping.lifetime,
                    if mapping.resolved { ", resolved" } else { "" }
                ));
            }
            output.push_str(&format!("  {} [label=\"{{{}}}\"];\n", node.id, label));
        }

        output.push('\n');
        for edge in &graph.edges {
            output.push_str(&format!("  {} -> {} [label=\"parent\"];\n", edge.from, edge.to));
        }

        output.push_str("}\n");
        output
    }

    fn export_mermaid(&self, graph: &HierarchyGraph) -> String {
        let mut output = String::new();
        output.push_str("graph BT\n");

        for node in &graph.nodes {
            let mut label = escape_mermaid(&node.name);
            for mapping in &node.mappings {
                label.push_str(&format!("<br/>{} ({})", escape_mermaid(&mapping.id), mapping.lifetime));
            }
            output.push_str(&format!("  {}[\"{}\"]\n", node.id, label));
        }

        for edge in &graph.edges {
            output.push_str(&format!("  {} -->|parent| {}\n", edge.from, edge.to));
        }

        output.push_str("\n  classDef root fill:#e1f5fe\n");
        if let Some(root) = graph.nodes.first() {
            output.push_str(&format!("  class {} root\n", root.id));
        }
        output
    }
}

// Record labels treat these as field separators
#[cfg(feature = "graph-export")]
fn serialization_failed(format: &str, err: impl std::fmt::Display) -> DiError {
    DiError::Export(format!("{} serialization failed: {}", format, err))
}

fn escape_dot(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '{' | '}' | '|' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_mermaid(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
}

/// Convenience functions for quick graph exports.
pub mod exports {
    use super::*;

    /// Exports `injector`'s chain as JSON.
    pub fn to_json(injector: &Injector) -> DiResult<String> {
        DefaultGraphExporter.export(&HierarchyGraph::from_injector(injector), ExportFormat::Json)
    }

    /// Exports `injector`'s chain as YAML.
    pub fn to_yaml(injector: &Injector) -> DiResult<String> {
        DefaultGraphExporter.export(&HierarchyGraph::from_injector(injector), ExportFormat::Yaml)
    }

    pub fn to_dot(injector: &Injector) -> String {
        DefaultGraphExporter.export_dot(&HierarchyGraph::from_injector(injector))
    }

    pub fn to_mermaid(injector: &Injector) -> String {
        DefaultGraphExporter.export_mermaid(&HierarchyGraph::from_injector(injector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mappings, Resolver};

    fn chain() -> Injector {
        let mut mappings = Mappings::new();
        mappings
            .add_value("Array<StdTypes.Int>", vec![0i64, 1, 2])
            .add_singleton_factory("Example.Person", |_| "person".to_string())
            .add_factory("Int counter", |_| 1u32);
        let root = Injector::new("root", None, mappings);

        let mut child_mappings = Mappings::new();
        child_mappings.add_value("String name", "Jason".to_string());
        root.create_child("child", child_mappings)
    }

    #[test]
    fn counts_and_promotion_show_up() {
        let child = chain();
        let before = HierarchyGraph::from_injector(&child);
        assert_eq!(before.metadata.injector_count, 2);
        assert_eq!(before.metadata.mapping_count, 4);
        assert_eq!(before.metadata.transient_count, 1);
        assert_eq!(before.metadata.resolved_count, 2);
        assert!(before.nodes[0].mappings.iter().any(|m| m.wildcard && m.id == "Array<StdTypes.Int>"));

        child.get::<String>("Example.Person").unwrap();
        let after = HierarchyGraph::from_injector(&child);
        // Promotion lands in the requesting child's table
        assert_eq!(after.nodes[1].mappings.len(), 2);
        assert_eq!(after.metadata.mapping_count, 5);
        assert_eq!(after.metadata.resolved_count, 3);
        assert_eq!(after.metadata.version, GRAPH_VERSION);
    }

    #[test]
    fn dot_output_escapes_record_fields() {
        let dot = exports::to_dot(&chain());
        assert!(dot.starts_with("digraph InjectorHierarchy {"));
        assert!(dot.contains("Array\\<StdTypes.Int\\>"));
        assert!(dot.contains("injector_1 -> injector_0"));
    }

    #[test]
    fn mermaid_output_links_child_to_parent() {
        let mermaid = exports::to_mermaid(&chain());
        assert!(mermaid.starts_with("graph BT\n"));
        assert!(mermaid.contains("injector_1 -->|parent| injector_0"));
        assert!(mermaid.contains("Array#lt;StdTypes.Int#gt;"));
        assert!(mermaid.contains("class injector_0 root"));
    }

    #[cfg(feature = "graph-export")]
    #[test]
    fn json_and_yaml_round_out_the_formats() {
        let child = chain();
        let json = exports::to_json(&child).unwrap();
        let parsed: HierarchyGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.nodes.len(), 2);

        let yaml = exports::to_yaml(&child).unwrap();
        assert!(yaml.contains("injector_count: 2"));
    }

    #[cfg(feature = "graph-export")]
    #[test]
    fn serializer_failures_are_export_errors() {
        let yaml_err = serde_yaml::from_str::<HierarchyGraph>("nodes: [").unwrap_err();
        let err = serialization_failed("YAML", yaml_err);
        assert!(matches!(&err, DiError::Export(msg) if msg.starts_with("YAML serialization failed: ")));
        assert!(err.to_string().starts_with("Export error: "));
    }

    #[cfg(not(feature = "graph-export"))]
    #[test]
    fn serialized_formats_need_the_feature() {
        assert!(matches!(exports::to_json(&chain()), Err(DiError::Config(_))));
    }
}
