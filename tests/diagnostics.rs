/// Validation and graph export over a small hierarchy

use keyed_di::graph_export::exports;
use keyed_di::{
    DefaultGraphExporter, DiError, ExportFormat, GraphExporter, HierarchyGraph, Injector, Mappings, Resolver,
    ValidationError,
};

fn hierarchy() -> Injector {
    let mut mappings = Mappings::new();
    mappings
        .add_value("String name", "Jason".to_string())
        .add_value("Array<StdTypes.Int>", vec![0i64, 1, 2])
        .add_singleton_factory("Example.Person", |inj| inj.get_required::<String>("String name").len());
    let root = Injector::new("root", None, mappings);

    let mut child_mappings = Mappings::new();
    child_mappings.add_value("StdTypes.Int age", 28i64);
    root.create_child("request", child_mappings)
}

#[test]
fn test_validate_reports_missing_in_order() {
    let child = hierarchy();
    let result = child.validate(["String name", "Foo", "StdTypes.Int age", "Bar"]);

    assert!(!result.is_valid());
    assert_eq!(result.resolvable.len(), 2);
    let missing: Vec<_> = result.missing().map(|id| id.to_string()).collect();
    assert_eq!(missing, vec!["Foo", "Bar"]);
    assert!(result.errors.iter().all(|e| matches!(e, ValidationError::Missing { injector, .. } if injector == "root")));

    assert_eq!(
        result.into_result(),
        Err(DiError::Unresolved { id: "Foo".into(), injector: "root".into() })
    );
}

#[test]
fn test_validate_does_not_run_factories() {
    let child = hierarchy();
    let result = child.validate(["Example.Person"]);
    assert!(result.is_valid());
    assert!(!result.resolvable[0].1.resolved);
    assert!(!child.contains_own("Example.Person"));
    assert!(result.into_result().is_ok());
}

#[test]
fn test_graph_reflects_chain() {
    let child = hierarchy();
    let graph = HierarchyGraph::from_injector(&child);

    let names: Vec<_> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["root", "request"]);
    assert_eq!(graph.nodes[1].depth, 1);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.metadata.injector_count, 2);
    assert_eq!(graph.metadata.mapping_count, 4);
    assert!(!graph.metadata.exported_at.is_empty());
}

#[test]
fn test_text_exports() {
    let child = hierarchy();

    let dot = DefaultGraphExporter
        .export(&HierarchyGraph::from_injector(&child), ExportFormat::Dot)
        .unwrap();
    assert!(dot.contains("injector_0 [label=\"{root|"));
    assert!(dot.contains("injector_1 -> injector_0"));

    let mermaid = exports::to_mermaid(&child);
    assert!(mermaid.contains("injector_1[\"request<br/>StdTypes.Int age (singleton)\"]"));
}

#[cfg(feature = "graph-export")]
#[test]
fn test_serialized_exports() {
    let child = hierarchy();
    child.get::<usize>("Example.Person").unwrap();

    let json = exports::to_json(&child).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["injector_count"], 2);
    assert_eq!(value["nodes"][1]["mappings"].as_array().unwrap().len(), 2);

    let yaml = exports::to_yaml(&child).unwrap();
    assert!(yaml.contains("name: request"));
}

#[cfg(feature = "diagnostics")]
#[test]
fn test_debug_string_lists_every_injector() {
    let child = hierarchy();
    let dump = child.to_debug_string();
    assert!(dump.contains("Injector \"request\":"));
    assert!(dump.contains("Injector \"root\":"));
    assert!(dump.contains("  String name: singleton (resolved)"));
}
