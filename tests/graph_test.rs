use refgraph::graph::{SceneEdge, SceneGraph};
use refgraph::host::{GraphLock, GraphModel};

/// Helper: a graph with a caller and a callee, locked while built.
fn setup_pair() -> SceneGraph {
    let graph = SceneGraph::with_nodes(["draw", "render"]);
    {
        let _lock = GraphLock::acquire(&graph);
        assert!(graph.add_edge("render", "draw"));
    }
    graph
}

#[test]
fn test_with_nodes_keeps_order_and_dedups() {
    let graph = SceneGraph::with_nodes(["b", "a", "b"]);
    assert_eq!(graph.nodes(), vec!["b".to_string(), "a".to_string()]);
    assert!(graph.has_node("a"));
    assert!(!graph.has_node("c"));
}

#[test]
fn test_add_edge_once() {
    let graph = setup_pair();
    let _lock = GraphLock::acquire(&graph);
    assert!(!graph.add_edge("render", "draw"));
    assert_eq!(
        graph.edges(),
        vec![SceneEdge {
            source: "render".to_string(),
            target: "draw".to_string(),
        }]
    );
}

#[test]
fn test_add_edge_requires_both_nodes() {
    let graph = SceneGraph::with_nodes(["draw"]);
    let _lock = GraphLock::acquire(&graph);
    assert!(!graph.add_edge("paint", "draw"));
    assert!(graph.edges().is_empty());

    graph.add_node("paint");
    assert!(graph.add_edge("paint", "draw"));
}

#[test]
fn test_users_of() {
    let graph = setup_pair();
    {
        let _lock = GraphLock::acquire(&graph);
        graph.add_node("paint");
        graph.add_edge("paint", "draw");
        graph.add_edge("paint", "render");
    }
    assert_eq!(
        graph.users_of("draw"),
        vec!["render".to_string(), "paint".to_string()]
    );
    assert_eq!(graph.users_of("render"), vec!["paint".to_string()]);
    assert!(graph.users_of("paint").is_empty());
}

#[test]
fn test_edges_are_directed() {
    let graph = setup_pair();
    assert!(graph.has_edge("render", "draw"));
    assert!(!graph.has_edge("draw", "render"));
}

#[test]
fn test_select_node_replaces_selection() {
    let graph = setup_pair();
    let _lock = GraphLock::acquire(&graph);
    graph.select_node("draw");
    graph.select_node("render");
    assert_eq!(graph.selected_nodes(), vec!["render".to_string()]);

    // Selecting an unknown node (or nothing) clears the selection.
    graph.select_node("");
    assert!(graph.selected_nodes().is_empty());
}

#[test]
fn test_lock_nests() {
    let graph = SceneGraph::new();
    {
        let _outer = GraphLock::acquire(&graph);
        {
            let _inner = GraphLock::acquire(&graph);
            assert_eq!(graph.lock_depth(), 2);
        }
        assert_eq!(graph.lock_depth(), 1);
    }
    assert_eq!(graph.lock_depth(), 0);

    // Unbalanced releases never underflow.
    graph.release_lock();
    assert_eq!(graph.lock_depth(), 0);
}

#[test]
fn test_unlocked_mutations_counted() {
    let graph = setup_pair();
    assert_eq!(graph.unlocked_mutations(), 0);

    graph.add_node("loose");
    graph.select_node("loose");
    assert_eq!(graph.unlocked_mutations(), 2);
}

#[test]
fn test_edges_serialize() {
    let graph = setup_pair();
    let json = serde_json::to_string(&graph.edges()).unwrap();
    assert_eq!(json, r#"[{"source":"render","target":"draw"}]"#);
}
