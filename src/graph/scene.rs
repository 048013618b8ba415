use std::cell::RefCell;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::host::GraphModel;

/// A directed usage edge between two graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Default)]
struct SceneState {
    nodes: Vec<String>,
    node_set: HashSet<String>,
    edges: Vec<SceneEdge>,
    edge_set: HashSet<SceneEdge>,
    selected: Vec<String>,
    lock_depth: u32,
    unlocked_mutations: u32,
}

impl SceneState {
    fn note_mutation(&mut self) {
        if self.lock_depth == 0 {
            self.unlocked_mutations += 1;
        }
    }
}

/// In-memory graph model shared between the visualization and the reference
/// searcher.
///
/// The lock nests: every `acquire_lock` must be matched by a `release_lock`.
/// Mutations made without holding it are counted rather than rejected.
#[derive(Debug, Default)]
pub struct SceneGraph {
    state: RefCell<SceneState>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph holding the given nodes, in order.
    pub fn with_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let graph = Self::new();
        {
            let mut state = graph.state.borrow_mut();
            for node in nodes {
                let node = node.into();
                if state.node_set.insert(node.clone()) {
                    state.nodes.push(node);
                }
            }
        }
        graph
    }

    pub fn nodes(&self) -> Vec<String> {
        self.state.borrow().nodes.clone()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.state.borrow().node_set.contains(id)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> Vec<SceneEdge> {
        self.state.borrow().edges.clone()
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.state.borrow().edge_set.contains(&SceneEdge {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Nodes with an edge into `id`, i.e. the users of that symbol.
    pub fn users_of(&self, id: &str) -> Vec<String> {
        self.state
            .borrow()
            .edges
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.source.clone())
            .collect()
    }

    pub fn lock_depth(&self) -> u32 {
        self.state.borrow().lock_depth
    }

    /// Number of `add_node`/`add_edge`/`select_node` calls made while the
    /// lock was not held.
    pub fn unlocked_mutations(&self) -> u32 {
        self.state.borrow().unlocked_mutations
    }
}

impl GraphModel for SceneGraph {
    fn acquire_lock(&self) {
        self.state.borrow_mut().lock_depth += 1;
    }

    fn release_lock(&self) {
        let mut state = self.state.borrow_mut();
        state.lock_depth = state.lock_depth.saturating_sub(1);
    }

    fn selected_nodes(&self) -> Vec<String> {
        self.state.borrow().selected.clone()
    }

    fn select_node(&self, id: &str) {
        let mut state = self.state.borrow_mut();
        state.note_mutation();
        state.selected.clear();
        if state.node_set.contains(id) {
            state.selected.push(id.to_string());
        }
    }

    fn add_node(&self, id: &str) {
        let mut state = self.state.borrow_mut();
        state.note_mutation();
        if state.node_set.insert(id.to_string()) {
            state.nodes.push(id.to_string());
        }
    }

    fn add_edge(&self, from: &str, to: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.note_mutation();
        if !state.node_set.contains(from) || !state.node_set.contains(to) {
            return false;
        }
        let edge = SceneEdge {
            source: from.to_string(),
            target: to.to_string(),
        };
        if !state.edge_set.insert(edge.clone()) {
            return false;
        }
        state.edges.push(edge);
        true
    }
}
