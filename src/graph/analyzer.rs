use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::graph::{EdgeType, Graph, NodeStatus, NodeType, ViewType};
use crate::graph::viz;

/// Read-only analysis over one graph document. Never mutates its input, so
/// it is safe to call repeatedly or share across callers.
pub struct GraphAnalyzer<'a> {
    graph: &'a Graph,
}

/// Summary record for `--stats`. Counts for a missing node type, node
/// status, or edge type fall under the "unknown" bucket.
#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total_nodes: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub nodes_by_status: BTreeMap<String, usize>,
    pub total_edges: usize,
    pub edges_by_type: BTreeMap<String, usize>,
    pub blocking_chains: Vec<Vec<String>>,
    pub orphaned_nodes: Vec<String>,
}

impl<'a> GraphAnalyzer<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    pub fn render(&self, view: ViewType) -> String {
        match view {
            ViewType::Full => viz::render_full(self.graph),
            ViewType::Critical => viz::render_critical(self.graph),
            ViewType::Status => viz::render_status(self.graph),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let mut nodes_by_type: BTreeMap<String, usize> = BTreeMap::new();
        let mut nodes_by_status: BTreeMap<String, usize> = BTreeMap::new();
        for node in self.graph.nodes.values() {
            let kind = node.kind.as_ref().map_or("unknown", NodeType::as_str);
            let status = node.status.as_ref().map_or("unknown", NodeStatus::as_str);
            *nodes_by_type.entry(kind.to_string()).or_insert(0) += 1;
            *nodes_by_status.entry(status.to_string()).or_insert(0) += 1;
        }

        let mut edges_by_type: BTreeMap<String, usize> = BTreeMap::new();
        for edge in &self.graph.edges {
            let kind = edge.kind.as_ref().map_or("unknown", EdgeType::as_str);
            *edges_by_type.entry(kind.to_string()).or_insert(0) += 1;
        }

        Statistics {
            total_nodes: self.graph.nodes.len(),
            nodes_by_type,
            nodes_by_status,
            total_edges: self.graph.edges.len(),
            edges_by_type,
            blocking_chains: self.blocking_chains(),
            orphaned_nodes: self.orphaned_nodes(),
        }
    }

    /// Maximal paths through "blocks" edges, length > 1. The walk shares one
    /// visited set across all start nodes, which bounds the work to the edge
    /// count and makes a blocking cycle terminate without producing a chain
    /// past the point where it reconnects.
    fn blocking_chains(&self) -> Vec<Vec<String>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut starts: Vec<&str> = Vec::new();
        for edge in &self.graph.edges {
            if edge.kind != Some(EdgeType::Blocks) {
                continue;
            }
            let successors = adjacency.entry(edge.from.as_str()).or_default();
            if successors.is_empty() {
                starts.push(edge.from.as_str());
            }
            successors.push(edge.to.as_str());
        }

        let mut chains: Vec<Vec<String>> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();

        for start in starts {
            if visited.contains(start) {
                continue;
            }
            // Depth-first with an explicit stack; each frame carries the
            // path that led to it so branches record independent chains.
            let mut stack: Vec<(&str, Vec<&str>)> = vec![(start, Vec::new())];
            while let Some((id, mut path)) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                path.push(id);
                match adjacency.get(id) {
                    Some(successors) => {
                        for succ in successors.iter().rev() {
                            stack.push((succ, path.clone()));
                        }
                    }
                    None => {
                        if path.len() > 1 {
                            chains.push(path.iter().map(|id| (*id).to_string()).collect());
                        }
                    }
                }
            }
        }

        chains
    }

    /// Identifiers with zero incident edges of any type. Parent references
    /// are grouping hints, not edges, so a node referenced only as a parent
    /// is still orphaned.
    fn orphaned_nodes(&self) -> Vec<String> {
        let mut connected: HashSet<&str> = HashSet::new();
        for edge in &self.graph.edges {
            connected.insert(edge.from.as_str());
            connected.insert(edge.to.as_str());
        }

        self.graph
            .sorted_node_ids()
            .into_iter()
            .filter(|id| !connected.contains(id))
            .map(str::to_string)
            .collect()
    }
}
