use std::collections::{HashMap, HashSet};

use crate::graph::{Edge, EdgeType, Graph, NodeStatus};

const HEADER: &str = "graph TD";

/// Complete graph: root nodes first, then one subgraph per parent, then all
/// non-containment arrows.
pub fn render_full(graph: &Graph) -> String {
    let mut lines = vec![HEADER.to_string()];

    let mut roots: Vec<&str> = Vec::new();
    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();

    for id in graph.sorted_node_ids() {
        let parent = graph
            .nodes
            .get(id)
            .and_then(|node| node.parent.as_deref())
            .filter(|parent| !parent.is_empty());
        match parent {
            Some(parent) => {
                let children = groups.entry(parent).or_default();
                if children.is_empty() {
                    group_order.push(parent);
                }
                children.push(id);
            }
            None => roots.push(id),
        }
    }

    for id in roots {
        lines.push(format!("    {}", node_line(graph, id)));
    }

    for parent in group_order {
        let title = graph
            .nodes
            .get(parent)
            .and_then(|node| node.title.as_deref())
            .unwrap_or("Unknown");
        lines.push(format!("    subgraph \"{}\"", escape_label(title)));
        for child in &groups[parent] {
            lines.push(format!("        {}", node_line(graph, child)));
        }
        lines.push("    end".to_string());
    }

    for edge in &graph.edges {
        if !edge.is_contains() {
            lines.push(format!("    {}", edge_line(edge)));
        }
    }

    lines.join("\n")
}

/// Blocking dependencies only: the endpoints of every "blocks" edge, then
/// the blocking arrows themselves.
pub fn render_critical(graph: &Graph) -> String {
    let mut lines = vec![HEADER.to_string()];

    let blocking: Vec<&Edge> = graph
        .edges
        .iter()
        .filter(|edge| edge.kind == Some(EdgeType::Blocks))
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut endpoints: Vec<&str> = Vec::new();
    for edge in &blocking {
        for id in [edge.from.as_str(), edge.to.as_str()] {
            if seen.insert(id) {
                endpoints.push(id);
            }
        }
    }

    for id in endpoints {
        lines.push(format!("    {}", node_line(graph, id)));
    }
    for edge in blocking {
        lines.push(format!("    {}", edge_line(edge)));
    }

    lines.join("\n")
}

/// Nodes grouped by status value, then all non-containment arrows.
pub fn render_status(graph: &Graph) -> String {
    let mut lines = vec![HEADER.to_string()];

    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();

    for id in graph.sorted_node_ids() {
        let status = graph
            .nodes
            .get(id)
            .and_then(|node| node.status.as_ref())
            .map_or("unknown", NodeStatus::as_str);
        let members = groups.entry(status).or_default();
        if members.is_empty() {
            group_order.push(status);
        }
        members.push(id);
    }

    for status in group_order {
        lines.push(format!("    subgraph \"{}\"", title_case(status)));
        for id in &groups[status] {
            lines.push(format!("        {}", node_line(graph, id)));
        }
        lines.push("    end".to_string());
    }

    for edge in &graph.edges {
        if !edge.is_contains() {
            lines.push(format!("    {}", edge_line(edge)));
        }
    }

    lines.join("\n")
}

/// Declaration line for a single node. Identifiers absent from the node
/// mapping render with placeholder defaults rather than failing. The box
/// shape is uniform across node types.
fn node_line(graph: &Graph, id: &str) -> String {
    let node = graph.nodes.get(id);
    let title = node
        .and_then(|node| node.title.as_deref())
        .unwrap_or("Unknown");
    let marker = node
        .and_then(|node| node.status.as_ref())
        .unwrap_or(&NodeStatus::Pending)
        .marker();
    format!("{}[\"{} {}\"]", id, escape_label(title), marker)
}

fn edge_line(edge: &Edge) -> String {
    format!("{} -->|{}| {}", edge.from, edge.label(), edge.to)
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Uppercase the first letter of every alphabetic run: "in_progress"
/// becomes "In_Progress".
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut boundary = true;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
}
