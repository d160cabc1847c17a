use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::Result;

pub mod analyzer;
pub mod viz;

/// A unit of work in the dependency graph. Every field may be absent in the
/// input document; consumers substitute defaults per context.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Node {
    pub title: Option<String>,
    pub status: Option<NodeStatus>,
    #[serde(rename = "type")]
    pub kind: Option<NodeType>,
    pub parent: Option<String>,
}

/// A directed, typed relation between two nodes. Endpoints need not exist in
/// the node mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: Option<EdgeType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeStatus {
    Completed,
    InProgress,
    Blocked,
    Pending,
    Other(String),
}

impl From<String> for NodeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "completed" => NodeStatus::Completed,
            "in_progress" => NodeStatus::InProgress,
            "blocked" => NodeStatus::Blocked,
            "pending" => NodeStatus::Pending,
            _ => NodeStatus::Other(value),
        }
    }
}

impl NodeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            NodeStatus::Completed => "completed",
            NodeStatus::InProgress => "in_progress",
            NodeStatus::Blocked => "blocked",
            NodeStatus::Pending => "pending",
            NodeStatus::Other(other) => other,
        }
    }

    /// Marker rendered next to the node title.
    pub fn marker(&self) -> &'static str {
        match self {
            NodeStatus::Completed => "✅",
            NodeStatus::InProgress => "🟡",
            NodeStatus::Blocked => "🔴",
            NodeStatus::Pending => "⭕",
            NodeStatus::Other(_) => "❓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeType {
    Initiative,
    Project,
    Issue,
    Other(String),
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "initiative" => NodeType::Initiative,
            "project" => NodeType::Project,
            "issue" => NodeType::Issue,
            _ => NodeType::Other(value),
        }
    }
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Initiative => "initiative",
            NodeType::Project => "project",
            NodeType::Issue => "issue",
            NodeType::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EdgeType {
    Contains,
    Blocks,
    Enables,
    Relates,
    Shares,
    Other(String),
}

impl From<String> for EdgeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "contains" => EdgeType::Contains,
            "blocks" => EdgeType::Blocks,
            "enables" => EdgeType::Enables,
            "relates" => EdgeType::Relates,
            "shares" => EdgeType::Shares,
            _ => EdgeType::Other(value),
        }
    }
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Contains => "contains",
            EdgeType::Blocks => "blocks",
            EdgeType::Enables => "enables",
            EdgeType::Relates => "relates",
            EdgeType::Shares => "shares",
            EdgeType::Other(other) => other,
        }
    }
}

impl Edge {
    /// Label for the rendered arrow. Unrecognized types keep their raw
    /// string; a missing type renders as "unknown".
    pub fn label(&self) -> &str {
        self.kind.as_ref().map_or("unknown", EdgeType::as_str)
    }

    pub fn is_contains(&self) -> bool {
        self.kind == Some(EdgeType::Contains)
    }
}

/// The in-memory graph document. Immutable for the duration of one analysis.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Graph {
    pub nodes: HashMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read graph file {}", path.display()))?;
        let graph = serde_json::from_str(&content)?;
        Ok(graph)
    }

    /// Node identifiers in lexicographic order. The node mapping itself is
    /// unordered, so every consumer that emits nodes iterates through this
    /// to keep output deterministic.
    pub fn sorted_node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Which rendering of the graph to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    #[default]
    Full,
    Critical,
    Status,
}

impl ViewType {
    /// Lenient parse: anything unrecognized falls back to the full view.
    pub fn parse(input: &str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "critical" => ViewType::Critical,
            "status" => ViewType::Status,
            _ => ViewType::Full,
        }
    }
}
