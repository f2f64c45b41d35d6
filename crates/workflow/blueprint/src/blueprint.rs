//! Blueprint: the designer's raw graph before compilation
//!
//! Nodes and edges are flat string-keyed maps. Field names vary between
//! designer versions, so nothing here is interpreted; the parse step
//! resolves aliases when the blueprint is compiled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw node or edge as drawn in the designer
pub type RawElement = Map<String, Value>;

fn default_version() -> u32 {
    1
}

/// A versioned designer graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Stable key; becomes the workflow id
    pub key: String,
    /// Display title; becomes the workflow name
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<RawElement>,
    #[serde(default)]
    pub edges: Vec<RawElement>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Blueprint {
    /// Create an empty blueprint at version 1
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            title: title.into(),
            version: default_version(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_node(mut self, node: RawElement) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: RawElement) -> Self {
        self.edges.push(edge);
        self
    }

    /// Title to publish under; falls back to the key when blank
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.key
        } else {
            &self.title
        }
    }

    /// Whether a JSON document looks like a blueprint rather than a
    /// compiled workflow definition.
    pub fn is_blueprint_document(document: &Value) -> bool {
        document.get("nodes").is_some()
    }
}
