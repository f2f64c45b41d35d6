//! In-memory blueprint store keyed by blueprint key
//!
//! Designer saves go through [`BlueprintStore::upsert`]. When content
//! changes without an explicit version, the version is bumped so that
//! each compiled definition gets its own `(id, version)` key.

use crate::blueprint::{Blueprint, RawElement};
use crate::compiler::compile_to_workflow;
use crate::errors::{BlueprintError, BlueprintResult};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use routeflow_types::WorkflowDefinition;
use std::sync::Arc;

/// A partial blueprint update. `None` fields are left untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct BlueprintUpdate {
    pub title: Option<String>,
    pub nodes: Option<Vec<RawElement>>,
    pub edges: Option<Vec<RawElement>>,
    /// Explicit version; disables the automatic bump
    pub version: Option<u32>,
    /// Bump the version when content changed and no version was given
    pub bump_if_changed: bool,
}

impl Default for BlueprintUpdate {
    fn default() -> Self {
        Self {
            title: None,
            nodes: None,
            edges: None,
            version: None,
            bump_if_changed: true,
        }
    }
}

impl BlueprintUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<RawElement>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_edges(mut self, edges: Vec<RawElement>) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn without_bump(mut self) -> Self {
        self.bump_if_changed = false;
        self
    }

    /// Apply to an existing blueprint; returns whether content changed.
    ///
    /// On error `existing` may be partly updated; callers apply to a copy.
    fn apply(self, existing: &mut Blueprint) -> BlueprintResult<bool> {
        let mut changed = false;

        if let Some(title) = self.title {
            if title != existing.title {
                existing.title = title;
                changed = true;
            }
        }
        if let Some(nodes) = self.nodes {
            if nodes != existing.nodes {
                existing.nodes = nodes;
                changed = true;
            }
        }
        if let Some(edges) = self.edges {
            if edges != existing.edges {
                existing.edges = edges;
                changed = true;
            }
        }

        match self.version {
            Some(version) => existing.version = version,
            None if changed && self.bump_if_changed => {
                existing.version = existing.version.checked_add(1).ok_or_else(|| {
                    BlueprintError::VersionOverflow {
                        key: existing.key.clone(),
                        version: existing.version,
                    }
                })?;
            }
            None => {}
        }
        existing.updated_at = Utc::now();
        Ok(changed)
    }
}

/// Shared in-memory blueprint store
#[derive(Clone, Debug, Default)]
pub struct BlueprintStore {
    blueprints: Arc<DashMap<String, Blueprint>>,
}

impl BlueprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a blueprint or update an existing one.
    ///
    /// A failed update leaves the stored blueprint untouched.
    pub fn upsert(&self, key: &str, update: BlueprintUpdate) -> BlueprintResult<Blueprint> {
        match self.blueprints.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let before = entry.get().version;
                let mut blueprint = entry.get().clone();
                let changed = update.apply(&mut blueprint)?;
                *entry.get_mut() = blueprint.clone();
                tracing::info!(
                    blueprint_key = %key,
                    changed,
                    from_version = before,
                    version = blueprint.version,
                    "Blueprint updated"
                );
                Ok(blueprint)
            }
            Entry::Vacant(entry) => {
                let title = update
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| key.to_string());
                let mut blueprint = Blueprint::new(key, title);
                blueprint.version = update.version.unwrap_or(1);
                blueprint.nodes = update.nodes.unwrap_or_default();
                blueprint.edges = update.edges.unwrap_or_default();
                tracing::info!(
                    blueprint_key = %key,
                    version = blueprint.version,
                    "Blueprint created"
                );
                entry.insert(blueprint.clone());
                Ok(blueprint)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Blueprint> {
        self.blueprints.get(key).map(|entry| entry.value().clone())
    }

    /// All blueprints, sorted by key
    pub fn list(&self) -> Vec<Blueprint> {
        let mut all: Vec<Blueprint> = self
            .blueprints
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all
    }

    /// Remove a blueprint; returns whether it existed
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.blueprints.remove(key).is_some();
        if removed {
            tracing::info!(blueprint_key = %key, "Blueprint deleted");
        }
        removed
    }

    /// Compile the stored blueprint under `key`
    pub fn compile(&self, key: &str) -> BlueprintResult<WorkflowDefinition> {
        let blueprint = self
            .get(key)
            .ok_or_else(|| BlueprintError::NotFound(key.to_string()))?;
        compile_to_workflow(&blueprint)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}
