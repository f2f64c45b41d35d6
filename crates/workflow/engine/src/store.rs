//! Workflow store: where definitions live, keyed by `(id, version)`
//!
//! The engine only reads from a store. Writers are responsible for
//! bumping versions; a stored `(id, version)` is never mutated in place.
//! The in-memory arena here serves development and tests and is
//! injected explicitly wherever a store is needed.

use async_trait::async_trait;
use dashmap::DashMap;
use routeflow_types::{WorkflowDefinition, WorkflowError, WorkflowId, WorkflowResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read access to workflow definitions
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Fetch a definition. `None` selects the highest stored version.
    async fn get_definition(
        &self,
        id: &WorkflowId,
        version: Option<u32>,
    ) -> WorkflowResult<WorkflowDefinition>;

    /// One definition per workflow id, conventionally the latest version.
    async fn list_definitions(&self) -> WorkflowResult<Vec<WorkflowDefinition>>;
}

/// Write access for stores that accept new definition versions
#[async_trait]
pub trait WritableWorkflowStore: WorkflowStore {
    /// Store a definition under its `(id, version)` key.
    ///
    /// Returns the definition previously held under the same key, if any.
    async fn put_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> WorkflowResult<Option<WorkflowDefinition>>;
}

/// In-memory arena of definitions keyed by `(id, version)`
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorkflowStore {
    definitions: Arc<DashMap<(WorkflowId, u32), WorkflowDefinition>>,
}

impl InMemoryWorkflowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with definitions
    pub fn with_definitions(definitions: impl IntoIterator<Item = WorkflowDefinition>) -> Self {
        let store = Self::new();
        for definition in definitions {
            store.insert(definition);
        }
        store
    }

    /// Insert a definition, replacing any entry with the same key
    pub fn insert(&self, definition: WorkflowDefinition) -> Option<WorkflowDefinition> {
        let key = definition.key();
        tracing::info!(
            workflow_id = %key.0,
            version = key.1,
            "Workflow definition stored"
        );
        self.definitions.insert(key, definition)
    }

    /// Remove one version of a definition
    pub fn remove(&self, id: &WorkflowId, version: u32) -> WorkflowResult<WorkflowDefinition> {
        let (_, definition) = self
            .definitions
            .remove(&(id.clone(), version))
            .ok_or_else(|| WorkflowError::DefinitionNotFound {
                id: id.clone(),
                version: Some(version),
            })?;
        tracing::info!(workflow_id = %id, version, "Workflow definition removed");
        Ok(definition)
    }

    /// All stored versions of a definition, ascending
    pub fn versions(&self, id: &WorkflowId) -> Vec<u32> {
        let mut versions: Vec<u32> = self
            .definitions
            .iter()
            .filter(|entry| &entry.key().0 == id)
            .map(|entry| entry.key().1)
            .collect();
        versions.sort_unstable();
        versions
    }

    /// Total number of stored `(id, version)` entries
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn latest(&self, id: &WorkflowId) -> Option<WorkflowDefinition> {
        self.definitions
            .iter()
            .filter(|entry| &entry.key().0 == id)
            .max_by_key(|entry| entry.key().1)
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn get_definition(
        &self,
        id: &WorkflowId,
        version: Option<u32>,
    ) -> WorkflowResult<WorkflowDefinition> {
        let found = match version {
            Some(v) => self
                .definitions
                .get(&(id.clone(), v))
                .map(|entry| entry.value().clone()),
            None => self.latest(id),
        };
        found.ok_or_else(|| WorkflowError::DefinitionNotFound {
            id: id.clone(),
            version,
        })
    }

    async fn list_definitions(&self) -> WorkflowResult<Vec<WorkflowDefinition>> {
        let mut latest: BTreeMap<WorkflowId, WorkflowDefinition> = BTreeMap::new();
        for entry in self.definitions.iter() {
            let definition = entry.value();
            let newer = match latest.get(&definition.id) {
                Some(existing) => existing.version < definition.version,
                None => true,
            };
            if newer {
                latest.insert(definition.id.clone(), definition.clone());
            }
        }
        Ok(latest.into_values().collect())
    }
}

#[async_trait]
impl WritableWorkflowStore for InMemoryWorkflowStore {
    async fn put_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> WorkflowResult<Option<WorkflowDefinition>> {
        Ok(self.insert(definition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeflow_types::{Step, Transition};

    fn make_definition(id: &str, version: u32) -> WorkflowDefinition {
        WorkflowDefinition::new(id, format!("{} v{}", id, version))
            .with_version(version)
            .with_step(Step::start("start"))
            .with_step(Step::end("end"))
            .with_transition(Transition::new("start", "end"))
    }

    #[tokio::test]
    async fn test_get_exact_version() {
        let store = InMemoryWorkflowStore::with_definitions([
            make_definition("review", 1),
            make_definition("review", 2),
        ]);

        let def = store
            .get_definition(&WorkflowId::new("review"), Some(1))
            .await
            .unwrap();
        assert_eq!(def.version, 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_get_latest_version() {
        let store = InMemoryWorkflowStore::new();
        store.insert(make_definition("review", 3));
        store.insert(make_definition("review", 1));
        store.insert(make_definition("review", 2));

        let def = store
            .get_definition(&WorkflowId::new("review"), None)
            .await
            .unwrap();
        assert_eq!(def.version, 3);
        assert_eq!(store.versions(&WorkflowId::new("review")), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryWorkflowStore::with_definitions([make_definition("review", 1)]);

        let err = store
            .get_definition(&WorkflowId::new("review"), Some(9))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::DefinitionNotFound {
                id: WorkflowId::new("review"),
                version: Some(9),
            }
        );

        let err = store
            .get_definition(&WorkflowId::new("nope"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::DefinitionNotFound { version: None, .. }));
    }

    #[tokio::test]
    async fn test_list_latest_per_id() {
        let store = InMemoryWorkflowStore::with_definitions([
            make_definition("b", 1),
            make_definition("a", 2),
            make_definition("a", 5),
            make_definition("b", 4),
            make_definition("a", 3),
        ]);

        let listed = store.list_definitions().await.unwrap();
        let keys: Vec<_> = listed.iter().map(|d| (d.id.as_str(), d.version)).collect();
        assert_eq!(keys, vec![("a", 5), ("b", 4)]);
    }

    #[tokio::test]
    async fn test_put_replaces_same_key() {
        let store = InMemoryWorkflowStore::new();
        assert!(store
            .put_definition(make_definition("x", 1))
            .await
            .unwrap()
            .is_none());
        let previous = store
            .put_definition(make_definition("x", 1).with_meta("edited", true))
            .await
            .unwrap();
        assert!(previous.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryWorkflowStore::with_definitions([make_definition("x", 1)]);
        let removed = store.remove(&WorkflowId::new("x"), 1).unwrap();
        assert_eq!(removed.version, 1);
        assert!(store.is_empty());
        assert!(store.remove(&WorkflowId::new("x"), 1).is_err());
    }

    #[tokio::test]
    async fn test_clones_share_arena() {
        let store = InMemoryWorkflowStore::new();
        let handle = store.clone();
        handle.insert(make_definition("shared", 1));
        assert!(store
            .get_definition(&WorkflowId::new("shared"), None)
            .await
            .is_ok());
    }
}
