//! In-memory storage backend.
//!
//! Keeps every entity as a JSON value in RAM, one keyspace per entity kind.
//! Useful for tests and for hosts that snapshot state elsewhere.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use resolverindex_core::entity::EntityKind;
use resolverindex_core::error::StoreError;
use resolverindex_core::store::Store;

type Keyspaces = HashMap<EntityKind, HashMap<String, Value>>;

/// In-memory entity store.
///
/// All data is lost when the process exits.
#[derive(Default)]
pub struct InMemoryStore {
    entities: Mutex<Keyspaces>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Keyspaces>, StoreError> {
        self.entities
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }

    /// Number of stored entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> Result<usize, StoreError> {
        Ok(self.lock()?.get(&kind).map_or(0, HashMap::len))
    }

    /// Ids of every stored entity of `kind`, sorted.
    pub fn ids(&self, kind: EntityKind) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self
            .lock()?
            .get(&kind)
            .map(|space| space.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        Ok(ids)
    }
}

impl Store for InMemoryStore {
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock()?.get(&kind).and_then(|space| space.get(id)).cloned())
    }

    fn set(&self, kind: EntityKind, id: &str, value: Value) -> Result<(), StoreError> {
        self.lock()?.entry(kind).or_default().insert(id.to_string(), value);
        debug!(%kind, id, "entity stored");
        Ok(())
    }
}
