//! The abstract keyed store that entities are loaded from and saved to.
//!
//! Backends only deal in `serde_json::Value`; [`StoreExt`] layers typed
//! access on top so handlers work with [`Entity`] structs directly.

use serde_json::Value;

use crate::entity::{Entity, EntityKind};
use crate::error::StoreError;

/// A keyed entity store. Writes are visible to subsequent reads immediately.
pub trait Store: Send + Sync {
    /// Load the stored form of an entity, if present.
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError>;

    /// Upsert the stored form of an entity.
    fn set(&self, kind: EntityKind, id: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed `load` / `save` for any [`Store`].
pub trait StoreExt: Store {
    fn load<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        match self.get(E::KIND, id)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Codec {
                    kind: E::KIND,
                    id: id.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn save<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let value = serde_json::to_value(entity).map_err(|source| StoreError::Codec {
            kind: E::KIND,
            id: entity.id().to_string(),
            source,
        })?;
        self.set(E::KIND, entity.id(), value)
    }

    fn exists<E: Entity>(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(E::KIND, id)?.is_some())
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
