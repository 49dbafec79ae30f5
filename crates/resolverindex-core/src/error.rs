//! Error types for the entity store.

use thiserror::Error;

use crate::entity::EntityKind;

/// Errors raised by a [`Store`](crate::store::Store) backend or while
/// converting entities to and from their stored form.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Entity {kind} '{id}' could not be converted: {source}")]
    Codec {
        kind: EntityKind,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
