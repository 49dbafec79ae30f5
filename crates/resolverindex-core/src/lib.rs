//! resolverindex-core — shared vocabulary for the resolver event indexer.
//!
//! # Architecture
//!
//! ```text
//! host ──ResolverLog──▶ ResolverMapping (resolverindex-mapping)
//!                          ├── ids           (resolver / event identifiers)
//!                          ├── entity        (Account, Resolver, Domain, change-log records)
//!                          ├── ordered_set   (coin types / text keys, no duplicates)
//!                          └── store         (abstract keyed store, see resolverindex-storage)
//! ```

pub mod entity;
pub mod error;
pub mod event;
pub mod ids;
pub mod ordered_set;
pub mod store;

pub use entity::{
    Account, Domain, Entity, EntityKind, Resolver, ResolverEventPayload, ResolverEventRecord,
    TextValue,
};
pub use error::StoreError;
pub use event::{
    EventContext, ReceiptLog, ResolverEvent, ResolverEventKind, ResolverLog, TransactionInfo,
};
pub use ids::{event_id, hex_id, resolver_id};
pub use ordered_set::{add_if_absent, OrderedSet};
pub use store::{Store, StoreExt};
