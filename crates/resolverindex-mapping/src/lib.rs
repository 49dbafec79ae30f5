//! # resolverindex-mapping
//!
//! Turns typed resolver events into stored state: the current [`Resolver`]
//! record plus one immutable change-log record per log.
//!
//! ```text
//! ResolverLog ─▶ ResolverMapping::handle
//!                  ├── resolver_state  (get-or-create, seen sets, domain propagation)
//!                  ├── resolverindex-evm (TextChanged value recovery)
//!                  └── Store::save     (ResolverEventRecord, keyed block-logIndex)
//! ```
//!
//! [`Resolver`]: resolverindex_core::entity::Resolver

pub mod config;
pub mod error;
pub mod resolver_state;
pub mod router;
pub mod telemetry;

pub use config::MappingConfig;
pub use error::{ConfigError, MappingError};
pub use router::{DiscardReason, Outcome, ResolverMapping};
pub use telemetry::{init_tracing, LogConfig};
