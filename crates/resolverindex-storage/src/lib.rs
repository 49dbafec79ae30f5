//! resolverindex-storage — store backends for ResolverIndex.
//!
//! Backends:
//! - [`memory`] — in-memory (dev/testing, no persistence)

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::InMemoryStore;
