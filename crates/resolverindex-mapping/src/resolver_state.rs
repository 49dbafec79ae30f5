//! Upserts for resolver state.
//!
//! Every operation here is safe to repeat: the host redelivers events after a
//! reorg, and replaying one must leave the same final state.

use alloy_primitives::{Address, B256, U256};
use resolverindex_core::entity::{Domain, Resolver};
use resolverindex_core::error::StoreError;
use resolverindex_core::ids::resolver_id;
use resolverindex_core::ordered_set::add_if_absent;
use resolverindex_core::store::{Store, StoreExt};
use tracing::debug;

/// Load the resolver for `(node, address)`, or build a fresh unsaved one.
/// The caller saves after mutating.
pub fn get_or_create_resolver<S: Store + ?Sized>(
    store: &S,
    node: B256,
    address: Address,
) -> Result<Resolver, StoreError> {
    let id = resolver_id(node, address);
    match store.load::<Resolver>(&id)? {
        Some(resolver) => Ok(resolver),
        None => {
            debug!(resolver = %id, "new resolver");
            Ok(Resolver::new(node, address))
        }
    }
}

/// Record a coin type as seen. Returns `true` if it was new.
pub fn add_coin_type(resolver: &mut Resolver, coin_type: U256) -> bool {
    add_if_absent(&mut resolver.coin_types, coin_type)
}

/// Record a text key as seen. Returns `true` if it was new.
pub fn add_text_key(resolver: &mut Resolver, key: &str) -> bool {
    add_if_absent(&mut resolver.texts, key.to_string())
}

/// Copy a resolver's new address onto its domain.
///
/// Only applies when the domain currently points at `resolver_id`; a domain
/// that has moved to another resolver keeps its address. Returns `true` if
/// the domain was updated.
pub fn propagate_resolved_address<S: Store + ?Sized>(
    store: &S,
    domain_id: &str,
    resolver_id: &str,
    new_address: &str,
) -> Result<bool, StoreError> {
    let Some(mut domain) = store.load::<Domain>(domain_id)? else {
        return Ok(false);
    };
    if domain.resolver.as_deref() != Some(resolver_id) {
        debug!(domain = domain_id, resolver = resolver_id, "domain uses another resolver");
        return Ok(false);
    }
    domain.resolved_address = Some(new_address.to_string());
    store.save(&domain)?;
    Ok(true)
}
