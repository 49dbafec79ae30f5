//! keccak256 fingerprints: event topic0 values and function selectors.

use alloy_primitives::B256;
use resolverindex_core::event::ResolverEventKind;
use tiny_keccak::{Hasher, Keccak};

/// Signature of the resolver's text-record setter.
pub const SET_TEXT_SIGNATURE: &str = "setText(bytes32,string,string)";

pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    B256::from(output)
}

/// First four bytes of the keccak256 of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// `setText(bytes32,string,string)` → `0x10f13a8c`.
pub fn set_text_selector() -> [u8; 4] {
    selector(SET_TEXT_SIGNATURE)
}

/// topic0 emitted for an event kind.
pub fn topic0(kind: ResolverEventKind) -> B256 {
    keccak256(kind.signature().as_bytes())
}

/// Reverse lookup of [`topic0`], for hosts that route raw logs.
pub fn kind_for_topic0(topic: B256) -> Option<ResolverEventKind> {
    ResolverEventKind::ALL
        .into_iter()
        .find(|kind| topic0(*kind) == topic)
}
