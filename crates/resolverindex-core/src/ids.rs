//! Identifier scheme for stored entities.
//!
//! Every identifier is derived from on-chain coordinates only, so replaying
//! an event always lands on the same keys.

/// Lowercase `0x`-prefixed hex of arbitrary bytes (node, address, hash).
pub fn hex_id(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// Resolver identifier: `<contract address>-<node>`.
pub fn resolver_id(node: impl AsRef<[u8]>, address: impl AsRef<[u8]>) -> String {
    format!("{}-{}", hex_id(address), hex_id(node))
}

/// Change-log record identifier: `<block number>-<log index>`.
pub fn event_id(block_number: u64, log_index: u64) -> String {
    format!("{block_number}-{log_index}")
}
