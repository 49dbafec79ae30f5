//! # resolverindex-evm
//!
//! Recovers the value of a `setText` call from raw transaction call-data.
//!
//! ## Implementation notes
//! - Older resolvers emit `TextChanged(node, indexedKey, key)`: the log never
//!   carries the value, so it has to be read back out of the transaction input
//! - [`correlator`] picks the `setText` call that produced a given log, also
//!   when one transaction (e.g. a `multicall`) holds several of them
//! - [`text_decoder`] ABI-decodes the `(bytes32,string,string)` arguments of
//!   that call with `alloy-dyn-abi`

pub mod correlator;
pub mod fingerprint;
pub mod text_decoder;

pub use correlator::{
    event_rank, locate_call, selector_offsets, ByteOffset, CorrelationError, LocatedCall,
};
pub use fingerprint::{kind_for_topic0, keccak256, selector, set_text_selector, topic0};
pub use text_decoder::{
    decode_set_text_args, recover_text_value, SetTextCall, TextDecodeError, TextRecovery,
};
