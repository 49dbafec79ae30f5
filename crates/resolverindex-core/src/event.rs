//! Typed resolver events as delivered by the indexing host.
//!
//! Log decoding happens upstream; each [`ResolverLog`] arrives with its
//! parameters already typed, plus the transaction context the text handler
//! needs to recover values that the log itself does not carry.

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Context ──────────────────────────────────────────────────────────────────

/// The transaction that emitted a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub hash: B256,
    /// Raw call-data of the transaction.
    pub input: Bytes,
}

/// One log from the transaction receipt, reduced to what correlation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub log_index: u64,
    /// Event signature hash; `None` for anonymous logs.
    pub topic0: Option<B256>,
}

/// On-chain coordinates of the log being handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// Emitting resolver contract.
    pub address: Address,
    pub block_number: u64,
    pub log_index: u64,
    /// Signature hash of this log.
    pub topic0: B256,
    pub transaction: TransactionInfo,
    /// Every log of the transaction in receipt order, when the host fetched it.
    pub receipt: Option<Vec<ReceiptLog>>,
}

// ─── Events ───────────────────────────────────────────────────────────────────

/// A decoded resolver event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolverEvent {
    AddrChanged {
        node: B256,
        a: Address,
    },
    AddressChanged {
        node: B256,
        coin_type: U256,
        new_address: Bytes,
    },
    NameChanged {
        node: B256,
        name: String,
    },
    AbiChanged {
        node: B256,
        content_type: U256,
    },
    PubkeyChanged {
        node: B256,
        x: B256,
        y: B256,
    },
    TextChanged {
        node: B256,
        key: String,
        /// Present only for resolvers that emit the value in the log.
        value: Option<String>,
    },
    ContenthashChanged {
        node: B256,
        hash: Bytes,
    },
    InterfaceChanged {
        node: B256,
        interface_id: FixedBytes<4>,
        implementer: Address,
    },
    AuthorisationChanged {
        node: B256,
        owner: Address,
        target: Address,
        is_authorised: bool,
    },
}

impl ResolverEvent {
    pub fn node(&self) -> B256 {
        match self {
            Self::AddrChanged { node, .. }
            | Self::AddressChanged { node, .. }
            | Self::NameChanged { node, .. }
            | Self::AbiChanged { node, .. }
            | Self::PubkeyChanged { node, .. }
            | Self::TextChanged { node, .. }
            | Self::ContenthashChanged { node, .. }
            | Self::InterfaceChanged { node, .. }
            | Self::AuthorisationChanged { node, .. } => *node,
        }
    }

    pub fn kind(&self) -> ResolverEventKind {
        match self {
            Self::AddrChanged { .. } => ResolverEventKind::AddrChanged,
            Self::AddressChanged { .. } => ResolverEventKind::AddressChanged,
            Self::NameChanged { .. } => ResolverEventKind::NameChanged,
            Self::AbiChanged { .. } => ResolverEventKind::AbiChanged,
            Self::PubkeyChanged { .. } => ResolverEventKind::PubkeyChanged,
            Self::TextChanged { value: None, .. } => ResolverEventKind::TextChanged,
            Self::TextChanged { value: Some(_), .. } => ResolverEventKind::TextChangedWithValue,
            Self::ContenthashChanged { .. } => ResolverEventKind::ContenthashChanged,
            Self::InterfaceChanged { .. } => ResolverEventKind::InterfaceChanged,
            Self::AuthorisationChanged { .. } => ResolverEventKind::AuthorisationChanged,
        }
    }
}

/// A resolver event together with the log it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverLog {
    pub ctx: EventContext,
    pub event: ResolverEvent,
}

// ─── Kinds ────────────────────────────────────────────────────────────────────

/// Every resolver event signature the mapping understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolverEventKind {
    AddrChanged,
    AddressChanged,
    NameChanged,
    AbiChanged,
    PubkeyChanged,
    TextChanged,
    /// Later resolvers append the value to the log.
    TextChangedWithValue,
    ContenthashChanged,
    InterfaceChanged,
    AuthorisationChanged,
}

impl ResolverEventKind {
    pub const ALL: [ResolverEventKind; 10] = [
        Self::AddrChanged,
        Self::AddressChanged,
        Self::NameChanged,
        Self::AbiChanged,
        Self::PubkeyChanged,
        Self::TextChanged,
        Self::TextChangedWithValue,
        Self::ContenthashChanged,
        Self::InterfaceChanged,
        Self::AuthorisationChanged,
    ];

    /// Canonical Solidity event signature (the keccak preimage of topic0).
    pub fn signature(&self) -> &'static str {
        match self {
            Self::AddrChanged => "AddrChanged(bytes32,address)",
            Self::AddressChanged => "AddressChanged(bytes32,uint256,bytes)",
            Self::NameChanged => "NameChanged(bytes32,string)",
            Self::AbiChanged => "ABIChanged(bytes32,uint256)",
            Self::PubkeyChanged => "PubkeyChanged(bytes32,bytes32,bytes32)",
            Self::TextChanged => "TextChanged(bytes32,string,string)",
            Self::TextChangedWithValue => "TextChanged(bytes32,string,string,string)",
            Self::ContenthashChanged => "ContenthashChanged(bytes32,bytes)",
            Self::InterfaceChanged => "InterfaceChanged(bytes32,bytes4,address)",
            Self::AuthorisationChanged => "AuthorisationChanged(bytes32,address,address,bool)",
        }
    }
}

impl fmt::Display for ResolverEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.signature();
        let name = sig.split('(').next().unwrap_or(sig);
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_text_value_presence() {
        let without = ResolverEvent::TextChanged {
            node: B256::ZERO,
            key: "url".into(),
            value: None,
        };
        let with = ResolverEvent::TextChanged {
            node: B256::ZERO,
            key: "url".into(),
            value: Some("https://example.org".into()),
        };
        assert_eq!(without.kind(), ResolverEventKind::TextChanged);
        assert_eq!(with.kind(), ResolverEventKind::TextChangedWithValue);
    }

    #[test]
    fn display_is_event_name() {
        assert_eq!(ResolverEventKind::AbiChanged.to_string(), "ABIChanged");
        assert_eq!(ResolverEventKind::TextChangedWithValue.to_string(), "TextChanged");
    }

    #[test]
    fn node_is_shared_by_every_variant() {
        let node = B256::repeat_byte(7);
        let ev = ResolverEvent::PubkeyChanged {
            node,
            x: B256::ZERO,
            y: B256::ZERO,
        };
        assert_eq!(ev.node(), node);
    }
}
