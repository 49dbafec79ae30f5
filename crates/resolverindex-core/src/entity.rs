//! Stored entities: current resolver state plus the append-only change log.

use alloy_primitives::{Bytes, FixedBytes, B256, U256};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use crate::ids::{hex_id, resolver_id};
use crate::ordered_set::OrderedSet;

// ─── Entity contract ──────────────────────────────────────────────────────────

/// The kinds of entity the store keeps, one keyspace each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Account,
    Resolver,
    Domain,
    /// Change-log records of every event kind share one keyspace; their ids
    /// (`block-logIndex`) are unique per log anyway.
    ResolverEvent,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "Account"),
            Self::Resolver => write!(f, "Resolver"),
            Self::Domain => write!(f, "Domain"),
            Self::ResolverEvent => write!(f, "ResolverEvent"),
        }
    }
}

/// Anything that can be loaded from and saved to a [`Store`](crate::store::Store).
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

// ─── Account ──────────────────────────────────────────────────────────────────

/// A chain address that has been observed as a resolved address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
}

impl Account {
    pub fn new(address: impl AsRef<[u8]>) -> Self {
        Self { id: hex_id(address) }
    }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> &str {
        &self.id
    }
}

// ─── Resolver ─────────────────────────────────────────────────────────────────

/// Current state of one resolver contract for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolver {
    /// `<contract address>-<node>`.
    pub id: String,
    /// The node this resolver answers for (Domain id).
    pub domain: String,
    /// Resolver contract address.
    pub address: String,
    /// Last `addr` set on this resolver (Account id).
    pub addr: Option<String>,
    pub content_hash: Option<Bytes>,
    /// Every coin type ever given an address, first-seen order.
    pub coin_types: Option<OrderedSet<U256>>,
    /// Every text key ever set, first-seen order.
    pub texts: Option<OrderedSet<String>>,
}

impl Resolver {
    /// A fresh, unsaved resolver with every optional attribute unset.
    pub fn new(node: B256, address: impl AsRef<[u8]>) -> Self {
        let address = address.as_ref();
        Self {
            id: resolver_id(node, address),
            domain: hex_id(node),
            address: hex_id(address),
            addr: None,
            content_hash: None,
            coin_types: None,
            texts: None,
        }
    }
}

impl Entity for Resolver {
    const KIND: EntityKind = EntityKind::Resolver;

    fn id(&self) -> &str {
        &self.id
    }
}

// ─── Domain ───────────────────────────────────────────────────────────────────

/// A name record. Owned by the registry indexer; only `resolved_address` is
/// written from resolver events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Node hex.
    pub id: String,
    /// Id of the resolver the registry currently points this node at.
    pub resolver: Option<String>,
    pub resolved_address: Option<String>,
}

impl Entity for Domain {
    const KIND: EntityKind = EntityKind::Domain;

    fn id(&self) -> &str {
        &self.id
    }
}

// ─── Change log ───────────────────────────────────────────────────────────────

/// The recovered value of a text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TextValue {
    /// The value as encoded on chain. Empty when the located call could not be
    /// ABI-decoded.
    Decoded { value: String },
    /// The call that produced the event could not be located in the
    /// transaction input.
    Undecodable { reason: String },
}

impl TextValue {
    pub fn decoded(value: impl Into<String>) -> Self {
        Self::Decoded { value: value.into() }
    }

    /// The decoded string, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Decoded { value } => Some(value),
            Self::Undecodable { .. } => None,
        }
    }
}

/// Kind-specific payload of a change-log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ResolverEventPayload {
    AddrChanged {
        addr: String,
    },
    MulticoinAddrChanged {
        coin_type: U256,
        addr: Bytes,
    },
    NameChanged {
        name: String,
    },
    AbiChanged {
        content_type: U256,
    },
    PubkeyChanged {
        x: B256,
        y: B256,
    },
    TextChanged {
        key: String,
        value: TextValue,
    },
    ContenthashChanged {
        hash: Bytes,
    },
    InterfaceChanged {
        #[serde(rename = "interfaceID")]
        interface_id: FixedBytes<4>,
        implementer: String,
    },
    AuthorisationChanged {
        owner: String,
        target: String,
        is_authorized: bool,
    },
}

/// One immutable record per resolver log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverEventRecord {
    /// `<block number>-<log index>`.
    pub id: String,
    /// Resolver id.
    pub resolver: String,
    pub block_number: u64,
    #[serde(rename = "transactionID")]
    pub transaction_id: B256,
    #[serde(flatten)]
    pub payload: ResolverEventPayload,
}

impl Entity for ResolverEventRecord {
    const KIND: EntityKind = EntityKind::ResolverEvent;

    fn id(&self) -> &str {
        &self.id
    }
}
