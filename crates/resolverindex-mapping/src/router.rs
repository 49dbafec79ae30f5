//! Per-kind resolver event handlers.
//!
//! Each handler writes exactly one [`ResolverEventRecord`] keyed
//! `block-logIndex`, after updating resolver state for the kinds that carry
//! any (addr, coin address, text key, content hash).

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use resolverindex_core::entity::{Account, ResolverEventPayload, ResolverEventRecord, TextValue};
use resolverindex_core::event::{EventContext, ResolverEvent, ResolverLog};
use resolverindex_core::ids::{event_id, hex_id, resolver_id};
use resolverindex_core::store::{Store, StoreExt};
use resolverindex_evm::text_decoder::recover_text_value;
use std::fmt;
use tracing::{debug, info};

use crate::config::MappingConfig;
use crate::error::MappingError;
use crate::resolver_state::{
    add_coin_type, add_text_key, get_or_create_resolver, propagate_resolved_address,
};

/// What happened to one delivered log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new change-log record was written.
    Recorded { id: String },
    /// A record for this log position already exists and was left as is.
    AlreadyRecorded { id: String },
    /// No record was written.
    Discarded { reason: DiscardReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// `NameChanged` with an embedded NUL.
    NullByteInName,
    /// Emitting contract is not in the configured contract list.
    ContractNotIndexed,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullByteInName => write!(f, "name contains a NUL byte"),
            Self::ContractNotIndexed => write!(f, "contract not indexed"),
        }
    }
}

/// Routes resolver events to their handlers over an injected store.
pub struct ResolverMapping<S: Store> {
    store: S,
    config: MappingConfig,
}

impl<S: Store> ResolverMapping<S> {
    pub fn new(store: S, config: MappingConfig) -> Self {
        Self {
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Handle one log. Logs must arrive in block / log-index order.
    pub fn handle(&self, log: &ResolverLog) -> Result<Outcome, MappingError> {
        let ctx = &log.ctx;
        if !self.config.matches_contract(&ctx.address) {
            debug!(contract = %hex_id(ctx.address), "skipping log from unindexed contract");
            return Ok(self.discard(DiscardReason::ContractNotIndexed));
        }

        match &log.event {
            ResolverEvent::AddrChanged { node, a } => self.handle_addr_changed(ctx, *node, *a),
            ResolverEvent::AddressChanged {
                node,
                coin_type,
                new_address,
            } => self.handle_multicoin_addr_changed(ctx, *node, *coin_type, new_address),
            ResolverEvent::NameChanged { node, name } => self.handle_name_changed(ctx, *node, name),
            ResolverEvent::AbiChanged { node, content_type } => {
                self.handle_abi_changed(ctx, *node, *content_type)
            }
            ResolverEvent::PubkeyChanged { node, x, y } => {
                self.handle_pubkey_changed(ctx, *node, *x, *y)
            }
            ResolverEvent::TextChanged { node, key, value } => {
                self.handle_text_changed(ctx, *node, key, value.as_deref())
            }
            ResolverEvent::ContenthashChanged { node, hash } => {
                self.handle_contenthash_changed(ctx, *node, hash)
            }
            ResolverEvent::InterfaceChanged {
                node,
                interface_id,
                implementer,
            } => self.handle_interface_changed(ctx, *node, *interface_id, *implementer),
            ResolverEvent::AuthorisationChanged {
                node,
                owner,
                target,
                is_authorised,
            } => self.handle_authorisation_changed(ctx, *node, *owner, *target, *is_authorised),
        }
    }

    pub fn handle_addr_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        a: Address,
    ) -> Result<Outcome, MappingError> {
        let account = Account::new(a);
        self.store.save(&account)?;

        let mut resolver = get_or_create_resolver(&self.store, node, ctx.address)?;
        resolver.addr = Some(account.id.clone());
        self.store.save(&resolver)?;

        propagate_resolved_address(&self.store, &hex_id(node), &resolver.id, &account.id)?;

        self.append(
            ctx,
            resolver.id,
            ResolverEventPayload::AddrChanged { addr: account.id },
        )
    }

    pub fn handle_multicoin_addr_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        coin_type: U256,
        new_address: &Bytes,
    ) -> Result<Outcome, MappingError> {
        let mut resolver = get_or_create_resolver(&self.store, node, ctx.address)?;
        add_coin_type(&mut resolver, coin_type);
        self.store.save(&resolver)?;

        self.append(
            ctx,
            resolver.id,
            ResolverEventPayload::MulticoinAddrChanged {
                coin_type,
                addr: new_address.clone(),
            },
        )
    }

    pub fn handle_name_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        name: &str,
    ) -> Result<Outcome, MappingError> {
        if name.contains('\0') {
            debug!(
                block = ctx.block_number,
                log_index = ctx.log_index,
                "dropping NameChanged with NUL byte"
            );
            return Ok(self.discard(DiscardReason::NullByteInName));
        }
        self.append(
            ctx,
            resolver_id(node, ctx.address),
            ResolverEventPayload::NameChanged {
                name: name.to_string(),
            },
        )
    }

    pub fn handle_abi_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        content_type: U256,
    ) -> Result<Outcome, MappingError> {
        self.append(
            ctx,
            resolver_id(node, ctx.address),
            ResolverEventPayload::AbiChanged { content_type },
        )
    }

    pub fn handle_pubkey_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        x: B256,
        y: B256,
    ) -> Result<Outcome, MappingError> {
        self.append(
            ctx,
            resolver_id(node, ctx.address),
            ResolverEventPayload::PubkeyChanged { x, y },
        )
    }

    /// `value` is the log's own value, for resolvers that emit one. Otherwise
    /// it is recovered from the transaction input.
    pub fn handle_text_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        key: &str,
        value: Option<&str>,
    ) -> Result<Outcome, MappingError> {
        let mut resolver = get_or_create_resolver(&self.store, node, ctx.address)?;
        add_text_key(&mut resolver, key);
        self.store.save(&resolver)?;

        let value = match value {
            Some(value) => TextValue::decoded(value),
            None => self.recover_text(ctx),
        };

        self.append(
            ctx,
            resolver.id,
            ResolverEventPayload::TextChanged {
                key: key.to_string(),
                value,
            },
        )
    }

    pub fn handle_contenthash_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        hash: &Bytes,
    ) -> Result<Outcome, MappingError> {
        let mut resolver = get_or_create_resolver(&self.store, node, ctx.address)?;
        resolver.content_hash = Some(hash.clone());
        self.store.save(&resolver)?;

        self.append(
            ctx,
            resolver.id,
            ResolverEventPayload::ContenthashChanged { hash: hash.clone() },
        )
    }

    pub fn handle_interface_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        interface_id: FixedBytes<4>,
        implementer: Address,
    ) -> Result<Outcome, MappingError> {
        self.append(
            ctx,
            resolver_id(node, ctx.address),
            ResolverEventPayload::InterfaceChanged {
                interface_id,
                implementer: hex_id(implementer),
            },
        )
    }

    pub fn handle_authorisation_changed(
        &self,
        ctx: &EventContext,
        node: B256,
        owner: Address,
        target: Address,
        is_authorised: bool,
    ) -> Result<Outcome, MappingError> {
        self.append(
            ctx,
            resolver_id(node, ctx.address),
            ResolverEventPayload::AuthorisationChanged {
                owner: hex_id(owner),
                target: hex_id(target),
                is_authorized: is_authorised,
            },
        )
    }

    fn recover_text(&self, ctx: &EventContext) -> TextValue {
        if !self.config.recover_text_values {
            return TextValue::Undecodable {
                reason: "text value recovery disabled".into(),
            };
        }
        recover_text_value(ctx).into_text_value()
    }

    /// Write the change-log record for this log unless one already exists.
    fn append(
        &self,
        ctx: &EventContext,
        resolver: String,
        payload: ResolverEventPayload,
    ) -> Result<Outcome, MappingError> {
        let id = event_id(ctx.block_number, ctx.log_index);
        if self.store.exists::<ResolverEventRecord>(&id)? {
            debug!(id = %id, "resolver event already recorded");
            return Ok(Outcome::AlreadyRecorded { id });
        }

        let record = ResolverEventRecord {
            id: id.clone(),
            resolver,
            block_number: ctx.block_number,
            transaction_id: ctx.transaction.hash,
            payload,
        };
        self.store.save(&record)?;
        info!(
            chain = %self.config.chain,
            id = %id,
            resolver = %record.resolver,
            kind = payload_kind(&record.payload),
            "resolver event recorded"
        );
        Ok(Outcome::Recorded { id })
    }

    fn discard(&self, reason: DiscardReason) -> Outcome {
        Outcome::Discarded { reason }
    }
}

fn payload_kind(payload: &ResolverEventPayload) -> &'static str {
    match payload {
        ResolverEventPayload::AddrChanged { .. } => "AddrChanged",
        ResolverEventPayload::MulticoinAddrChanged { .. } => "MulticoinAddrChanged",
        ResolverEventPayload::NameChanged { .. } => "NameChanged",
        ResolverEventPayload::AbiChanged { .. } => "AbiChanged",
        ResolverEventPayload::PubkeyChanged { .. } => "PubkeyChanged",
        ResolverEventPayload::TextChanged { .. } => "TextChanged",
        ResolverEventPayload::ContenthashChanged { .. } => "ContenthashChanged",
        ResolverEventPayload::InterfaceChanged { .. } => "InterfaceChanged",
        ResolverEventPayload::AuthorisationChanged { .. } => "AuthorisationChanged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolverindex_core::entity::{Domain, EntityKind, Resolver};
    use resolverindex_core::event::TransactionInfo;
    use resolverindex_storage::InMemoryStore;

    fn contract() -> Address {
        Address::repeat_byte(0x4d)
    }

    fn node() -> B256 {
        B256::repeat_byte(0x01)
    }

    fn ctx(block_number: u64, log_index: u64) -> EventContext {
        EventContext {
            address: contract(),
            block_number,
            log_index,
            topic0: B256::ZERO,
            transaction: TransactionInfo {
                hash: B256::repeat_byte(0xaa),
                input: Bytes::new(),
            },
            receipt: None,
        }
    }

    fn log(block_number: u64, log_index: u64, event: ResolverEvent) -> ResolverLog {
        ResolverLog {
            ctx: ctx(block_number, log_index),
            event,
        }
    }

    fn mapping() -> ResolverMapping<InMemoryStore> {
        ResolverMapping::new(InMemoryStore::new(), MappingConfig::default())
    }

    fn record(m: &ResolverMapping<InMemoryStore>, id: &str) -> ResolverEventRecord {
        m.store().load(id).unwrap().unwrap()
    }

    fn resolver(m: &ResolverMapping<InMemoryStore>) -> Resolver {
        m.store().load(&resolver_id(node(), contract())).unwrap().unwrap()
    }

    #[test]
    fn addr_changed_writes_account_resolver_and_record() {
        let m = mapping();
        let a = Address::repeat_byte(0x77);
        let outcome = m
            .handle(&log(10, 0, ResolverEvent::AddrChanged { node: node(), a }))
            .unwrap();
        assert_eq!(outcome, Outcome::Recorded { id: "10-0".into() });

        assert!(m.store().load::<Account>(&hex_id(a)).unwrap().is_some());
        assert_eq!(resolver(&m).addr, Some(hex_id(a)));

        let rec = record(&m, "10-0");
        assert_eq!(rec.resolver, resolver_id(node(), contract()));
        assert_eq!(rec.block_number, 10);
        assert_eq!(rec.transaction_id, B256::repeat_byte(0xaa));
        assert_eq!(rec.payload, ResolverEventPayload::AddrChanged { addr: hex_id(a) });
    }

    #[test]
    fn addr_changed_updates_domain_on_this_resolver_only() {
        let m = mapping();
        let ours = Domain {
            id: hex_id(node()),
            resolver: Some(resolver_id(node(), contract())),
            resolved_address: None,
        };
        m.store().save(&ours).unwrap();

        let a = Address::repeat_byte(0x77);
        m.handle(&log(10, 0, ResolverEvent::AddrChanged { node: node(), a })).unwrap();
        let domain: Domain = m.store().load(&ours.id).unwrap().unwrap();
        assert_eq!(domain.resolved_address, Some(hex_id(a)));

        // The domain moves to another resolver; our resolver's updates no longer apply.
        let moved = Domain {
            resolver: Some(resolver_id(node(), Address::repeat_byte(0x99))),
            ..domain
        };
        m.store().save(&moved).unwrap();
        let b = Address::repeat_byte(0x88);
        m.handle(&log(11, 0, ResolverEvent::AddrChanged { node: node(), a: b })).unwrap();

        let domain: Domain = m.store().load(&moved.id).unwrap().unwrap();
        assert_eq!(domain.resolved_address, Some(hex_id(a)));
        assert_eq!(resolver(&m).addr, Some(hex_id(b)));
    }

    #[test]
    fn multicoin_accumulates_coin_types_once() {
        let m = mapping();
        for (i, coin) in [60u64, 0, 60, 2].into_iter().enumerate() {
            m.handle(&log(
                20,
                i as u64,
                ResolverEvent::AddressChanged {
                    node: node(),
                    coin_type: U256::from(coin),
                    new_address: Bytes::from(vec![coin as u8; 20]),
                },
            ))
            .unwrap();
        }
        assert_eq!(
            resolver(&m).coin_types.unwrap().to_vec(),
            vec![U256::from(60), U256::from(0), U256::from(2)]
        );
        assert_eq!(m.store().count(EntityKind::ResolverEvent).unwrap(), 4);
        assert_eq!(
            record(&m, "20-2").payload,
            ResolverEventPayload::MulticoinAddrChanged {
                coin_type: U256::from(60),
                addr: Bytes::from(vec![60u8; 20]),
            }
        );
    }

    #[test]
    fn name_with_nul_is_dropped() {
        let m = mapping();
        let outcome = m
            .handle(&log(
                30,
                1,
                ResolverEvent::NameChanged {
                    node: node(),
                    name: "vitalik.eth\0garbage".into(),
                },
            ))
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Discarded {
                reason: DiscardReason::NullByteInName
            }
        );
        assert_eq!(m.store().count(EntityKind::ResolverEvent).unwrap(), 0);
    }

    #[test]
    fn name_changed_recorded() {
        let m = mapping();
        m.handle(&log(
            30,
            2,
            ResolverEvent::NameChanged {
                node: node(),
                name: "vitalik.eth".into(),
            },
        ))
        .unwrap();
        assert_eq!(
            record(&m, "30-2").payload,
            ResolverEventPayload::NameChanged {
                name: "vitalik.eth".into()
            }
        );
        // Name records do not create resolver state.
        assert_eq!(m.store().count(EntityKind::Resolver).unwrap(), 0);
    }

    #[test]
    fn record_only_kinds() {
        let m = mapping();
        let events = vec![
            ResolverEvent::AbiChanged {
                node: node(),
                content_type: U256::from(1),
            },
            ResolverEvent::PubkeyChanged {
                node: node(),
                x: B256::repeat_byte(0x0a),
                y: B256::repeat_byte(0x0b),
            },
            ResolverEvent::InterfaceChanged {
                node: node(),
                interface_id: FixedBytes::from([0x01, 0xff, 0xc9, 0xa7]),
                implementer: Address::repeat_byte(0x12),
            },
            ResolverEvent::AuthorisationChanged {
                node: node(),
                owner: Address::repeat_byte(0x13),
                target: Address::repeat_byte(0x14),
                is_authorised: true,
            },
        ];
        for (i, event) in events.into_iter().enumerate() {
            m.handle(&log(40, i as u64, event)).unwrap();
        }

        assert_eq!(
            record(&m, "40-2").payload,
            ResolverEventPayload::InterfaceChanged {
                interface_id: FixedBytes::from([0x01, 0xff, 0xc9, 0xa7]),
                implementer: hex_id(Address::repeat_byte(0x12)),
            }
        );
        assert_eq!(
            record(&m, "40-3").payload,
            ResolverEventPayload::AuthorisationChanged {
                owner: hex_id(Address::repeat_byte(0x13)),
                target: hex_id(Address::repeat_byte(0x14)),
                is_authorized: true,
            }
        );
        assert_eq!(m.store().count(EntityKind::ResolverEvent).unwrap(), 4);
    }

    #[test]
    fn contenthash_sets_resolver_state() {
        let m = mapping();
        let hash = Bytes::from(vec![0xe3, 0x01, 0x01, 0x70]);
        m.handle(&log(
            50,
            0,
            ResolverEvent::ContenthashChanged {
                node: node(),
                hash: hash.clone(),
            },
        ))
        .unwrap();
        assert_eq!(resolver(&m).content_hash, Some(hash.clone()));
        assert_eq!(
            record(&m, "50-0").payload,
            ResolverEventPayload::ContenthashChanged { hash }
        );
    }

    #[test]
    fn text_value_from_log_is_used_directly() {
        let m = mapping();
        m.handle(&log(
            60,
            0,
            ResolverEvent::TextChanged {
                node: node(),
                key: "com.twitter".into(),
                value: Some("@ens".into()),
            },
        ))
        .unwrap();
        assert_eq!(
            record(&m, "60-0").payload,
            ResolverEventPayload::TextChanged {
                key: "com.twitter".into(),
                value: TextValue::decoded("@ens"),
            }
        );
    }

    #[test]
    fn uncorrelated_text_is_still_recorded() {
        let m = mapping();
        let outcome = m
            .handle(&log(
                61,
                0,
                ResolverEvent::TextChanged {
                    node: node(),
                    key: "url".into(),
                    value: None,
                },
            ))
            .unwrap();
        assert_eq!(outcome, Outcome::Recorded { id: "61-0".into() });
        match record(&m, "61-0").payload {
            ResolverEventPayload::TextChanged { key, value } => {
                assert_eq!(key, "url");
                assert!(matches!(value, TextValue::Undecodable { .. }));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(resolver(&m).texts.unwrap().to_vec(), vec!["url".to_string()]);
    }

    #[test]
    fn replay_keeps_state_and_first_record() {
        let m = mapping();
        let ev = log(
            70,
            5,
            ResolverEvent::TextChanged {
                node: node(),
                key: "avatar".into(),
                value: Some("ipfs://a".into()),
            },
        );
        assert_eq!(m.handle(&ev).unwrap(), Outcome::Recorded { id: "70-5".into() });
        assert_eq!(
            m.handle(&ev).unwrap(),
            Outcome::AlreadyRecorded { id: "70-5".into() }
        );

        assert_eq!(resolver(&m).texts.unwrap().len(), 1);
        assert_eq!(m.store().count(EntityKind::ResolverEvent).unwrap(), 1);
        assert_eq!(
            record(&m, "70-5").payload,
            ResolverEventPayload::TextChanged {
                key: "avatar".into(),
                value: TextValue::decoded("ipfs://a"),
            }
        );
    }

    #[test]
    fn unindexed_contract_is_skipped() {
        let config = MappingConfig {
            contracts: vec![hex_id(Address::repeat_byte(0x01))],
            ..Default::default()
        };
        let m = ResolverMapping::new(InMemoryStore::new(), config);
        let outcome = m
            .handle(&log(
                80,
                0,
                ResolverEvent::AbiChanged {
                    node: node(),
                    content_type: U256::from(1),
                },
            ))
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Discarded {
                reason: DiscardReason::ContractNotIndexed
            }
        );
        assert_eq!(m.store().count(EntityKind::ResolverEvent).unwrap(), 0);
    }

    #[test]
    fn recovery_can_be_disabled() {
        let config = MappingConfig {
            recover_text_values: false,
            ..Default::default()
        };
        let m = ResolverMapping::new(InMemoryStore::new(), config);
        m.handle(&log(
            90,
            0,
            ResolverEvent::TextChanged {
                node: node(),
                key: "url".into(),
                value: None,
            },
        ))
        .unwrap();
        assert_eq!(
            record(&m, "90-0").payload,
            ResolverEventPayload::TextChanged {
                key: "url".into(),
                value: TextValue::Undecodable {
                    reason: "text value recovery disabled".into()
                },
            }
        );
    }
}
