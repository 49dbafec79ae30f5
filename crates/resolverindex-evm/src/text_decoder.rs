//! Decodes `setText(bytes32 node, string key, string value)` arguments and
//! composes the full value-recovery path for a `TextChanged` log.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;
use resolverindex_core::entity::TextValue;
use resolverindex_core::event::EventContext;
use thiserror::Error;
use tracing::{debug, warn};

use crate::correlator::{event_rank, locate_call, CorrelationError};
use crate::fingerprint::set_text_selector;

/// Head word pointing the decoder at a tuple that starts right after it.
/// `abi_decode` on a dynamic tuple expects this indirection; bare call
/// arguments do not carry it.
const TUPLE_OFFSET_WORD: [u8; 32] = {
    let mut word = [0u8; 32];
    word[31] = 0x20;
    word
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextDecodeError {
    #[error("ABI decode failed: {reason}")]
    Abi { reason: String },

    #[error("decoded value is not a (bytes32,string,string) tuple")]
    UnexpectedShape,
}

/// Decoded arguments of one `setText` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTextCall {
    pub node: B256,
    pub key: String,
    pub value: String,
}

fn set_text_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::FixedBytes(32),
        DynSolType::String,
        DynSolType::String,
    ])
}

/// Decode `setText` arguments (selector already stripped).
pub fn decode_set_text_args(args: &[u8]) -> Result<SetTextCall, TextDecodeError> {
    let mut data = Vec::with_capacity(TUPLE_OFFSET_WORD.len() + args.len());
    data.extend_from_slice(&TUPLE_OFFSET_WORD);
    data.extend_from_slice(args);

    let decoded = set_text_type()
        .abi_decode(&data)
        .map_err(|e| TextDecodeError::Abi {
            reason: e.to_string(),
        })?;

    let fields = match decoded {
        DynSolValue::Tuple(fields) => fields,
        _ => return Err(TextDecodeError::UnexpectedShape),
    };
    match <[DynSolValue; 3]>::try_from(fields) {
        Ok([
            DynSolValue::FixedBytes(node, 32),
            DynSolValue::String(key),
            DynSolValue::String(value),
        ]) => Ok(SetTextCall { node, key, value }),
        _ => Err(TextDecodeError::UnexpectedShape),
    }
}

/// Outcome of recovering a text value from call-data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRecovery {
    Recovered(String),
    /// The call was located but its arguments did not decode.
    DecodeFailed(TextDecodeError),
    /// No call could be tied to the log.
    Uncorrelated(CorrelationError),
}

impl TextRecovery {
    /// Stored form: decode failures become an empty value, correlation
    /// failures an explicit undecodable marker.
    pub fn into_text_value(self) -> TextValue {
        match self {
            Self::Recovered(value) => TextValue::decoded(value),
            Self::DecodeFailed(_) => TextValue::decoded(""),
            Self::Uncorrelated(e) => TextValue::Undecodable {
                reason: e.to_string(),
            },
        }
    }
}

/// Recover the value written by the `setText` call behind a `TextChanged` log.
pub fn recover_text_value(ctx: &EventContext) -> TextRecovery {
    let located = ctx
        .receipt
        .as_deref()
        .ok_or(CorrelationError::MissingReceipt)
        .and_then(|logs| event_rank(logs, ctx.log_index, ctx.topic0))
        .and_then(|rank| locate_call(&ctx.transaction.input, set_text_selector(), rank));

    let call = match located {
        Ok(call) => call,
        Err(e) => {
            warn!(
                tx = %ctx.transaction.hash,
                log_index = ctx.log_index,
                error = %e,
                "could not correlate TextChanged log with a setText call"
            );
            return TextRecovery::Uncorrelated(e);
        }
    };

    match decode_set_text_args(call.args) {
        Ok(decoded) => {
            debug!(
                tx = %ctx.transaction.hash,
                offset = call.offset.get(),
                key = %decoded.key,
                "recovered text value"
            );
            TextRecovery::Recovered(decoded.value)
        }
        Err(e) => {
            warn!(
                tx = %ctx.transaction.hash,
                offset = call.offset.get(),
                selector = %hex::encode(set_text_selector()),
                error = %e,
                "setText arguments did not decode"
            );
            TextRecovery::DecodeFailed(e)
        }
    }
}
