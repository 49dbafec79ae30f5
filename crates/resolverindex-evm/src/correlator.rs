//! Locates the `setText` call responsible for a given `TextChanged` log.
//!
//! # How it works
//! 1. Rank the log among the receipt's logs with the same topic0 (`k`).
//! 2. Collect every byte offset of the `setText` selector in the input.
//! 3. The `k`-th offset is the call that emitted the log.
//!
//! A top-level `setText` starts at offset 0 and spans the whole input. A call
//! batched through `multicall(bytes[])` is an ABI `bytes` element, so the
//! 32-byte word directly before its selector holds its encoded length.

use alloy_primitives::B256;
use resolverindex_core::event::ReceiptLog;
use std::fmt;
use thiserror::Error;

const WORD: usize = 32;
const SELECTOR_LEN: usize = 4;

/// Byte position inside transaction call-data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteOffset(pub usize);

impl ByteOffset {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ByteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a log could not be tied to a call in its transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("transaction receipt logs not provided")]
    MissingReceipt,

    #[error("log {log_index} not found among receipt logs with the same topic")]
    TriggerNotInReceipt { log_index: u64 },

    #[error("call #{rank} requested but input holds {found} setText selector(s)")]
    SelectorNotFound { rank: usize, found: usize },

    #[error("no length word before call at byte {offset}")]
    MissingLengthWord { offset: ByteOffset },

    #[error("call at byte {offset} claims {len} bytes, {available} available")]
    LengthOutOfRange {
        offset: ByteOffset,
        len: usize,
        available: usize,
    },
}

/// The argument bytes of one located call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedCall<'a> {
    /// Where the selector starts.
    pub offset: ByteOffset,
    /// Arguments with the selector stripped.
    pub args: &'a [u8],
}

/// Rank of the log at `log_index` among the receipt logs sharing `topic0`.
pub fn event_rank(
    logs: &[ReceiptLog],
    log_index: u64,
    topic0: B256,
) -> Result<usize, CorrelationError> {
    logs.iter()
        .filter(|log| log.topic0 == Some(topic0))
        .position(|log| log.log_index == log_index)
        .ok_or(CorrelationError::TriggerNotInReceipt { log_index })
}

/// Every byte-aligned offset at which `selector` occurs in `input`.
pub fn selector_offsets(input: &[u8], selector: [u8; 4]) -> Vec<ByteOffset> {
    input
        .windows(SELECTOR_LEN)
        .enumerate()
        .filter(|(_, window)| *window == selector)
        .map(|(i, _)| ByteOffset(i))
        .collect()
}

/// Find the `rank`-th call to `selector` in `input` and slice out its arguments.
pub fn locate_call(
    input: &[u8],
    selector: [u8; 4],
    rank: usize,
) -> Result<LocatedCall<'_>, CorrelationError> {
    let offsets = selector_offsets(input, selector);
    let offset = *offsets.get(rank).ok_or(CorrelationError::SelectorNotFound {
        rank,
        found: offsets.len(),
    })?;

    let call_len = if offset.0 == 0 {
        input.len()
    } else {
        length_word_before(input, offset)?
    };

    let available = input.len() - offset.0;
    if call_len < SELECTOR_LEN || call_len > available {
        return Err(CorrelationError::LengthOutOfRange {
            offset,
            len: call_len,
            available,
        });
    }

    Ok(LocatedCall {
        offset,
        args: &input[offset.0 + SELECTOR_LEN..offset.0 + call_len],
    })
}

/// Big-endian length word ending at `offset`.
fn length_word_before(input: &[u8], offset: ByteOffset) -> Result<usize, CorrelationError> {
    let start = offset
        .0
        .checked_sub(WORD)
        .ok_or(CorrelationError::MissingLengthWord { offset })?;
    let (high, low) = input[start..offset.0].split_at(WORD - 8);

    let too_large = CorrelationError::LengthOutOfRange {
        offset,
        len: usize::MAX,
        available: input.len() - offset.0,
    };
    if high.iter().any(|b| *b != 0) {
        return Err(too_large);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buf)).map_err(|_| too_large)
}
