//! Record encoder and decoder.

use chrono::{DateTime, Utc};

use super::MatchRecord;
use crate::bit_vector::BitVector;
use crate::{Error, Result};

/// Size of the encoded timestamp field.
pub const TIMESTAMP_SIZE: usize = 8;

/// Size of the encoded id field.
pub const ID_SIZE: usize = 8;

/// Size of the fixed tail following the matched bits.
pub const TAIL_SIZE: usize = TIMESTAMP_SIZE + ID_SIZE;

/// Encode a record as `matched bits || timestamp (i64 BE) || id (i64 BE)`.
///
/// The matched bits are written in their full raw byte form.
pub fn encode(record: &MatchRecord) -> Vec<u8> {
    let matched = record.matched().as_bytes();
    let mut buffer = Vec::with_capacity(matched.len() + TAIL_SIZE);
    buffer.extend_from_slice(matched);
    buffer.extend_from_slice(&record.timestamp().timestamp().to_be_bytes());
    buffer.extend_from_slice(&record.id().to_be_bytes());
    log::trace!("Encoded record {} ({} bytes)", record.id(), buffer.len());
    buffer
}

/// Decode a record produced by [`encode`].
///
/// Everything before the last [`TAIL_SIZE`] bytes is taken as matched bits;
/// any byte pattern is accepted there. Trailing all-zero bytes of that
/// section are not kept, so the decoded vector can report a smaller capacity
/// than the one encoded while holding the same set bits.
pub fn decode(bytes: &[u8]) -> Result<MatchRecord> {
    if bytes.len() < TAIL_SIZE {
        return Err(Error::InvalidArgument(format!(
            "record needs at least {} bytes, got {}",
            TAIL_SIZE,
            bytes.len()
        )));
    }

    let (matched, tail) = bytes.split_at(bytes.len() - TAIL_SIZE);
    let (timestamp, id) = tail.split_at(TIMESTAMP_SIZE);

    let secs = i64::from_be_bytes(read_field(timestamp)?);
    let id = i64::from_be_bytes(read_field(id)?);
    let timestamp = DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
        Error::InvalidArgument(format!("timestamp {} is out of range", secs))
    })?;

    log::trace!("Decoded record {} ({} bytes)", id, bytes.len());
    Ok(MatchRecord::new(BitVector::from_bytes(matched), timestamp, id))
}

/// Like [`decode`], for callers whose buffer may be absent. `None` fails with
/// [`Error::NullInput`].
pub fn decode_opt(bytes: Option<&[u8]>) -> Result<MatchRecord> {
    decode(bytes.ok_or(Error::NullInput("bytes"))?)
}

fn read_field(slice: &[u8]) -> Result<[u8; 8]> {
    slice
        .try_into()
        .map_err(|_| Error::InternalFailure(format!("expected 8 byte field, got {}", slice.len())))
}
