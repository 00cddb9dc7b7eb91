//! Rule match records and their binary form.
//!
//! # Record Layout
//!
//! ```text
//! +------------------+
//! |   MATCHED BITS   |  N bytes (variable, LSB-first)
//! +------------------+
//! |    TIMESTAMP     |  8 bytes, i64 big-endian, Unix seconds (UTC)
//! +------------------+
//! |        ID        |  8 bytes, i64 big-endian
//! +------------------+
//! ```

mod codec;

pub use codec::{decode, decode_opt, encode, ID_SIZE, TAIL_SIZE, TIMESTAMP_SIZE};

use chrono::{DateTime, SubsecRound, Utc};

use crate::bit_vector::BitVector;
use crate::{Error, Result};

/// Outcome of evaluating a rule set: which rules matched, when, and for what.
///
/// Records are immutable. The timestamp is truncated to whole seconds on
/// construction, matching what the binary form can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRecord {
    matched: BitVector,
    timestamp: DateTime<Utc>,
    id: i64,
}

impl MatchRecord {
    /// Create a record.
    pub fn new(matched: BitVector, timestamp: DateTime<Utc>, id: i64) -> Self {
        Self {
            matched,
            timestamp: timestamp.trunc_subsecs(0),
            id,
        }
    }

    /// Start building a record field by field.
    pub fn builder() -> MatchRecordBuilder {
        MatchRecordBuilder::default()
    }

    /// Decode a record from its binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }

    /// Encode the record into its binary form.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    pub fn matched(&self) -> &BitVector {
        &self.matched
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Split the record into its fields.
    pub fn into_parts(self) -> (BitVector, DateTime<Utc>, i64) {
        (self.matched, self.timestamp, self.id)
    }
}

/// Builder for [`MatchRecord`]. Every field is required.
#[derive(Debug, Default, Clone)]
pub struct MatchRecordBuilder {
    matched: Option<BitVector>,
    timestamp: Option<DateTime<Utc>>,
    id: Option<i64>,
}

impl MatchRecordBuilder {
    pub fn matched(mut self, matched: BitVector) -> Self {
        self.matched = Some(matched);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Build the record, failing with [`Error::NullInput`] naming the first
    /// missing field.
    pub fn build(self) -> Result<MatchRecord> {
        let matched = self.matched.ok_or(Error::NullInput("matched"))?;
        let timestamp = self.timestamp.ok_or(Error::NullInput("timestamp"))?;
        let id = self.id.ok_or(Error::NullInput("id"))?;
        Ok(MatchRecord::new(matched, timestamp, id))
    }
}
