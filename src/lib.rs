//! prioritysort - compact, cacheable rule match results.
//!
//! This crate turns the outcome of evaluating a prioritized rule set into a
//! fixed-width bit vector, and bundles that vector with a timestamp and an id
//! into a record with a stable binary form for key/value storage.
//!
//! # Features
//!
//! - **Cached templates**: bit vectors are cloned from shared all-ones
//!   templates, one per byte-rounded capacity
//! - **Thread-safe**: concurrent first requests for a capacity build its
//!   template once
//! - **Bounded cache**: templates expire after an idle period and the number
//!   of distinct capacities is capped
//! - **Binary records**: `matched bits || timestamp || id`, big-endian tail
//!
//! # Quick Start
//!
//! ```
//! use chrono::Utc;
//! use prioritysort::{BitVectorGenerator, MatchRecord};
//!
//! let generator = BitVectorGenerator::new();
//!
//! // Rules 0 and 3 of 10 are flagged (lower index = higher priority)
//! let matched = generator.generate(&[0, 3], 10)?;
//! assert_eq!(matched.capacity(), 16);
//!
//! let record = MatchRecord::new(matched, Utc::now(), 42);
//! let bytes = record.to_bytes();
//! assert_eq!(bytes.len(), 2 + 16);
//!
//! let decoded = MatchRecord::from_bytes(&bytes)?;
//! assert_eq!(decoded, record);
//! # Ok::<(), prioritysort::Error>(())
//! ```
//!
//! # Bit Polarity
//!
//! Generated vectors start with every bit set. Each listed priority toggles
//! its bit, so a listed rule reads as `0` and an unlisted one as `1`. A
//! priority listed twice is toggled back to `1`.

mod bit_vector;
mod config;
mod error;
mod global;

pub mod generator;
pub mod record;
pub mod store;

// Re-export core types
pub use bit_vector::{round_up_to_byte, BitVector, BITS_PER_BYTE};
pub use config::{GeneratorConfig, DEFAULT_IDLE_TTL, DEFAULT_MAX_TEMPLATES};
pub use error::{Error, Result};

// Re-export generator and record types
pub use generator::{BitVectorGenerator, TemplateStats};
pub use record::{MatchRecord, MatchRecordBuilder};
pub use store::{RecordMutationClient, RecordQueryClient};

// Re-export global API functions
pub use global::{generate, reconfigure, template_stats};
