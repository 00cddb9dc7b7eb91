//! Sized bit vector generation from rule priority lists.
//!
//! A generated vector starts from an all-ones template whose capacity is the
//! requested length rounded up to a whole byte, then has one bit toggled for
//! every priority index supplied. A present priority therefore clears its
//! bit; an index listed twice is toggled back.

mod template_cache;

pub use template_cache::TemplateStats;

use crate::bit_vector::{round_up_to_byte, BitVector};
use crate::config::GeneratorConfig;
use crate::{Error, Result};
use template_cache::TemplateCache;

/// Produces priority bit vectors from cached all-ones templates.
///
/// # Example
///
/// ```
/// use prioritysort::BitVectorGenerator;
///
/// let generator = BitVectorGenerator::new();
/// let bits = generator.generate(&[0, 2], 5).unwrap();
///
/// assert_eq!(bits.capacity(), 8);
/// assert!(!bits.get(0));
/// assert!(bits.get(1));
/// assert!(!bits.get(2));
/// assert_eq!(bits.cardinality(), 6);
/// ```
pub struct BitVectorGenerator {
    templates: TemplateCache,
    config: GeneratorConfig,
}

impl BitVectorGenerator {
    /// Create a generator with the default cache configuration.
    pub fn new() -> Self {
        Self::from_valid_config(GeneratorConfig::default())
    }

    /// Create a generator with a custom cache configuration.
    pub fn with_config(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GeneratorConfig) -> Self {
        Self {
            templates: TemplateCache::new(config.clone()),
            config,
        }
    }

    /// Generate a bit vector for `priorities` over `length` rules.
    ///
    /// 1. `priorities` may not hold more entries than `length`.
    /// 2. A zero `length` yields an empty vector.
    /// 3. Every priority must lie in `0..length`.
    /// 4. The result has `length` rounded up to a multiple of 8 bits, all set,
    ///    with each listed priority toggled.
    ///
    /// The returned vector is owned by the caller; the shared template it was
    /// copied from is never modified.
    pub fn generate(&self, priorities: &[i32], length: i32) -> Result<BitVector> {
        if priorities.len() as i64 > length as i64 {
            return Err(Error::InvalidArgument(format!(
                "{} priorities do not fit in length {}",
                priorities.len(),
                length
            )));
        }
        if length == 0 {
            return Ok(BitVector::default());
        }
        if let Some(v) = priorities.iter().find(|&&v| v < 0 || v >= length) {
            return Err(Error::InvalidArgument(format!(
                "priority {} is outside 0..{}",
                v, length
            )));
        }

        let capacity = round_up_to_byte(length as usize);
        let template = self.templates.get(capacity)?;
        let mut bits = BitVector::clone(&template);
        for &v in priorities {
            bits.flip(v as usize);
        }
        Ok(bits)
    }

    /// Like [`generate`](Self::generate), for callers whose priority list may
    /// be absent. `None` fails with [`Error::NullInput`].
    pub fn generate_opt(&self, priorities: Option<&[i32]>, length: i32) -> Result<BitVector> {
        let priorities = priorities.ok_or(Error::NullInput("priorities"))?;
        self.generate(priorities, length)
    }

    /// Get the configuration this generator was built with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Get template cache statistics.
    pub fn template_stats(&self) -> TemplateStats {
        self.templates.stats()
    }

    /// Drop all cached templates.
    pub fn clear_templates(&self) {
        self.templates.clear();
    }
}

impl Default for BitVectorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i32, end: i32) -> Vec<i32> {
        (start..end).collect()
    }

    #[test]
    fn test_value_bigger_than_length() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate(&[100], 99).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_value_equal_to_length() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate(&[8], 8).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_value() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate(&[-1], 8).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_absent_priorities() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate_opt(None, 99).unwrap_err();
        assert!(matches!(err, Error::NullInput(_)));
    }

    #[test]
    fn test_length_less_than_priority_count() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate(&[0, 1], 1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_length_less_than_zero() {
        let generator = BitVectorGenerator::new();
        let err = generator.generate(&[], -1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_empty() {
        let generator = BitVectorGenerator::new();
        let bits = generator.generate(&[], 0).unwrap();
        assert_eq!(bits, BitVector::new(0));
        assert_eq!(bits.capacity(), 0);
        assert_eq!(bits.cardinality(), 0);
        // No template is built for an empty request
        assert_eq!(generator.template_stats().misses, 0);
    }

    #[test]
    fn test_change_lengths() {
        let generator = BitVectorGenerator::new();
        let cases = [
            (range(0, 7), 8, 1),
            (range(1, 7), 8, 2),
            (range(1, 7), 16, 10),
            (range(1, 7), 12, 10),
        ];
        for (values, length, cardinality) in cases {
            let bits = generator.generate(&values, length).unwrap();
            assert_eq!(bits.cardinality(), cardinality, "length {}", length);
        }
    }

    #[test]
    fn test_capacity_is_rounded_up() {
        let generator = BitVectorGenerator::new();
        for length in 1..=40 {
            let bits = generator.generate(&[], length).unwrap();
            let expected = ((length + 7) / 8 * 8) as usize;
            assert_eq!(bits.capacity(), expected);
            assert_eq!(bits.cardinality(), expected);
        }
    }

    #[test]
    fn test_duplicates_cancel() {
        let generator = BitVectorGenerator::new();
        let bits = generator.generate(&[1, 1, 2], 8).unwrap();
        assert!(bits.get(1));
        assert!(!bits.get(2));
        assert_eq!(bits.cardinality(), 7);
    }

    #[test]
    fn test_padding_bits_stay_set() {
        let generator = BitVectorGenerator::new();
        let bits = generator.generate(&[0, 4], 5).unwrap();
        assert_eq!(bits.as_bytes(), &[0b1110_1110]);
    }

    #[test]
    fn test_template_not_mutated() {
        let generator = BitVectorGenerator::new();
        let first = generator.generate(&[0, 1, 2], 8).unwrap();
        let second = generator.generate(&[], 8).unwrap();
        assert_eq!(first.cardinality(), 5);
        assert_eq!(second.cardinality(), 8);
        assert_ne!(first.as_bytes().as_ptr(), second.as_bytes().as_ptr());
        assert_eq!(generator.template_stats().hits, 1);
    }

    #[test]
    fn test_lengths_sharing_a_template() {
        let generator = BitVectorGenerator::new();
        generator.generate(&[], 9).unwrap();
        generator.generate(&[], 16).unwrap();
        let stats = generator.template_stats();
        assert_eq!(stats.len, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_rejects_bad_config() {
        let result = BitVectorGenerator::with_config(GeneratorConfig::with_capacity(0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_no_cache_generator() {
        let generator = BitVectorGenerator::with_config(GeneratorConfig::no_cache()).unwrap();
        let bits = generator.generate(&[3], 4).unwrap();
        assert_eq!(bits.cardinality(), 7);
        assert!(!generator.template_stats().enabled);
    }

    #[test]
    fn test_clear_templates() {
        let generator = BitVectorGenerator::new();
        generator.generate(&[], 8).unwrap();
        assert_eq!(generator.template_stats().len, 1);
        generator.clear_templates();
        assert_eq!(generator.template_stats().len, 0);
    }
}
