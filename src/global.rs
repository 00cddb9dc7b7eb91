//! Global generator and public API.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::bit_vector::BitVector;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generator::{BitVectorGenerator, TemplateStats};

/// Global generator
static GLOBAL_GENERATOR: Lazy<RwLock<Arc<BitVectorGenerator>>> =
    Lazy::new(|| RwLock::new(Arc::new(BitVectorGenerator::new())));

fn current() -> Arc<BitVectorGenerator> {
    GLOBAL_GENERATOR.read().clone()
}

/// Generate a priority bit vector with the global generator.
///
/// # Examples
/// ```
/// let bits = prioritysort::generate(&[1, 2], 12).unwrap();
/// assert_eq!(bits.capacity(), 16);
/// assert_eq!(bits.cardinality(), 14);
/// ```
pub fn generate(priorities: &[i32], length: i32) -> Result<BitVector> {
    current().generate(priorities, length)
}

/// Replace the global generator with one built from `config`.
///
/// Calls already running finish on the previous generator; its cached
/// templates are dropped once they do.
pub fn reconfigure(config: GeneratorConfig) -> Result<()> {
    let generator = BitVectorGenerator::with_config(config)?;
    log::info!(
        "Reconfigured generator: cache_enabled={}, max_templates={}, idle_ttl={:?}",
        generator.config().cache_enabled,
        generator.config().max_templates,
        generator.config().idle_ttl
    );
    *GLOBAL_GENERATOR.write() = Arc::new(generator);
    Ok(())
}

/// Template cache statistics of the global generator.
pub fn template_stats() -> TemplateStats {
    current().template_stats()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_generate() {
        let bits = generate(&[0, 7], 8).unwrap();
        assert_eq!(bits.as_bytes(), &[0b0111_1110]);
    }

    #[test]
    fn test_reconfigure_rejects_invalid_config() {
        let err = reconfigure(GeneratorConfig::with_capacity(0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        // The existing generator keeps working
        assert!(generate(&[], 8).is_ok());
    }
}
