//! Generator configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default number of distinct template capacities kept in the cache.
pub const DEFAULT_MAX_TEMPLATES: usize = 1_000;

/// Default idle time after which a cached template is dropped (one day).
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for [`BitVectorGenerator`](crate::BitVectorGenerator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum number of cached templates (one per rounded capacity).
    pub max_templates: usize,
    /// Idle time since last access after which a template expires.
    #[serde(rename = "idle_ttl_secs", with = "duration_secs")]
    pub idle_ttl: Duration,
    /// Whether to cache templates at all.
    pub cache_enabled: bool,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        d.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_templates: DEFAULT_MAX_TEMPLATES,
            idle_ttl: DEFAULT_IDLE_TTL,
            cache_enabled: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with the specified template capacity.
    pub fn with_capacity(max_templates: usize) -> Self {
        Self {
            max_templates,
            ..Self::default()
        }
    }

    /// Create a configuration with caching disabled.
    ///
    /// Every request then builds its template from scratch.
    pub fn no_cache() -> Self {
        Self {
            max_templates: 0,
            idle_ttl: Duration::ZERO,
            cache_enabled: false,
        }
    }

    /// Replace the idle expiry.
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Check the configuration for values the cache cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_enabled && self.max_templates == 0 {
            return Err(Error::Config(
                "max_templates must be positive when caching is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. Files ending in `.json` are read as JSON,
    /// anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}
