//! Cache of all-ones template vectors keyed by rounded capacity.
//!
//! This module provides:
//! - Bounded, thread-safe storage of templates shared between callers
//! - Single-flight loading: concurrent misses for one capacity build it once
//! - Idle expiry checked on access

use ahash::RandomState;
use quick_cache::sync::{Cache, DefaultLifecycle};
use quick_cache::UnitWeighter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::bit_vector::BitVector;
use crate::config::GeneratorConfig;
use crate::Result;

/// A cached template plus the time it was last handed out.
#[derive(Debug)]
struct CachedTemplate {
    bits: Arc<BitVector>,
    /// Milliseconds since the cache epoch
    last_access: AtomicU64,
}

impl CachedTemplate {
    fn new(bits: BitVector, now: u64) -> Self {
        Self {
            bits: Arc::new(bits),
            last_access: AtomicU64::new(now),
        }
    }

    fn touch(&self, now: u64) {
        self.last_access.fetch_max(now, Ordering::Relaxed);
    }

    fn idle_for(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_access.load(Ordering::Relaxed))
    }
}

type TemplateMap =
    Cache<usize, Arc<CachedTemplate>, UnitWeighter, RandomState, DefaultLifecycle<usize, Arc<CachedTemplate>>>;

/// Thread-safe template store.
pub(crate) struct TemplateCache {
    /// Backing cache, `None` when caching is disabled.
    map: Option<TemplateMap>,
    config: GeneratorConfig,
    epoch: Instant,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
}

impl TemplateCache {
    pub(crate) fn new(config: GeneratorConfig) -> Self {
        let map = if config.cache_enabled && config.max_templates > 0 {
            Some(Cache::with(
                config.max_templates,
                config.max_templates as u64,
                UnitWeighter,
                RandomState::default(),
                DefaultLifecycle::default(),
            ))
        } else {
            None
        };

        Self {
            map,
            config,
            epoch: Instant::now(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn is_stale(&self, template: &CachedTemplate, now: u64) -> bool {
        template.idle_for(now) >= self.config.idle_ttl.as_millis() as u64
    }

    /// Fetch the all-ones template for `capacity`, building it on a miss.
    pub(crate) fn get(&self, capacity: usize) -> Result<Arc<BitVector>> {
        self.get_or_load_with(capacity, BitVector::try_ones)
    }

    /// Fetch the template for `capacity`, calling `load` on a miss.
    ///
    /// `load` runs at most once per miss even when many threads miss on the
    /// same capacity together. Its errors are returned as-is and nothing is
    /// cached for that capacity.
    pub(crate) fn get_or_load_with<F>(&self, capacity: usize, load: F) -> Result<Arc<BitVector>>
    where
        F: FnOnce(usize) -> Result<BitVector>,
    {
        let Some(ref map) = self.map else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return load(capacity).map(Arc::new);
        };

        let now = self.now_millis();

        // Fast path
        if let Some(template) = map.get(&capacity) {
            if !self.is_stale(&template, now) {
                template.touch(now);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(&template.bits));
            }
            // Another thread may already have replaced the stale entry
            if map
                .remove_if(&capacity, |current| Arc::ptr_eq(current, &template))
                .is_some()
            {
                self.expirations.fetch_add(1, Ordering::Relaxed);
                log::debug!("Template for {} bits expired", capacity);
            }
        }

        let mut loaded = false;
        let template = map.get_or_insert_with(&capacity, || {
            loaded = true;
            log::debug!("Building template for {} bits", capacity);
            load(capacity).map(|bits| Arc::new(CachedTemplate::new(bits, now)))
        })?;

        if loaded {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            template.touch(now);
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(Arc::clone(&template.bits))
    }

    /// Drop every cached template.
    pub(crate) fn clear(&self) {
        if let Some(ref map) = self.map {
            map.clear();
        }
    }

    pub(crate) fn stats(&self) -> TemplateStats {
        TemplateStats {
            capacity: self.map.as_ref().map_or(0, |_| self.config.max_templates),
            len: self.map.as_ref().map_or(0, |m| m.len()),
            enabled: self.map.is_some(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

/// Template cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStats {
    /// Maximum number of cached templates.
    pub capacity: usize,
    /// Current number of cached templates.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Requests served from a cached template.
    pub hits: u64,
    /// Requests that had to build a template.
    pub misses: u64,
    /// Templates dropped for being idle too long.
    pub expirations: u64,
}

impl TemplateStats {
    /// Fraction of requests served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
