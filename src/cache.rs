use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fancy_regex::Regex;

use crate::error::PatternError;
use crate::extract::{compile, run_matcher};
use crate::flags::FlagSet;
use crate::types::MatchRecord;

/// Cached compiled pattern with insertion timestamp for TTL-based eviction.
struct CacheEntry {
    regex: Arc<Regex>,
    inserted_at: Instant,
}

/// Compiled-pattern cache keyed by (pattern, inline flag prefix). Flag
/// sets that compile identically (differing only in `g`/`u`/`y`) share
/// one slot. Only successful compiles are cached, so a broken pattern
/// is re-reported on every attempt.
pub struct CompiledCache {
    entries: DashMap<(String, String), CacheEntry>,
}

impl Default for CompiledCache {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl CompiledCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached matcher or compile and cache it. Uses `entry()`
    /// to avoid a TOCTOU race between get and insert.
    pub fn get_or_compile(
        &self,
        pattern: &str,
        flags: &FlagSet,
    ) -> Result<Arc<Regex>, PatternError> {
        match self
            .entries
            .entry((pattern.to_string(), flags.inline_prefix()))
        {
            Entry::Occupied(e) => Ok(Arc::clone(&e.get().regex)),
            Entry::Vacant(e) => {
                let regex = Arc::new(compile(pattern, flags)?);
                e.insert(CacheEntry {
                    regex: Arc::clone(&regex),
                    inserted_at: Instant::now(),
                });
                Ok(regex)
            }
        }
    }

    /// Cached variant of [`crate::extract::extract`].
    pub fn extract(
        &self,
        pattern: &str,
        flags: &FlagSet,
        text: &str,
    ) -> Result<Vec<MatchRecord>, PatternError> {
        let matcher = self.get_or_compile(pattern, flags)?;
        run_matcher(&matcher, pattern, flags, text)
    }

    /// Evict patterns compiled more than `max_age` ago.
    pub fn prune(&self, max_age: Duration) {
        let Some(cutoff) = Instant::now().checked_sub(max_age) else {
            return;
        };
        self.entries.retain(|_, entry| entry.inserted_at > cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_lookups_share_one_compilation() {
        let cache = CompiledCache::new();
        let flags = FlagSet::parse("g").unwrap();
        let a = cache.get_or_compile("\\d+", &flags).unwrap();
        let b = cache.get_or_compile("\\d+", &flags).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn iteration_flags_share_a_slot_but_inline_flags_do_not() {
        let cache = CompiledCache::new();
        let a = cache
            .get_or_compile("x", &FlagSet::parse("g").unwrap())
            .unwrap();
        let b = cache
            .get_or_compile("x", &FlagSet::parse("y").unwrap())
            .unwrap();
        let c = cache
            .get_or_compile("x", &FlagSet::parse("i").unwrap())
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn failed_compiles_are_not_cached() {
        let cache = CompiledCache::new();
        let flags = FlagSet::default();
        assert!(cache.get_or_compile("(", &flags).is_err());
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn cached_extraction_matches_direct_extraction() {
        let cache = CompiledCache::new();
        let flags = FlagSet::parse("g").unwrap();
        let direct = crate::extract::extract("\\w+", &flags, "one two").unwrap();
        let cached = cache.extract("\\w+", &flags, "one two").unwrap();
        assert_eq!(direct, cached);
    }

    #[test]
    fn prune_honors_max_age() {
        let cache = CompiledCache::new();
        let flags = FlagSet::default();
        cache.get_or_compile("a", &flags).unwrap();

        cache.prune(Duration::from_secs(3600));
        assert_eq!(cache.entries.len(), 1);

        cache.prune(Duration::ZERO);
        assert!(cache.entries.is_empty());
    }
}
