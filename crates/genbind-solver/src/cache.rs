//! Memoization of closed implementation lookups.
//!
//! A container resolves the same `(abstraction, implementation)` pair every
//! time a service is requested, and the answer never changes once the
//! definitions involved are complete. [`ClosureCache`] remembers it.
//!
//! Only successful resolutions are cached; a [`ResolveError`] is returned to
//! the caller every time so a store that is still being populated can be
//! retried later.

use crate::builder::GenericTypeBuilder;
use crate::db::TypeDatabase;
use crate::error::ResolveError;
use crate::options::ResolverOptions;
use crate::types::TypeId;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Thread-safe memo of `(abstraction, implementation) -> closed type`.
pub struct ClosureCache {
    options: ResolverOptions,
    entries: DashMap<(TypeId, TypeId), Option<TypeId>, FxBuildHasher>,
    hits: AtomicU64,
}

impl Default for ClosureCache {
    fn default() -> Self {
        Self::new(ResolverOptions::default())
    }
}

impl ClosureCache {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            entries: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Cached equivalent of [`make_closed_implementation`].
    ///
    /// [`make_closed_implementation`]: crate::make_closed_implementation
    pub fn get_or_resolve(
        &self,
        db: &dyn TypeDatabase,
        closed_abstraction: TypeId,
        implementation: TypeId,
    ) -> Result<Option<TypeId>, ResolveError> {
        let key = (closed_abstraction, implementation);
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(
                abstraction = closed_abstraction.0,
                implementation = implementation.0,
                "ClosureCache hit"
            );
            return Ok(*entry);
        }

        // Resolution runs without holding a shard lock; two threads racing on
        // the same key compute the same answer.
        let closed = GenericTypeBuilder::new(db, closed_abstraction, implementation)
            .with_options(self.options.clone())
            .build()?
            .closed_type();
        self.entries.insert(key, closed);
        Ok(closed)
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached answer, e.g. after definitions changed.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
