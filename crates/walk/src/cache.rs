//! Single-flight directory cache.
//!
//! Each key maps to a slot that is filled exactly once. The first caller for
//! a key runs the loader; concurrent callers for the same key block on the
//! slot until it is filled and then share the result. Slots are never
//! invalidated within a walk.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use logging::trace_cache;

/// Concurrent memoizing map from repo-relative path to a load result.
#[derive(Debug)]
pub struct DirCache<T> {
    slots: DashMap<String, Arc<OnceLock<T>>>,
}

impl<T: Clone> DirCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Returns the result for `key`, running `load` if no caller has yet.
    ///
    /// `load` runs at most once per key across all threads. It runs without
    /// any map lock held, so it may read other, already filled slots.
    pub fn get<F>(&self, key: &str, load: F) -> T
    where
        F: FnOnce(&str) -> T,
    {
        let existing = self.slots.get(key).map(|slot| Arc::clone(slot.value()));
        // The entry guard is released before loading; losers of the insert
        // race receive the winner's slot.
        let slot = existing.unwrap_or_else(|| {
            Arc::clone(self.slots.entry(key.to_owned()).or_default().value())
        });
        slot.get_or_init(|| {
            trace_cache!("loading {key:?}");
            load(key)
        })
        .clone()
    }

    /// Returns the result of an earlier, completed [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if `key` was never requested or is still loading. Callers only
    /// use this for keys they have already established are resolved, such as
    /// the parent of the directory being loaded.
    pub fn get_loaded(&self, key: &str) -> T {
        let resolved = self
            .slots
            .get(key)
            .and_then(|slot| slot.value().get().cloned());
        match resolved {
            Some(value) => value,
            None => panic!("get_loaded called for {key:?} before it was loaded"),
        }
    }

    /// Returns the result for `key` if it has been filled.
    pub fn peek(&self, key: &str) -> Option<T> {
        self.slots
            .get(key)
            .and_then(|slot| slot.value().get().cloned())
    }

    /// Number of keys requested so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been requested.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T: Clone> Default for DirCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn second_get_reuses_result() {
        let cache = DirCache::new();
        let calls = AtomicUsize::new(0);
        let load = |key: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            format!("loaded {key}")
        };

        assert_eq!(cache.get("a", load), "loaded a");
        assert_eq!(cache.get("a", load), "loaded a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_gets_share_one_load() {
        let cache = DirCache::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let results: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get("shared", |_| {
                            thread::sleep(Duration::from_millis(20));
                            calls.fetch_add(1, Ordering::SeqCst)
                        })
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread"))
                .collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|&value| value == 0));
    }

    #[test]
    fn loader_may_read_resolved_parent() {
        let cache: DirCache<String> = DirCache::new();
        cache.get("", |_| "root".to_owned());
        let child = cache.get("a", |_| format!("{}/a", cache.get_loaded("")));
        assert_eq!(child, "root/a");
    }

    #[test]
    #[should_panic(expected = "get_loaded called for \"missing\" before it was loaded")]
    fn get_loaded_panics_for_unknown_key() {
        let cache: DirCache<u8> = DirCache::new();
        cache.get_loaded("missing");
    }

    #[test]
    fn peek_sees_only_filled_slots() {
        let cache: DirCache<u8> = DirCache::new();
        assert_eq!(cache.peek("a"), None);
        cache.get("a", |_| 7);
        assert_eq!(cache.peek("a"), Some(7));
    }
}
