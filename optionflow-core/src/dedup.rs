//! Previously alerted record keys, partitioned by feed

use crate::feeds::FeedType;
use parking_lot::RwLock;
use std::collections::{HashSet, VecDeque};

/// Keys for one feed. Insertion order is tracked so a bounded store can
/// evict its oldest key.
#[derive(Debug, Default)]
struct KeySet {
    keys: HashSet<String>,
    order: VecDeque<String>,
}

impl KeySet {
    fn insert(&mut self, key: String, max_entries: Option<usize>) -> bool {
        if self.keys.contains(&key) {
            return false;
        }

        if let Some(max) = max_entries {
            while self.keys.len() >= max {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.keys.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        self.order.push_back(key.clone());
        self.keys.insert(key);
        true
    }
}

/// In-memory record of alerted keys, one partition per feed type.
///
/// Each partition has its own lock; the two are never read together.
#[derive(Debug, Default)]
pub struct DedupStore {
    unusual: RwLock<KeySet>,
    flow: RwLock<KeySet>,
    max_entries: Option<usize>,
}

impl DedupStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps at most `max_entries` keys per feed, evicting the
    /// oldest first. The limit is at least one: the latest alerted key is
    /// always remembered.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::default()
        }
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    fn partition(&self, feed: FeedType) -> &RwLock<KeySet> {
        match feed {
            FeedType::UnusualActivity => &self.unusual,
            FeedType::OptionsFlow => &self.flow,
        }
    }

    pub fn contains(&self, feed: FeedType, key: &str) -> bool {
        self.partition(feed).read().keys.contains(key)
    }

    /// Remember `key`; false if it was already present
    pub fn insert(&self, feed: FeedType, key: impl Into<String>) -> bool {
        self.partition(feed).write().insert(key.into(), self.max_entries)
    }

    pub fn len(&self, feed: FeedType) -> usize {
        self.partition(feed).read().keys.len()
    }

    pub fn is_empty(&self, feed: FeedType) -> bool {
        self.len(feed) == 0
    }

    pub fn clear(&self, feed: FeedType) {
        let mut set = self.partition(feed).write();
        set.keys.clear();
        set.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_then_contains() {
        let store = DedupStore::new();
        assert!(!store.contains(FeedType::UnusualActivity, "AAPL|185|2024-06-21|600000|t1"));

        assert!(store.insert(FeedType::UnusualActivity, "AAPL|185|2024-06-21|600000|t1"));
        assert!(store.contains(FeedType::UnusualActivity, "AAPL|185|2024-06-21|600000|t1"));
        assert!(!store.insert(FeedType::UnusualActivity, "AAPL|185|2024-06-21|600000|t1"));
        assert_eq!(store.len(FeedType::UnusualActivity), 1);
    }

    #[test]
    fn test_feeds_do_not_cross_suppress() {
        let store = DedupStore::new();
        store.insert(FeedType::OptionsFlow, "SPY|500|2024-06-21|75000|t9");

        assert!(store.contains(FeedType::OptionsFlow, "SPY|500|2024-06-21|75000|t9"));
        assert!(!store.contains(FeedType::UnusualActivity, "SPY|500|2024-06-21|75000|t9"));
        assert!(store.is_empty(FeedType::UnusualActivity));
    }

    #[test]
    fn test_bounded_store_evicts_oldest() {
        let store = DedupStore::with_capacity_limit(2);
        store.insert(FeedType::OptionsFlow, "a");
        store.insert(FeedType::OptionsFlow, "b");
        store.insert(FeedType::OptionsFlow, "c");

        assert_eq!(store.len(FeedType::OptionsFlow), 2);
        assert!(!store.contains(FeedType::OptionsFlow, "a"));
        assert!(store.contains(FeedType::OptionsFlow, "b"));
        assert!(store.contains(FeedType::OptionsFlow, "c"));
    }

    #[test]
    fn test_single_slot_store_keeps_latest() {
        let store = DedupStore::with_capacity_limit(1);
        assert!(store.insert(FeedType::UnusualActivity, "a"));
        assert!(!store.insert(FeedType::UnusualActivity, "a"));
        assert!(store.contains(FeedType::UnusualActivity, "a"));

        assert!(store.insert(FeedType::UnusualActivity, "b"));
        assert_eq!(store.len(FeedType::UnusualActivity), 1);
        assert!(!store.contains(FeedType::UnusualActivity, "a"));
        assert!(store.contains(FeedType::UnusualActivity, "b"));

        // the other feed has its own slot
        assert!(store.insert(FeedType::OptionsFlow, "a"));
        assert!(store.contains(FeedType::UnusualActivity, "b"));
    }

    #[test]
    fn test_zero_capacity_still_remembers() {
        let store = DedupStore::with_capacity_limit(0);
        assert_eq!(store.max_entries(), Some(1));

        assert!(store.insert(FeedType::OptionsFlow, "a"));
        assert!(store.contains(FeedType::OptionsFlow, "a"));
        assert!(!store.insert(FeedType::OptionsFlow, "a"));
        assert_eq!(store.len(FeedType::OptionsFlow), 1);
    }

    #[test]
    fn test_clear_one_partition() {
        let store = DedupStore::new();
        store.insert(FeedType::OptionsFlow, "a");
        store.insert(FeedType::UnusualActivity, "a");
        store.clear(FeedType::OptionsFlow);

        assert!(store.is_empty(FeedType::OptionsFlow));
        assert!(store.contains(FeedType::UnusualActivity, "a"));
    }

    #[test]
    fn test_shared_across_threads() {
        let store = Arc::new(DedupStore::new());
        let handles: Vec<_> = [FeedType::UnusualActivity, FeedType::OptionsFlow]
            .into_iter()
            .map(|feed| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.insert(feed, format!("key-{i}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(FeedType::UnusualActivity), 100);
        assert_eq!(store.len(FeedType::OptionsFlow), 100);
    }
}
