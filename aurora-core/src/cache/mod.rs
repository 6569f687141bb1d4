// File: src/cache/mod.rs

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;

use aurora_common::models::ConversationSummary;

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct TimedEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

impl<V> TimedEntry<V> {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Keyed memo whose entries expire `ttl` after they were stored.
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, TimedEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Utc::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: DateTime<Utc>) {
        let entry = TimedEntry {
            value,
            expires_at: now + self.ttl,
        };
        self.entries.lock().insert(key, entry);
    }

    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Conversation list keyed by its optional date filter.
pub type RecentChatsCache = TimedCache<Option<NaiveDate>, Vec<ConversationSummary>>;

pub const DEFAULT_RECENT_CHATS_TTL_SECS: i64 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_expires_after_ttl() {
        let cache: TimedCache<&str, u32> = TimedCache::new(Duration::seconds(60));
        let t0 = Utc::now();
        cache.insert_at("k", 7, t0);

        assert_eq!(cache.get_at(&"k", t0 + Duration::seconds(59)), Some(7));
        assert_eq!(cache.get_at(&"k", t0 + Duration::seconds(60)), None);
        // expired entries are dropped on read
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let cache: RecentChatsCache = TimedCache::new(Duration::seconds(60));
        let day = NaiveDate::from_ymd_opt(2024, 1, 2);
        cache.insert(None, vec![]);
        assert!(cache.get(&day).is_none());
        assert_eq!(cache.get(&None), Some(vec![]));

        cache.invalidate_all();
        assert!(cache.get(&None).is_none());
    }
}
