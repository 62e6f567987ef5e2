//! In-memory cache of map selections.
//!
//! A client posts its filters once and then requests figures for the cached
//! rows by id. Entries expire after a fixed lifetime and the cache holds at
//! most a fixed number of them; the oldest entry is dropped to make room.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default session lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Default maximum number of cached sessions.
pub const DEFAULT_CAPACITY: usize = 1_000;

/// A cached selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Row indices into the accident table.
    pub rows: Vec<usize>,
    /// When the selection was cached.
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.created_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

/// Thread-safe session store keyed by UUID v4.
#[derive(Debug)]
pub struct SessionCache {
    entries: Mutex<HashMap<Uuid, Session>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl SessionCache {
    /// Cache whose entries live for `ttl` and which holds at most
    /// `capacity` entries (at least one).
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(&self, entries: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) -> usize {
        let before = entries.len();
        entries.retain(|_, session| !session.expired(now, self.ttl));
        before - entries.len()
    }

    /// Stores `rows` under a fresh id. Expired entries are swept first;
    /// a full cache drops its oldest entry.
    pub fn insert(&self, rows: Vec<usize>) -> (Uuid, Session) {
        self.insert_at(rows, Utc::now())
    }

    fn insert_at(&self, rows: Vec<usize>, now: DateTime<Utc>) -> (Uuid, Session) {
        let id = Uuid::new_v4();
        let session = Session {
            rows,
            created_at: now,
        };

        let mut entries = self.lock();
        let expired = self.sweep(&mut entries, now);
        if expired > 0 {
            log::debug!("Expired {expired} map sessions");
        }
        while entries.len() >= self.capacity {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, session)| session.created_at)
                .map(|(id, _)| *id)
            else {
                break;
            };
            log::debug!("Session cache full, dropping {oldest}");
            entries.remove(&oldest);
        }
        entries.insert(id, session.clone());

        (id, session)
    }

    /// A copy of the session stored under `id`, unless it has expired.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<Session> {
        self.get_at(id, Utc::now())
    }

    fn get_at(&self, id: &Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut entries = self.lock();
        if entries.get(id)?.expired(now, self.ttl) {
            entries.remove(id);
            return None;
        }
        entries.get(id).cloned()
    }

    /// Drops the session. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Drops every session expired at `now`. Returns how many were dropped.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        self.sweep(&mut entries, now)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn stored_rows_are_returned_by_id() {
        let cache = SessionCache::default();
        let (id, session) = cache.insert(vec![3, 1, 4]);

        assert_eq!(cache.get(&id), Some(session));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn ids_are_distinct() {
        let cache = SessionCache::default();
        let (a, _) = cache.insert(Vec::new());
        let (b, _) = cache.insert(Vec::new());

        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn removed_sessions_are_gone() {
        let cache = SessionCache::default();
        let (id, _) = cache.insert(vec![0]);

        assert!(cache.remove(&id));
        assert!(!cache.remove(&id));
        assert!(cache.get(&id).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn sessions_expire_after_ttl() {
        let cache = SessionCache::new(Duration::from_secs(60), 100);
        let start = Utc::now();
        let (id, _) = cache.insert_at(vec![1, 2], start);

        assert!(cache.get_at(&id, start + TimeDelta::seconds(59)).is_some());
        assert!(cache.get_at(&id, start + TimeDelta::seconds(60)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn inserts_sweep_expired_sessions() {
        let cache = SessionCache::new(Duration::from_secs(60), 100);
        let start = Utc::now();
        for _ in 0..50 {
            cache.insert_at(vec![0; 100], start);
        }
        assert_eq!(cache.len(), 50);

        cache.insert_at(Vec::new(), start + TimeDelta::minutes(5));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.evict_expired(start + TimeDelta::minutes(10)), 1);
    }

    #[test]
    fn full_cache_drops_oldest_session() {
        let cache = SessionCache::new(Duration::from_secs(3600), 3);
        let start = Utc::now();
        let (oldest, _) = cache.insert_at(vec![0], start);
        for offset in 1..=10 {
            cache.insert_at(vec![offset], start + TimeDelta::seconds(offset.try_into().unwrap()));
        }

        assert_eq!(cache.len(), 3);
        assert!(cache.get_at(&oldest, start).is_none());
    }
}
