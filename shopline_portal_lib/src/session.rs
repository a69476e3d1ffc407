//! In-memory staff sessions backed by `DashMap` for concurrent access.

use dashmap::DashMap;
use rand::Rng;
use std::time::{Duration, Instant};

/// A signed-in staff member and when the session lapses.
struct SessionEntry {
    username: String,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

/// Thread-safe session store with time-to-live expiration.
///
/// Tokens are random 256-bit values rendered as hex. An expired token is
/// evicted when it is looked up, and every new login sweeps out whatever
/// else has expired.
pub struct SessionStore {
    store: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `username` and returns its token.
    pub fn create(&self, username: &str) -> String {
        let now = Instant::now();
        self.purge_expired(now);

        let bytes: [u8; 32] = rand::thread_rng().gen();
        let token = hex::encode(bytes);
        self.store.insert(
            token.clone(),
            SessionEntry {
                username: username.to_string(),
                expires_at: now.checked_add(self.ttl),
            },
        );
        token
    }

    /// Returns the username for `token`, or `None` if unknown or expired.
    pub fn get(&self, token: &str) -> Option<String> {
        let entry = self.store.get(token)?;
        if entry.is_expired(Instant::now()) {
            drop(entry);
            self.store.remove(token);
            return None;
        }
        Some(entry.username.clone())
    }

    pub fn remove(&self, token: &str) {
        self.store.remove(token);
    }

    fn purge_expired(&self, now: Instant) {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.store.len());
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
