//! Per-operator UI state.
//!
//! Reply drafts and the one-shot "open this conversation next" target live
//! here, keyed by a session id the client sends in `x-session-id`.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use aurora_core::platforms::bare_number;

pub const SESSION_HEADER: &str = "x-session-id";

/// Sessions untouched for this long are dropped when a new one opens.
pub const DEFAULT_SESSION_IDLE_HOURS: i64 = 12;

/// Drafts are keyed by the bare number, so `whatsapp:+1555` and `+1555`
/// share one draft.
#[derive(Debug, Clone)]
pub struct OperatorSession {
    drafts: HashMap<String, String>,
    navigate_to: Option<String>,
    last_seen: DateTime<Utc>,
}

impl Default for OperatorSession {
    fn default() -> Self {
        Self::opened_at(Utc::now())
    }
}

impl OperatorSession {
    fn opened_at(now: DateTime<Utc>) -> Self {
        Self {
            drafts: HashMap::new(),
            navigate_to: None,
            last_seen: now,
        }
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn save_draft(&mut self, phone_number: &str, text: &str) {
        let key = bare_number(phone_number);
        if text.trim().is_empty() {
            self.drafts.remove(key);
        } else {
            self.drafts.insert(key.to_string(), text.to_string());
        }
    }

    pub fn draft(&self, phone_number: &str) -> Option<&str> {
        self.drafts.get(bare_number(phone_number)).map(String::as_str)
    }

    pub fn clear_draft(&mut self, phone_number: &str) {
        self.drafts.remove(bare_number(phone_number));
    }

    pub fn set_navigation(&mut self, phone_number: &str) {
        self.navigate_to = Some(bare_number(phone_number).to_string());
    }

    /// Consume the pending navigation target.
    pub fn take_navigation(&mut self) -> Option<String> {
        self.navigate_to.take()
    }
}

pub struct SessionStore {
    sessions: DashMap<Uuid, OperatorSession>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::hours(DEFAULT_SESSION_IDLE_HOURS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl,
        }
    }

    pub fn create(&self) -> Uuid {
        self.create_at(Utc::now())
    }

    /// Open a session, first dropping any idle past the TTL.
    pub fn create_at(&self, now: DateTime<Utc>) -> Uuid {
        let evicted = self.evict_idle(now);
        if evicted > 0 {
            debug!(evicted, "idle operator sessions dropped");
        }
        let id = Uuid::new_v4();
        self.sessions.insert(id, OperatorSession::opened_at(now));
        id
    }

    /// Drop sessions not used since `now - idle_ttl`; returns how many.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_seen > cutoff);
        before.saturating_sub(self.sessions.len())
    }

    /// Run `f` against a session and mark it used; `None` if the id is unknown.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut OperatorSession) -> R) -> Option<R> {
        self.with_at(id, Utc::now(), f)
    }

    pub fn with_at<R>(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut OperatorSession) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(&id).map(|mut s| {
            let session = s.value_mut();
            session.last_seen = now;
            f(session)
        })
    }

    /// Close a session; `false` if it was not open.
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
