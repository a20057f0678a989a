//! Per-caller dashboard sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::HeaderMap;
use pyper_core::errors::PyperError;
use pyper_core::view::Dashboard;
use pyper_core::{listener, AccessContext, PyperApp};
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

pub const SESSION_HEADER: &str = "x-session-id";
pub const DEFAULT_SESSION: &str = "default";
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Session id from the `x-session-id` header, `default` when absent or blank.
///
/// A header that is not visible ASCII is refused rather than mapped onto
/// the shared default session.
pub fn session_from_headers(headers: &HeaderMap) -> Result<String, PyperError> {
    let Some(raw) = headers.get(SESSION_HEADER) else {
        return Ok(DEFAULT_SESSION.to_string());
    };

    let id = raw.to_str().map_err(|_| {
        warn!("rejecting unreadable x-session-id header");
        PyperError::bad_request("Invalid x-session-id header")
            .with_errors(json!({"x-session-id": ["must be visible ASCII text"]}))
    })?;

    let id = id.trim();
    Ok(if id.is_empty() { DEFAULT_SESSION } else { id }.to_string())
}

/// One caller's access context together with their dashboard UI state.
#[derive(Debug)]
pub struct DashboardSession {
    pub access: AccessContext,
    pub dashboard: Dashboard,
}

impl DashboardSession {
    pub fn new(id: &str, app: &PyperApp) -> Self {
        let mut access = app.session();

        let sid = id.to_string();
        access.subscribe_all(listener(move |change, snapshot| {
            debug!(
                session = %sid,
                kind = ?change.kind(),
                tenant = %snapshot.tenant,
                role = %snapshot.role,
                "access changed"
            );
        }));

        Self {
            access,
            dashboard: Dashboard::new(),
        }
    }

    /// Switch tenant, warning when the directory has never heard of it.
    pub fn switch_tenant(&mut self, app: &PyperApp, tenant: &str) {
        if app.store().tenant_info(&tenant.into()).is_none() {
            warn!(tenant, "switching to a tenant with no directory entry");
        }
        self.access.set_current_tenant(tenant);
    }

    pub fn switch_role(&mut self, role: &str) {
        self.access.set_current_role(role);
    }
}

type SharedSession = Arc<Mutex<DashboardSession>>;

struct Entry {
    session: SharedSession,
    last_used: AtomicU64,
}

/// Live sessions by id, bounded by `capacity`.
///
/// Creating a session on a full registry evicts the least recently used one.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<AtomicU64>,
    capacity: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// The session for `id`, created from `app`'s defaults on first use.
    pub async fn get_or_create(&self, id: &str, app: &PyperApp) -> SharedSession {
        if let Some(entry) = self.sessions.read().await.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return Arc::clone(&entry.session);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return Arc::clone(&entry.session);
        }

        if sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                debug!(session = %oldest, capacity = self.capacity, "session evicted");
            }
        }

        debug!(session = id, live = sessions.len() + 1, "session created");
        let session = Arc::new(Mutex::new(DashboardSession::new(id, app)));
        sessions.insert(
            id.to_string(),
            Entry {
                session: Arc::clone(&session),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        session
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!(session = id, "session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
