use pyper_core::config::SESSION_MAX_SESSIONS;
use pyper_core::PyperApp;

use crate::session::{SessionRegistry, DEFAULT_MAX_SESSIONS};

/// Router state: the shared app plus every live dashboard session.
#[derive(Clone)]
pub struct PyperAxumState {
    pub app: PyperApp,
    pub sessions: SessionRegistry,
}

impl PyperAxumState {
    /// Sessions are capped by `session.maxSessions`.
    pub fn new(app: PyperApp) -> Self {
        let capacity = app
            .config()
            .get_usize(SESSION_MAX_SESSIONS)
            .unwrap_or(DEFAULT_MAX_SESSIONS);
        Self {
            app,
            sessions: SessionRegistry::with_capacity(capacity),
        }
    }
}
