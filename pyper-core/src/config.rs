//! # Configuration
//!
//! SalesPyper keeps configuration in a flat string key/value store with
//! dotted keys (`http.port`, `session.defaultRole`). Defaults are seeded by
//! [`PyperConfig::with_defaults`], and environment variables can be laid
//! over them:
//!
//! ```rust
//! use pyper_core::PyperConfig;
//!
//! let mut config = PyperConfig::with_defaults();
//! config.apply_env_vars(
//!     "SALESPYPER__",
//!     [("SALESPYPER__HTTP__PORT".to_string(), "8080".to_string())],
//! );
//!
//! assert_eq!(config.get("http.port"), Some("8080"));
//! ```
//!
//! A variable `SALESPYPER__SESSION__DEFAULTROLE` lands on
//! `session.defaultrole`; lookups are case-insensitive, so it overrides
//! `session.defaultRole`.

use std::collections::HashMap;

pub const ENV_PREFIX: &str = "SALESPYPER__";

pub const APP_NAME: &str = "app.name";
pub const APP_VERSION: &str = "app.version";
pub const APP_DESCRIPTION: &str = "app.description";
pub const HTTP_HOST: &str = "http.host";
pub const HTTP_PORT: &str = "http.port";
pub const SESSION_DEFAULT_TENANT: &str = "session.defaultTenant";
pub const SESSION_DEFAULT_ROLE: &str = "session.defaultRole";
pub const SESSION_USER: &str = "session.user";
pub const SESSION_MAX_SESSIONS: &str = "session.maxSessions";
pub const FIXTURES_PATH: &str = "fixtures.path";

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct PyperConfig {
    values: HashMap<String, String>,
}

impl PyperConfig {
    /// An empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// The stock dashboard settings.
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.set(APP_NAME, "SalesPyper");
        config.set(APP_VERSION, "1.0.0");
        config.set(APP_DESCRIPTION, "Multi-Tenant Sales Dashboard");
        config.set(HTTP_HOST, "127.0.0.1");
        config.set(HTTP_PORT, "3030");
        config.set(SESSION_DEFAULT_TENANT, crate::access::DEFAULT_TENANT);
        config.set(SESSION_DEFAULT_ROLE, crate::access::DEFAULT_ROLE.as_str());
        config.set(SESSION_USER, crate::access::DEFAULT_USER);
        config.set(SESSION_MAX_SESSIONS, "1024");
        config
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.values.insert(normalize_key(key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(|s| s.as_str())
    }

    /// Overlay `PREFIX`-ed variables: `PREFIX_A__B` → `a.b`.
    pub fn apply_env_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let key = stripped.to_lowercase().replace("__", ".");
                self.set(key, value);
                applied += 1;
            }
        }
        applied
    }

    /// Overlay the process environment under [`ENV_PREFIX`].
    pub fn load_env(&mut self) -> usize {
        self.apply_env_vars(ENV_PREFIX, std::env::vars())
    }

    pub fn snapshot(&self) -> PyperConfigSnapshot {
        PyperConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only copy of the configuration handed to the running app.
#[derive(Debug, Clone, Default)]
pub struct PyperConfigSnapshot {
    map: HashMap<String, String>,
}

impl PyperConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(&normalize_key(key)).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_session_and_http() {
        let snap = PyperConfig::with_defaults().snapshot();
        assert_eq!(snap.get(SESSION_DEFAULT_TENANT), Some("org-a"));
        assert_eq!(snap.get(SESSION_DEFAULT_ROLE), Some("admin"));
        assert_eq!(snap.get(SESSION_USER), Some("John Doe"));
        assert_eq!(snap.get_usize(HTTP_PORT), Some(3030));
        assert_eq!(snap.get_usize(SESSION_MAX_SESSIONS), Some(1024));
        assert!(snap.get(FIXTURES_PATH).is_none());
    }

    #[test]
    fn env_overlay_maps_double_underscores_to_dots() {
        let mut config = PyperConfig::with_defaults();
        let applied = config.apply_env_vars(
            ENV_PREFIX,
            vec![
                ("SALESPYPER__SESSION__DEFAULTROLE".to_string(), "agent".to_string()),
                ("SALESPYPER__FIXTURES__PATH".to_string(), "/tmp/t.json".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ],
        );

        assert_eq!(applied, 2);
        assert_eq!(config.get(SESSION_DEFAULT_ROLE), Some("agent"));
        assert_eq!(config.get(FIXTURES_PATH), Some("/tmp/t.json"));
        assert!(config.get("home").is_none());
    }

    #[test]
    fn snapshot_getters_parse_values() {
        let mut config = PyperConfig::new();
        config.set("feature.limit", "x");
        config.set("feature.size", "12");
        let snap = config.snapshot();
        assert_eq!(snap.get_usize("feature.size"), Some(12));
        assert_eq!(snap.get_usize("feature.limit"), None);
        assert_eq!(snap.get_string("feature.limit").as_deref(), Some("x"));
    }
}
