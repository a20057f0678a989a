//! Application container: configuration, tenant store, permission table.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::access::{AccessContext, DEFAULT_ROLE, DEFAULT_TENANT, DEFAULT_USER};
use crate::config::{self, PyperConfig, PyperConfigSnapshot};
use crate::directory::{TenantDirectory, TenantStore};
use crate::permissions::PermissionTable;

/// Name, version and tagline shown in the header and the settings panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "SalesPyper".to_string(),
            version: "1.0.0".to_string(),
            description: "Multi-Tenant Sales Dashboard".to_string(),
        }
    }
}

impl AppInfo {
    pub fn from_config(config: &PyperConfigSnapshot) -> Self {
        let stock = Self::default();
        Self {
            name: config.get_string(config::APP_NAME).unwrap_or(stock.name),
            version: config.get_string(config::APP_VERSION).unwrap_or(stock.version),
            description: config
                .get_string(config::APP_DESCRIPTION)
                .unwrap_or(stock.description),
        }
    }
}

struct PyperAppInner {
    config: PyperConfigSnapshot,
    info: AppInfo,
    store: Arc<dyn TenantStore>,
    permissions: Arc<PermissionTable>,
}

/// Shared, cheaply cloneable handle to everything sessions read from.
///
/// Sessions own their [`AccessContext`]; the app only owns what every
/// session shares.
#[derive(Clone)]
pub struct PyperApp {
    inner: Arc<PyperAppInner>,
}

impl PyperApp {
    /// Build from configuration. Tenants come from the JSON file at
    /// `fixtures.path` when set, else from the built-in fixture.
    pub fn new(config: &PyperConfig) -> anyhow::Result<Self> {
        let directory = match config.get(config::FIXTURES_PATH) {
            Some(path) => TenantDirectory::from_json_file(path)
                .with_context(|| format!("loading tenants from {path}"))?,
            None => TenantDirectory::fixture().context("loading built-in tenant fixture")?,
        };

        info!(tenants = directory.len(), "tenant directory loaded");
        Ok(Self::with_store(
            config,
            Arc::new(directory),
            PermissionTable::standard(),
        ))
    }

    pub fn with_store(
        config: &PyperConfig,
        store: Arc<dyn TenantStore>,
        permissions: PermissionTable,
    ) -> Self {
        let snapshot = config.snapshot();
        let info = AppInfo::from_config(&snapshot);
        Self {
            inner: Arc::new(PyperAppInner {
                config: snapshot,
                info,
                store,
                permissions: Arc::new(permissions),
            }),
        }
    }

    pub fn config(&self) -> &PyperConfigSnapshot {
        &self.inner.config
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.config.get(key)
    }

    pub fn info(&self) -> &AppInfo {
        &self.inner.info
    }

    pub fn store(&self) -> &dyn TenantStore {
        self.inner.store.as_ref()
    }

    pub fn permissions(&self) -> &Arc<PermissionTable> {
        &self.inner.permissions
    }

    /// A fresh access context on the configured session defaults.
    pub fn session(&self) -> AccessContext {
        let config = &self.inner.config;
        AccessContext::new(
            config
                .get(config::SESSION_DEFAULT_TENANT)
                .unwrap_or(DEFAULT_TENANT),
            config
                .get(config::SESSION_DEFAULT_ROLE)
                .unwrap_or(DEFAULT_ROLE.as_str()),
            config.get(config::SESSION_USER).unwrap_or(DEFAULT_USER),
            Arc::clone(&self.inner.permissions),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Permission, Role};
    use crate::tenant::TenantId;
    use std::io::Write;

    #[test]
    fn defaults_build_from_builtin_fixture() {
        let app = PyperApp::new(&PyperConfig::with_defaults()).unwrap();
        assert_eq!(app.store().tenants().len(), 2);
        assert_eq!(app.info(), &AppInfo::default());

        let session = app.session();
        assert_eq!(session.current_tenant().as_str(), "org-a");
        assert!(session.has_permission(Permission::AccessAllFeatures));
        assert_eq!(session.current_user(), "John Doe");
    }

    #[test]
    fn session_defaults_follow_config() {
        let mut config = PyperConfig::with_defaults();
        config.set(config::SESSION_DEFAULT_ROLE, "agent");
        config.set(config::SESSION_DEFAULT_TENANT, "org-b");
        config.set(config::APP_NAME, "Pyper Staging");

        let app = PyperApp::new(&config).unwrap();
        let session = app.session();
        assert_eq!(session.current_role().role(), Some(Role::Agent));
        assert_eq!(session.current_tenant().as_str(), "org-b");
        assert_eq!(app.info().name, "Pyper Staging");
    }

    #[test]
    fn loads_tenants_from_configured_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "org-x", "name": "Organization X", "leads": [], "calls": []}}]"#
        )
        .unwrap();

        let mut config = PyperConfig::with_defaults();
        config.set(config::FIXTURES_PATH, file.path().to_string_lossy());
        let app = PyperApp::new(&config).unwrap();

        let tenants = app.store().tenants();
        assert_eq!(tenants.len(), 1);
        assert_eq!(tenants[0].id, TenantId::new("org-x"));
    }

    #[test]
    fn missing_fixture_file_is_an_error() {
        let mut config = PyperConfig::with_defaults();
        config.set(config::FIXTURES_PATH, "/definitely/not/here.json");
        let err = PyperApp::new(&config).err().unwrap();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn sessions_share_the_table_not_the_state() {
        let app = PyperApp::new(&PyperConfig::with_defaults()).unwrap();
        let mut a = app.session();
        let b = app.session();
        a.set_current_role(Role::Agent);
        assert!(b.has_permission(Permission::EditLeads));
        assert_eq!(Arc::strong_count(app.permissions()), 3);
    }
}
