use std::collections::HashMap;

use pyper_core::errors::PyperError;
use pyper_core::view::{StatusFilter, Tab};
use serde::Deserialize;
use serde_json::json;

/// View options read from the query string.
///
/// `status` and `tab` are sticky: they update the session's dashboard
/// state. `loading` only affects the response it arrives with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub status: Option<StatusFilter>,
    pub tab: Option<Tab>,
    pub loading: bool,
}

impl ViewParams {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, PyperError> {
        let mut errors = serde_json::Map::new();
        let mut out = Self::default();

        if let Some(raw) = query.get("status") {
            match raw.parse::<StatusFilter>() {
                Ok(filter) => out.status = Some(filter),
                Err(e) => {
                    errors.insert("status".into(), json!([e.to_string()]));
                }
            }
        }
        if let Some(raw) = query.get("tab") {
            match raw.parse::<Tab>() {
                Ok(tab) => out.tab = Some(tab),
                Err(e) => {
                    errors.insert("tab".into(), json!([e.to_string()]));
                }
            }
        }
        if let Some(raw) = query.get("loading") {
            match raw.parse::<bool>() {
                Ok(loading) => out.loading = loading,
                Err(_) => {
                    let message = format!("expected true or false, got '{raw}'");
                    errors.insert("loading".into(), json!([message]));
                }
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(PyperError::bad_request("Invalid query parameters")
                .with_errors(serde_json::Value::Object(errors)))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenantSwitch {
    pub tenant: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleSwitch {
    pub role: String,
}
