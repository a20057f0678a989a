//! Tenant directory: each organization's isolated leads and calls.
//!
//! The directory is a fixture, not a data engine. [`TenantStore`] is the
//! seam a real storage collaborator would sit behind; the in-memory
//! [`TenantDirectory`] is the only implementation here.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::errors::ParseError;
use crate::tenant::{TenantId, TenantInfo};

const BUILTIN_FIXTURE: &str = include_str!("../fixtures/tenants.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::LeadStatus(s.to_string()))
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallOutcome {
    Interested,
    NotInterested,
    Callback,
    NoAnswer,
}

impl CallOutcome {
    pub const ALL: [CallOutcome; 4] = [
        CallOutcome::Interested,
        CallOutcome::NotInterested,
        CallOutcome::Callback,
        CallOutcome::NoAnswer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Interested => "interested",
            CallOutcome::NotInterested => "not-interested",
            CallOutcome::Callback => "callback",
            CallOutcome::NoAnswer => "no-answer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Interested => "Interested",
            CallOutcome::NotInterested => "Not Interested",
            CallOutcome::Callback => "Callback",
            CallOutcome::NoAnswer => "No Answer",
        }
    }
}

impl FromStr for CallOutcome {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CallOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| ParseError::CallOutcome(s.to_string()))
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call length as it was logged, e.g. `"15 mins"`.
///
/// The text is kept verbatim and rendered as-is. [`minutes`](Self::minutes)
/// reads it as a number of minutes when it has the `<n> min(s)` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallDuration(String);

impl CallDuration {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `"<n> mins"`.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(format!("{minutes} mins"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn minutes(&self) -> Option<u32> {
        let trimmed = self.0.trim();
        trimmed
            .strip_suffix("mins")
            .or_else(|| trimmed.strip_suffix("min"))
            .unwrap_or(trimmed)
            .trim()
            .parse()
            .ok()
    }
}

impl fmt::Display for CallDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: LeadStatus,
    pub created: NaiveDate,
}

/// A logged call. `lead_name` is a display copy taken when the call was
/// logged and is never reconciled with the lead it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: u64,
    pub lead_id: u64,
    pub lead_name: String,
    #[serde(with = "call_time")]
    pub date_time: NaiveDateTime,
    pub duration: CallDuration,
    pub outcome: CallOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub(crate) mod call_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One organization and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl Tenant {
    pub fn info(&self) -> TenantInfo {
        TenantInfo {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate tenant id '{0}'")]
    DuplicateTenant(TenantId),
}

/// Tenant-scoped read access to leads and calls.
///
/// Every method is total. Unknown tenant ids resolve to empty lists and
/// an absent [`TenantInfo`], never to an error.
pub trait TenantStore: Send + Sync {
    /// All tenants, in directory order.
    fn tenants(&self) -> Vec<TenantInfo>;

    fn tenant_info(&self, tenant: &TenantId) -> Option<TenantInfo>;

    /// The tenant's leads in fixture order.
    fn leads_of(&self, tenant: &TenantId) -> Vec<Lead>;

    /// The tenant's calls in fixture order.
    fn calls_of(&self, tenant: &TenantId) -> Vec<Call>;
}

/// In-memory tenant directory.
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    tenants: Vec<Tenant>,
    index: HashMap<TenantId, usize>,
}

impl TenantDirectory {
    pub fn new(tenants: Vec<Tenant>) -> Result<Self, DirectoryError> {
        let mut index = HashMap::with_capacity(tenants.len());
        for (pos, tenant) in tenants.iter().enumerate() {
            if index.insert(tenant.id.clone(), pos).is_some() {
                return Err(DirectoryError::DuplicateTenant(tenant.id.clone()));
            }
        }
        Ok(Self { tenants, index })
    }

    /// The built-in two-organization fixture.
    pub fn fixture() -> Result<Self, DirectoryError> {
        Self::from_json_str(BUILTIN_FIXTURE)
    }

    /// Parse a JSON array of tenants, each with its `leads` and `calls`.
    pub fn from_json_str(raw: &str) -> Result<Self, DirectoryError> {
        let tenants: Vec<Tenant> = serde_json::from_str(raw)?;
        Self::new(tenants)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json_str(&raw)?;
        debug!(
            path = %path.display(),
            tenants = directory.tenants.len(),
            "loaded tenant fixture"
        );
        Ok(directory)
    }

    pub fn get(&self, tenant: &TenantId) -> Option<&Tenant> {
        self.index.get(tenant).map(|&pos| &self.tenants[pos])
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

impl TenantStore for TenantDirectory {
    fn tenants(&self) -> Vec<TenantInfo> {
        self.tenants.iter().map(Tenant::info).collect()
    }

    fn tenant_info(&self, tenant: &TenantId) -> Option<TenantInfo> {
        self.get(tenant).map(Tenant::info)
    }

    fn leads_of(&self, tenant: &TenantId) -> Vec<Lead> {
        self.get(tenant)
            .map(|t| t.leads.clone())
            .unwrap_or_default()
    }

    fn calls_of(&self, tenant: &TenantId) -> Vec<Call> {
        self.get(tenant)
            .map(|t| t.calls.clone())
            .unwrap_or_default()
    }
}
