//! Leads module: status filter, edit affordance, memoized filtering.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::access::AccessContext;
use crate::directory::{Lead, LeadStatus, TenantStore};
use crate::errors::ParseError;
use crate::permissions::Permission;
use crate::tenant::TenantId;

use super::{ModuleView, Placeholders, RenderState};

pub const LEADS_TITLE: &str = "Leads";

pub const LEADS_TEXT: Placeholders = Placeholders {
    denied: "Access Denied: You don't have permission to view leads.",
    loading: "Loading leads...",
    empty: "No leads found for the selected filter.",
};

/// Which leads to show: all of them, or only one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn matches(&self, status: LeadStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// The choices the filter dropdown offers.
    pub fn options() -> Vec<FilterOption> {
        [
            StatusFilter::All,
            StatusFilter::Only(LeadStatus::New),
            StatusFilter::Only(LeadStatus::Contacted),
            StatusFilter::Only(LeadStatus::Qualified),
        ]
        .into_iter()
        .map(|value| FilterOption {
            value,
            label: value.label(),
        })
        .collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse::<LeadStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| ParseError::StatusFilter(s.to_string()))
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: StatusFilter,
    pub label: &'static str,
}

/// Keep the leads whose status passes `filter`, in their original order.
pub fn filter_leads(leads: &[Lead], filter: StatusFilter) -> Vec<Lead> {
    leads
        .iter()
        .filter(|lead| filter.matches(lead.status))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsHeader {
    pub title: &'static str,
    /// "Add Lead" is offered only to roles that may edit leads.
    pub can_add: bool,
    pub filter: StatusFilter,
    pub filter_options: Vec<FilterOption>,
    pub showing: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub status_label: &'static str,
    pub created: NaiveDate,
}

impl From<&Lead> for LeadRow {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            status: lead.status,
            status_label: lead.status.label(),
            created: lead.created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsTable {
    /// Per-row "Edit" actions.
    pub can_edit: bool,
    pub rows: Vec<LeadRow>,
}

pub type LeadsView = ModuleView<LeadsHeader, LeadsTable>;

#[derive(Debug)]
struct LeadsMemo {
    tenant: TenantId,
    leads: Vec<Lead>,
    filter: StatusFilter,
    filtered: Vec<Lead>,
}

/// Leads module state for one session: the chosen filter and the last
/// filtered list.
///
/// The source list is reloaded only when the tenant changes and the filter
/// pass reruns only when the list or the filter changes.
#[derive(Debug, Default)]
pub struct LeadsModule {
    filter: StatusFilter,
    memo: Option<LeadsMemo>,
}

impl LeadsModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    fn refresh(&mut self, store: &dyn TenantStore, tenant: &TenantId) -> &LeadsMemo {
        let filter = self.filter;
        let memo = match self.memo.take() {
            Some(mut memo) if memo.tenant == *tenant => {
                if memo.filter != filter {
                    memo.filtered = filter_leads(&memo.leads, filter);
                    memo.filter = filter;
                }
                memo
            }
            _ => {
                let leads = store.leads_of(tenant);
                LeadsMemo {
                    tenant: tenant.clone(),
                    filtered: filter_leads(&leads, filter),
                    leads,
                    filter,
                }
            }
        };
        self.memo.insert(memo)
    }

    pub fn render(
        &mut self,
        access: &AccessContext,
        store: &dyn TenantStore,
        loading: bool,
    ) -> LeadsView {
        if !access.has_permission(Permission::ViewLeads) {
            return ModuleView::denied(LEADS_TEXT.denied);
        }

        let can_edit = access.has_permission(Permission::EditLeads);
        let filter = self.filter;
        let memo = self.refresh(store, access.current_tenant());

        let header = LeadsHeader {
            title: LEADS_TITLE,
            can_add: can_edit,
            filter,
            filter_options: StatusFilter::options(),
            showing: memo.filtered.len(),
            total: memo.leads.len(),
        };

        let state = RenderState::resolve(true, loading, memo.filtered.is_empty(), &LEADS_TEXT, || {
            LeadsTable {
                can_edit,
                rows: memo.filtered.iter().map(LeadRow::from).collect(),
            }
        });

        ModuleView {
            state,
            header: Some(header),
        }
    }
}
