//! Call logs module.

use serde::Serialize;

use crate::access::AccessContext;
use crate::directory::{call_time, Call, CallOutcome, TenantStore};
use crate::permissions::Permission;

use super::{ModuleView, Placeholders, RenderState};

pub const CALLS_TITLE: &str = "Call Logs";

/// Shown in the notes column when a call has none.
pub const MISSING_NOTES: &str = "-";

pub const CALLS_TEXT: Placeholders = Placeholders {
    denied: "Access Denied: You don't have permission to view call logs.",
    loading: "Loading call logs...",
    empty: "No call logs available.",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsHeader {
    pub title: &'static str,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRow {
    pub id: u64,
    pub lead_id: u64,
    pub lead_name: String,
    pub date_time: String,
    pub duration: String,
    pub outcome: CallOutcome,
    pub outcome_label: &'static str,
    pub notes: String,
}

impl From<&Call> for CallRow {
    fn from(call: &Call) -> Self {
        Self {
            id: call.id,
            lead_id: call.lead_id,
            lead_name: call.lead_name.clone(),
            date_time: call.date_time.format(call_time::FORMAT).to_string(),
            duration: call.duration.to_string(),
            outcome: call.outcome,
            outcome_label: call.outcome.label(),
            notes: call
                .notes
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(MISSING_NOTES)
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallsTable {
    pub rows: Vec<CallRow>,
}

pub type CallLogsView = ModuleView<CallsHeader, CallsTable>;

/// Render the current tenant's call log for `access`.
pub fn render_call_logs(
    access: &AccessContext,
    store: &dyn TenantStore,
    loading: bool,
) -> CallLogsView {
    if !access.has_permission(Permission::ViewCalls) {
        return ModuleView::denied(CALLS_TEXT.denied);
    }

    let calls = store.calls_of(access.current_tenant());
    let header = CallsHeader {
        title: CALLS_TITLE,
        total: calls.len(),
    };
    let state = RenderState::resolve(true, loading, calls.is_empty(), &CALLS_TEXT, || CallsTable {
        rows: calls.iter().map(CallRow::from).collect(),
    });

    ModuleView {
        state,
        header: Some(header),
    }
}
