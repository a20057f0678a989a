//! Derived view logic.
//!
//! Each dashboard module turns the current access context and the tenant's
//! data into a view model. Render states are evaluated in a fixed order on
//! every render: permission first, then the loading flag, then whether
//! anything is left to show.

pub mod calls;
pub mod dashboard;
pub mod leads;
pub mod settings;

use serde::Serialize;

pub use calls::{render_call_logs, CallLogsView, CallRow, CallsHeader, CallsTable};
pub use dashboard::{
    visible_tabs, ActiveModule, Dashboard, DashboardView, HeaderView, RoleOption, SessionView,
    Tab, TabLink,
};
pub use leads::{
    filter_leads, FilterOption, LeadRow, LeadsHeader, LeadsModule, LeadsTable, LeadsView,
    StatusFilter,
};
pub use settings::{render_settings, SettingsPanel, SettingsView, SETTINGS_DENIED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Denied,
    Loading,
    Empty,
    Populated,
}

/// What a module shows in place of, or as, its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RenderState<T> {
    Denied { message: String },
    Loading { message: String },
    Empty { message: String },
    Populated(T),
}

/// Placeholder texts a module shows for its non-populated states.
#[derive(Debug, Clone, Copy)]
pub struct Placeholders {
    pub denied: &'static str,
    pub loading: &'static str,
    pub empty: &'static str,
}

impl<T> RenderState<T> {
    pub fn resolve<F>(
        permitted: bool,
        loading: bool,
        empty: bool,
        text: &Placeholders,
        populate: F,
    ) -> Self
    where
        F: FnOnce() -> T,
    {
        if !permitted {
            RenderState::Denied {
                message: text.denied.to_string(),
            }
        } else if loading {
            RenderState::Loading {
                message: text.loading.to_string(),
            }
        } else if empty {
            RenderState::Empty {
                message: text.empty.to_string(),
            }
        } else {
            RenderState::Populated(populate())
        }
    }

    pub fn kind(&self) -> RenderKind {
        match self {
            RenderState::Denied { .. } => RenderKind::Denied,
            RenderState::Loading { .. } => RenderKind::Loading,
            RenderState::Empty { .. } => RenderKind::Empty,
            RenderState::Populated(_) => RenderKind::Populated,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RenderState::Denied { message }
            | RenderState::Loading { message }
            | RenderState::Empty { message } => Some(message),
            RenderState::Populated(_) => None,
        }
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            RenderState::Populated(content) => Some(content),
            _ => None,
        }
    }
}

/// A list module: its render state plus the header shown above it.
///
/// The header (title, counts, affordances) is absent when access is denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleView<H, T> {
    #[serde(flatten)]
    pub state: RenderState<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<H>,
}

impl<H, T> ModuleView<H, T> {
    pub fn denied(message: &str) -> Self {
        Self {
            state: RenderState::Denied {
                message: message.to_string(),
            },
            header: None,
        }
    }

    pub fn kind(&self) -> RenderKind {
        self.state.kind()
    }
}
