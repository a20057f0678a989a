//! Dashboard shell: header, tab navigation and the active module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::AccessContext;
use crate::app::AppInfo;
use crate::directory::TenantStore;
use crate::errors::ParseError;
use crate::permissions::{Permission, Role, RoleName};
use crate::tenant::{TenantId, TenantInfo};

use super::calls::{render_call_logs, CallLogsView};
use super::leads::{LeadsModule, LeadsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Leads,
    Calls,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Leads, Tab::Calls];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Leads => "leads",
            Tab::Calls => "calls",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Leads => "Leads",
            Tab::Calls => "Call Logs",
        }
    }

    /// The permission a role needs for this tab to be offered.
    pub fn permission(&self) -> Permission {
        match self {
            Tab::Leads => Permission::ViewLeads,
            Tab::Calls => Permission::ViewCalls,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| ParseError::Tab(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLink {
    pub id: Tab,
    pub label: &'static str,
    pub active: bool,
}

/// Tabs the current role may open, in navigation order.
pub fn visible_tabs(access: &AccessContext, active: Tab) -> Vec<TabLink> {
    Tab::ALL
        .into_iter()
        .filter(|tab| access.has_permission(tab.permission()))
        .map(|tab| TabLink {
            id: tab,
            label: tab.label(),
            active: tab == active,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOption {
    pub id: Role,
    pub label: &'static str,
    pub active: bool,
}

/// Session summary: who, as what, on which tenant, allowed to do what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub tenant: TenantId,
    pub tenant_name: Option<String>,
    pub role: RoleName,
    pub role_label: &'static str,
    pub user: String,
    pub permissions: Vec<Permission>,
    pub tabs: Vec<TabLink>,
}

impl SessionView {
    pub fn build(access: &AccessContext, store: &dyn TenantStore, active: Tab) -> Self {
        Self {
            tenant: access.current_tenant().clone(),
            tenant_name: store
                .tenant_info(access.current_tenant())
                .map(|info| info.name),
            role: access.current_role().clone(),
            role_label: access.current_role().label(),
            user: access.current_user().to_string(),
            permissions: access.permissions().iter().copied().collect(),
            tabs: visible_tabs(access, active),
        }
    }
}

/// Top bar: app identity plus the tenant and role switchers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub app: AppInfo,
    pub user: String,
    pub tenant: TenantId,
    pub tenant_name: Option<String>,
    pub tenants: Vec<TenantInfo>,
    pub role: RoleName,
    pub role_label: &'static str,
    pub roles: Vec<RoleOption>,
}

impl HeaderView {
    pub fn build(access: &AccessContext, store: &dyn TenantStore, app: &AppInfo) -> Self {
        let current = access.current_role().role();
        Self {
            app: app.clone(),
            user: access.current_user().to_string(),
            tenant: access.current_tenant().clone(),
            tenant_name: store
                .tenant_info(access.current_tenant())
                .map(|info| info.name),
            tenants: store.tenants(),
            role: access.current_role().clone(),
            role_label: access.current_role().label(),
            roles: Role::ALL
                .into_iter()
                .map(|role| RoleOption {
                    id: role,
                    label: role.label(),
                    active: current == Some(role),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tab", content = "view", rename_all = "lowercase")]
pub enum ActiveModule {
    Leads(LeadsView),
    Calls(CallLogsView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub header: HeaderView,
    pub tabs: Vec<TabLink>,
    pub module: ActiveModule,
}

/// Per-session dashboard state: which tab is open and the leads module's
/// filter and memo.
#[derive(Debug, Default)]
pub struct Dashboard {
    active_tab: Tab,
    leads: LeadsModule,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn leads(&self) -> &LeadsModule {
        &self.leads
    }

    pub fn leads_mut(&mut self) -> &mut LeadsModule {
        &mut self.leads
    }

    /// Render the whole dashboard. A tab the role cannot open is left out
    /// of navigation; if it is the active one its module renders denied.
    pub fn render(
        &mut self,
        access: &AccessContext,
        store: &dyn TenantStore,
        app: &AppInfo,
        loading: bool,
    ) -> DashboardView {
        let module = match self.active_tab {
            Tab::Leads => ActiveModule::Leads(self.leads.render(access, store, loading)),
            Tab::Calls => ActiveModule::Calls(render_call_logs(access, store, loading)),
        };

        DashboardView {
            header: HeaderView::build(access, store, app),
            tabs: visible_tabs(access, self.active_tab),
            module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{LeadStatus, TenantDirectory};
    use crate::permissions::PermissionTable;
    use crate::view::{RenderKind, StatusFilter};
    use std::sync::Arc;

    fn fixture() -> (AccessContext, TenantDirectory, AppInfo) {
        (
            AccessContext::with_defaults(Arc::new(PermissionTable::standard())),
            TenantDirectory::fixture().unwrap(),
            AppInfo::default(),
        )
    }

    fn lead_names(view: &DashboardView) -> Vec<String> {
        match &view.module {
            ActiveModule::Leads(leads) => leads
                .state
                .content()
                .map(|t| t.rows.iter().map(|r| r.name.clone()).collect())
                .unwrap_or_default(),
            ActiveModule::Calls(_) => Vec::new(),
        }
    }

    #[test]
    fn both_roles_see_both_tabs() {
        let (mut ctx, _, _) = fixture();
        let labels: Vec<_> = visible_tabs(&ctx, Tab::Leads).iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["Leads", "Call Logs"]);

        ctx.set_current_role(Role::Agent);
        assert_eq!(visible_tabs(&ctx, Tab::Calls).len(), 2);
        assert!(visible_tabs(&ctx, Tab::Calls)[1].active);
    }

    #[test]
    fn unknown_role_sees_no_tabs_and_a_denied_module() {
        let (mut ctx, dir, app) = fixture();
        ctx.set_current_role("intern");

        let view = Dashboard::new().render(&ctx, &dir, &app, false);
        assert!(view.tabs.is_empty());
        assert_eq!(view.header.role_label, "Unknown");
        match view.module {
            ActiveModule::Leads(leads) => assert_eq!(leads.kind(), RenderKind::Denied),
            ActiveModule::Calls(_) => panic!("leads is the default tab"),
        }
    }

    #[test]
    fn admin_switches_tenant_and_sees_only_new_tenant_leads() {
        let (mut ctx, dir, app) = fixture();
        let mut dashboard = Dashboard::new();

        let before = dashboard.render(&ctx, &dir, &app, false);
        assert_eq!(lead_names(&before).len(), 5);
        assert_eq!(before.header.tenant_name.as_deref(), Some("Organization A"));

        ctx.set_current_tenant("org-b");
        let after = dashboard.render(&ctx, &dir, &app, false);
        let names = lead_names(&after);
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|n| !lead_names(&before).contains(n)));
        assert_eq!(after.header.tenant.as_str(), "org-b");
    }

    #[test]
    fn filter_survives_tenant_switch() {
        let (mut ctx, dir, app) = fixture();
        let mut dashboard = Dashboard::new();
        dashboard
            .leads_mut()
            .set_filter(StatusFilter::Only(LeadStatus::New));

        assert_eq!(lead_names(&dashboard.render(&ctx, &dir, &app, false)), vec!["Mike Wilson"]);

        ctx.set_current_tenant("org-b");
        assert_eq!(
            lead_names(&dashboard.render(&ctx, &dir, &app, false)),
            vec!["Alex Kumar", "Anita Desai"]
        );
    }

    #[test]
    fn calls_tab_renders_the_call_log() {
        let (ctx, dir, app) = fixture();
        let mut dashboard = Dashboard::new();
        dashboard.set_active_tab(Tab::Calls);

        let view = dashboard.render(&ctx, &dir, &app, false);
        match &view.module {
            ActiveModule::Calls(calls) => {
                assert_eq!(calls.header.as_ref().map(|h| h.total), Some(4))
            }
            ActiveModule::Leads(_) => panic!("calls tab is active"),
        }

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["module"]["tab"], "calls");
        assert_eq!(json["module"]["view"]["state"], "populated");
        assert_eq!(json["header"]["tenants"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn session_view_reports_permissions_and_tabs() {
        let (mut ctx, dir, _) = fixture();
        ctx.set_current_role(Role::Agent);

        let session = SessionView::build(&ctx, &dir, Tab::Leads);
        assert_eq!(
            session.permissions,
            vec![Permission::ViewLeads, Permission::ViewCalls]
        );
        assert_eq!(session.role_label, "Agent");
        assert_eq!(session.tabs.len(), 2);
        assert_eq!(session.tenant_name.as_deref(), Some("Organization A"));
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!("calls".parse::<Tab>(), Ok(Tab::Calls));
        assert_eq!("reports".parse::<Tab>(), Err(ParseError::Tab("reports".into())));
    }
}
