//! Settings panel, visible to roles holding `view_settings`.

use serde::Serialize;

use crate::access::AccessContext;
use crate::app::AppInfo;
use crate::directory::TenantStore;
use crate::permissions::{Permission, RoleName};
use crate::tenant::TenantId;

use super::RenderState;

pub const SETTINGS_DENIED: &str = "Access Denied: You don't have permission to view settings.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPanel {
    pub user: String,
    pub role: RoleName,
    pub role_label: &'static str,
    pub tenant: TenantId,
    pub tenant_name: Option<String>,
    pub permissions: Vec<Permission>,
    pub app: AppInfo,
}

pub type SettingsView = RenderState<SettingsPanel>;

/// Settings are never loading or empty, so only the permission gate applies.
pub fn render_settings(
    access: &AccessContext,
    store: &dyn TenantStore,
    app: &AppInfo,
) -> SettingsView {
    if !access.has_permission(Permission::ViewSettings) {
        return RenderState::Denied {
            message: SETTINGS_DENIED.to_string(),
        };
    }

    RenderState::Populated(SettingsPanel {
        user: access.current_user().to_string(),
        role: access.current_role().clone(),
        role_label: access.current_role().label(),
        tenant: access.current_tenant().clone(),
        tenant_name: store
            .tenant_info(access.current_tenant())
            .map(|info| info.name),
        permissions: access.permissions().iter().copied().collect(),
        app: app.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::TenantDirectory;
    use crate::permissions::{PermissionTable, Role};
    use crate::view::RenderKind;
    use std::sync::Arc;

    #[test]
    fn admin_sees_session_and_app_details() {
        let dir = TenantDirectory::fixture().unwrap();
        let mut ctx = AccessContext::with_defaults(Arc::new(PermissionTable::standard()));
        ctx.set_current_tenant("org-b");

        let view = render_settings(&ctx, &dir, &AppInfo::default());
        let panel = view.content().unwrap();
        assert_eq!(panel.role_label, "Admin");
        assert_eq!(panel.tenant_name.as_deref(), Some("Organization B"));
        assert_eq!(panel.permissions.len(), 7);
        assert_eq!(panel.app.name, "SalesPyper");
    }

    #[test]
    fn agent_is_denied() {
        let dir = TenantDirectory::fixture().unwrap();
        let mut ctx = AccessContext::with_defaults(Arc::new(PermissionTable::standard()));
        ctx.set_current_role(Role::Agent);

        let view = render_settings(&ctx, &dir, &AppInfo::default());
        assert_eq!(view.kind(), RenderKind::Denied);
        assert_eq!(view.message(), Some(SETTINGS_DENIED));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["state"], "denied");
    }
}
