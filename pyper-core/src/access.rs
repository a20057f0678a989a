//! Per-session access context: who is looking, as which role, at which tenant.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::PyperResult;
use crate::events::{
    AccessChange, AccessEventHub, AccessEventKind, AccessListener, EventPat, ListenerId,
};
use crate::permissions::{Permission, PermissionTable, Role, RoleName};
use crate::tenant::TenantId;

pub const DEFAULT_TENANT: &str = "org-a";
pub const DEFAULT_ROLE: Role = Role::Admin;
pub const DEFAULT_USER: &str = "John Doe";

/// The current `{tenant, role, user}` triple, detached from the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessSnapshot {
    pub tenant: TenantId,
    pub role: RoleName,
    pub user: String,
}

/// Session-scoped access state.
///
/// Exactly one tenant and one role are current at any time. The two
/// setters are the only way to change them; every change is published to
/// the registered listeners before the setter returns, so a caller reading
/// the context afterwards never sees the old values.
///
/// Nothing is validated here. A tenant the directory does not know simply
/// resolves to no data, and a role name outside [`Role`] holds no
/// permissions.
#[derive(Debug)]
pub struct AccessContext {
    tenant: TenantId,
    role: RoleName,
    user: String,
    permissions: Arc<PermissionTable>,
    events: AccessEventHub,
}

impl AccessContext {
    pub fn new(
        tenant: impl Into<TenantId>,
        role: impl Into<RoleName>,
        user: impl Into<String>,
        permissions: Arc<PermissionTable>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            role: role.into(),
            user: user.into(),
            permissions,
            events: AccessEventHub::new(),
        }
    }

    /// `org-a`, `admin`, `John Doe`.
    pub fn with_defaults(permissions: Arc<PermissionTable>) -> Self {
        Self::new(DEFAULT_TENANT, DEFAULT_ROLE, DEFAULT_USER, permissions)
    }

    pub fn current_tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn current_role(&self) -> &RoleName {
        &self.role
    }

    pub fn current_user(&self) -> &str {
        &self.user
    }

    pub fn snapshot(&self) -> AccessSnapshot {
        AccessSnapshot {
            tenant: self.tenant.clone(),
            role: self.role.clone(),
            user: self.user.clone(),
        }
    }

    pub fn permission_table(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Permissions held by the current role.
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        self.permissions.permissions_of(&self.role)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.allows(&self.role, permission)
    }

    /// String form of [`has_permission`](Self::has_permission); names that
    /// are not permissions are never held.
    pub fn has_permission_named(&self, permission: &str) -> bool {
        permission
            .parse::<Permission>()
            .map(|p| self.has_permission(p))
            .unwrap_or(false)
    }

    /// `Forbidden` unless the current role holds `permission`.
    pub fn require(&self, permission: Permission) -> PyperResult<()> {
        if !self.has_permission(permission) {
            crate::bail_pyper!(
                forbidden,
                "Role '{}' lacks the '{}' permission",
                self.role,
                permission
            );
        }
        Ok(())
    }

    pub fn set_current_tenant(&mut self, tenant: impl Into<TenantId>) {
        let tenant = tenant.into();
        if tenant == self.tenant {
            return;
        }

        let from = std::mem::replace(&mut self.tenant, tenant);
        debug!(from = %from, to = %self.tenant, user = %self.user, "tenant switched");
        let change = AccessChange::Tenant {
            from,
            to: self.tenant.clone(),
        };
        self.publish(change);
    }

    pub fn set_current_role(&mut self, role: impl Into<RoleName>) {
        let role = role.into();
        if role == self.role {
            return;
        }

        if role.role().is_none() {
            warn!(role = %role, "switching to an unknown role; it holds no permissions");
        }

        let from = std::mem::replace(&mut self.role, role);
        debug!(from = %from, to = %self.role, user = %self.user, "role switched");
        let change = AccessChange::Role {
            from,
            to: self.role.clone(),
        };
        self.publish(change);
    }

    pub fn subscribe(&mut self, kind: AccessEventKind, listener: AccessListener) -> ListenerId {
        self.events.on(kind, listener)
    }

    pub fn subscribe_all(&mut self, listener: AccessListener) -> ListenerId {
        self.events.on_pattern(EventPat::Any, listener)
    }

    pub fn subscribe_once(
        &mut self,
        kind: AccessEventKind,
        listener: AccessListener,
    ) -> ListenerId {
        self.events.once_pattern(EventPat::Exact(kind), listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn publish(&mut self, change: AccessChange) {
        let snapshot = self.snapshot();
        self.events.emit(&change, &snapshot);
    }
}
