//! Roles, permissions and the table mapping one to the other.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

static NO_PERMISSIONS: BTreeSet<Permission> = BTreeSet::new();

/// Something a role may be allowed to do in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewLeads,
    EditLeads,
    CreateLeads,
    DeleteLeads,
    ViewCalls,
    ViewSettings,
    AccessAllFeatures,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::ViewLeads,
        Permission::EditLeads,
        Permission::CreateLeads,
        Permission::DeleteLeads,
        Permission::ViewCalls,
        Permission::ViewSettings,
        Permission::AccessAllFeatures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewLeads => "view_leads",
            Permission::EditLeads => "edit_leads",
            Permission::CreateLeads => "create_leads",
            Permission::DeleteLeads => "delete_leads",
            Permission::ViewCalls => "view_calls",
            Permission::ViewSettings => "view_settings",
            Permission::AccessAllFeatures => "access_all_features",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseError::Permission(s.to_string()))
    }
}

/// The roles the dashboard knows how to grant permissions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Agent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Agent => "Agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            other => Err(ParseError::Role(other.to_string())),
        }
    }
}

/// A role as a session names it.
///
/// Sessions may carry names outside [`Role`] (e.g. from configuration);
/// such names are kept verbatim and hold no permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The known role this name refers to, if any.
    pub fn role(&self) -> Option<Role> {
        self.0.parse().ok()
    }

    /// Human label; "Unknown" for names outside [`Role`].
    pub fn label(&self) -> &'static str {
        self.role().map_or("Unknown", |r| r.label())
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Role> for RoleName {
    fn from(role: Role) -> Self {
        Self(role.as_str().to_string())
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Mapping from role to the permissions it grants.
///
/// Lookups are total: a role without an entry, or a name that is not a
/// role at all, has the empty permission set.
#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionTable {
    /// An empty table; every role has zero permissions.
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// The dashboard's stock table: admins may do everything, agents may
    /// only look at leads and calls.
    pub fn standard() -> Self {
        Self::new()
            .grant(Role::Admin, Permission::ALL)
            .grant(Role::Agent, [Permission::ViewLeads, Permission::ViewCalls])
    }

    /// Add permissions to a role, keeping what it already had.
    pub fn grant<I>(mut self, role: Role, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    pub fn role_permissions(&self, role: Role) -> &BTreeSet<Permission> {
        self.grants.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    pub fn permissions_of(&self, role: &RoleName) -> &BTreeSet<Permission> {
        match role.role() {
            Some(role) => self.role_permissions(role),
            None => &NO_PERMISSIONS,
        }
    }

    pub fn allows(&self, role: &RoleName, permission: Permission) -> bool {
        self.permissions_of(role).contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        let table = PermissionTable::standard();
        let admin = RoleName::from(Role::Admin);
        for p in Permission::ALL {
            assert!(table.allows(&admin, p), "admin should hold {p}");
        }
    }

    #[test]
    fn agent_only_views() {
        let table = PermissionTable::standard();
        let agent = RoleName::from(Role::Agent);
        let held: Vec<_> = table.permissions_of(&agent).iter().copied().collect();
        assert_eq!(held, vec![Permission::ViewLeads, Permission::ViewCalls]);
        assert!(!table.allows(&agent, Permission::EditLeads));
        assert!(!table.allows(&agent, Permission::ViewSettings));
    }

    #[test]
    fn unknown_role_names_have_nothing() {
        let table = PermissionTable::standard();
        for name in ["", "root", "Admin", "supervisor"] {
            let role = RoleName::new(name);
            assert!(table.permissions_of(&role).is_empty());
            for p in Permission::ALL {
                assert!(!table.allows(&role, p));
            }
        }
    }

    #[test]
    fn missing_entry_means_no_permissions() {
        let table = PermissionTable::new().grant(Role::Admin, [Permission::ViewLeads]);
        assert!(table.role_permissions(Role::Agent).is_empty());
        assert!(!table.allows(&Role::Agent.into(), Permission::ViewLeads));
    }

    #[test]
    fn names_round_trip_through_strings() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
        assert!("edit".parse::<Permission>().is_err());
        assert_eq!(RoleName::new("agent").label(), "Agent");
        assert_eq!(RoleName::new("guest").label(), "Unknown");
    }
}
