//! pyper-core: framework-agnostic core for SalesPyper.
//!
//! Holds the role → permission table, the tenant directory with its
//! scoped accessors, the per-session access context, and the derived
//! view logic the dashboard renders from.

pub mod access;
pub mod app;
pub mod config;
pub mod directory;
pub mod errors;
pub mod events;
pub mod permissions;
pub mod tenant;
pub mod view;

pub use access::{AccessContext, AccessSnapshot};
pub use app::{AppInfo, PyperApp};
pub use config::{PyperConfig, PyperConfigSnapshot};
pub use directory::{
    Call, CallDuration, CallOutcome, DirectoryError, Lead, LeadStatus, Tenant, TenantDirectory,
    TenantStore,
};
pub use errors::{ErrorKind, ParseError, PyperError};
pub use events::{
    listener, AccessChange, AccessEventHub, AccessEventKind, AccessListener, ListenerId,
};
pub use permissions::{Permission, PermissionTable, Role, RoleName};
pub use tenant::{TenantId, TenantInfo};
