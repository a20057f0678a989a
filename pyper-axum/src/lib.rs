//! pyper-axum: Axum adapter for SalesPyper.
//!
//! Serves the dashboard views over HTTP. Each caller picks a session with
//! the `x-session-id` header; sessions are created on first use from the
//! app's configured defaults.

pub mod app;
mod error;
pub mod params;
pub mod rest;
pub mod session;
pub mod state;

pub use app::{axum, AxumApp};
pub use error::PyperAxumError;
pub use session::{DashboardSession, SessionRegistry};
pub use state::PyperAxumState;
