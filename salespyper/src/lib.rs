mod app;

use anyhow::Result;
use pyper_axum::{axum, AxumApp};
use pyper_core::{PyperApp, PyperConfig};

pub use app::salespyper_config;

/// The dashboard server configured from the environment.
pub fn build() -> Result<AxumApp> {
    build_with(salespyper_config())
}

pub fn build_with(config: PyperConfig) -> Result<AxumApp> {
    let app = PyperApp::new(&config)?;

    let ax = axum(app)
        .use_get("/health", || async { "ok" })
        .with_http_layers();

    Ok(ax)
}
