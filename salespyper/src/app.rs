use pyper_core::config;
use pyper_core::PyperConfig;
use tracing::debug;

/// Stock settings with any `SALESPYPER__*` environment overrides applied.
pub fn salespyper_config() -> PyperConfig {
    let mut config = PyperConfig::with_defaults();
    let applied = config.load_env();
    debug!(applied, port = ?config.get(config::HTTP_PORT), "configuration loaded");
    config
}
