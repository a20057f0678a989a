use anyhow::Result;
use pyper_core::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ax = salespyper::build()?;

    let host = ax
        .app
        .config()
        .get_string(config::HTTP_HOST)
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let port = ax
        .app
        .config()
        .get_string(config::HTTP_PORT)
        .unwrap_or_else(|| "3030".to_string());

    let addr = format!("{host}:{port}");

    ax.listen(addr).await?;

    Ok(())
}
