use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var("MOCK_API_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.into())
        .parse()
        .context("MOCK_API_ADDR must be host:port")?;

    let state = mock_api::SharedState::seeded();
    let app = mock_api::api_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!(addr = %listener.local_addr()?, "mock api listening");
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
