//! In-memory test double of the helpdesk REST API.
//!
//! Seeded with the two demo accounts and two tickets. Tokens are random
//! opaque strings kept in memory; nothing is signed or persisted.

pub mod routes;
pub mod state;

pub use routes::api_router;
pub use state::{MockState, SharedState};

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bind `addr` and serve a freshly seeded double in the background.
/// Pass port 0 to get an ephemeral port; the bound address is returned.
pub async fn spawn(addr: SocketAddr) -> anyhow::Result<(SocketAddr, SharedState, JoinHandle<()>)> {
    let state = SharedState::seeded();
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let app = api_router(state.clone());
    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "mock api stopped");
        }
    });
    Ok((local, state, handle))
}
