// SPDX-License-Identifier: Apache-2.0
//! In-memory stand-in for the Nummervoorziening issuance service.
//!
//! Serves the JSON operation binding `nv-client` speaks, so the client can
//! be exercised end to end without the real service. Pseudonyms are derived
//! from an issuer secret with SHA-512; they are stable for a given secret
//! but bear no relation to production values.
//!
//! Storage is in-memory (DashMap and a `parking_lot` lock) with no persistence.

pub mod routes;
pub mod store;

use std::net::SocketAddr;

pub use store::{AppState, BatchStatus, StubConfig};

/// Bind an ephemeral port on 127.0.0.1 and serve the stub in the background.
///
/// Returns the bound address and a handle on the shared state.
pub async fn spawn_local(config: StubConfig) -> std::io::Result<(SocketAddr, AppState)> {
    let state = AppState::new(config);
    let app = routes::router(state.clone());
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.into_make_service()).await {
            tracing::error!(error = %e, "stub server stopped");
        }
    });
    tracing::debug!(%addr, "nv-stub spawned");
    Ok((addr, state))
}
