// SPDX-License-Identifier: Apache-2.0
//! Nummervoorziening stub server, standalone development binary.
//!
//! Listens on `NV_STUB_PORT` (default 8095). Data is lost on restart.

use std::net::SocketAddr;

use nv_stub::{routes, AppState, StubConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("NV_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8095);

    let mut config = StubConfig::default();
    if let Ok(secret) = std::env::var("NV_STUB_ISSUER_SECRET") {
        config.issuer_secret = secret;
    }
    if let Some(polls) = std::env::var("NV_STUB_NOT_FINISHED_POLLS")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.not_finished_polls = polls;
    }

    let app = routes::router(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("nv-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
