//! Stand-ins for the third party services the backend talks to.
//!
//! Every server can run standalone (see the `counsel-testing` binary) or be
//! spawned in-process by integration tests via [`spawn`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

pub mod cms;
pub mod crm;

/// Serve `router` on `host:port` until the process exits.
pub async fn serve(router: Router, host: IpAddr, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router)
        .await
        .context("Failed to start HTTP server")
}

/// Serve `router` on a random local port in the background and return the
/// bound address.
pub async fn spawn(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind to a local port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(addr)
}
