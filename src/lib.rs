pub mod access;
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod message;
pub mod profile;

#[cfg(test)]
mod test_util;

use anyhow::Context;
use entrait::Impl;
use tower::ServiceBuilder;

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(pub uuid::Uuid);

pub async fn serve(app: app::App) -> anyhow::Result<()> {
    let listen_addr = app.config.listen_addr;
    let router = api::api_router().layer(
        ServiceBuilder::new()
            .layer(axum::extract::Extension(Impl::new(app)))
            // Enables logging. Use `RUST_LOG=tower_http=debug`
            .layer(tower_http::trace::TraceLayer::new_for_http()),
    );

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("could not bind to {listen_addr}"))?;

    tracing::info!("listening on {listen_addr}");

    axum::serve(listener, router)
        .await
        .context("error running HTTP server")
}
