// src/server.rs

//! HTTP endpoint serving the feed.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::{CatalogConfig, Config};
use crate::pipeline::{CatalogVersioner, LinkOverrides, run_export};
use crate::source::CatalogSource;

pub const FEED_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Shared state injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogConfig>,
    pub source: Arc<dyn CatalogSource>,
    pub versioner: Arc<CatalogVersioner>,
}

impl AppState {
    pub fn new(catalog: CatalogConfig, source: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            source,
            versioner: Arc::new(CatalogVersioner::new()),
        }
    }
}

/// Query string of the feed endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub passlink: Option<String>,
    pub classlink: Option<String>,
}

/// Feed under `feed_path`, liveness under `/health`.
pub fn build_router(state: AppState, feed_path: &str) -> Router {
    Router::new()
        .route(feed_path, get(feed_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[instrument(skip_all)]
async fn feed_handler(State(state): State<AppState>, Query(query): Query<FeedQuery>) -> Response {
    let overrides = LinkOverrides::new(query.passlink, query.classlink);
    if overrides != LinkOverrides::default() {
        info!(
            pass_link = ?overrides.pass_link,
            class_link = ?overrides.class_link,
            "Applying link overrides"
        );
    }

    match run_export(
        &state.catalog,
        state.source.as_ref(),
        &state.versioner,
        &overrides,
    )
    .await
    {
        Ok(outcome) => {
            info!(
                offers = outcome.offer_count,
                changed = outcome.publication.changed,
                "Feed served"
            );
            ([(header::CONTENT_TYPE, FEED_CONTENT_TYPE)], outcome.body).into_response()
        }
        Err(e) => {
            error!("Feed export failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("feed export failed: {e}"),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let app = build_router(state, &config.server.feed_path);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;

    info!(
        "Listening on {} (feed at {})",
        listener.local_addr()?,
        config.server.feed_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
