use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::json;
use tracing::{error, info};

use crate::cache::store::StoreKind;
use crate::config::settings::SettingsConfig;
use crate::manager::token_manager::TokenManager;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;

pub const TOKEN_PATH: &str = "/token";

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub manager: Arc<TokenManager<StoreKind>>,
}

impl AppState {
    pub fn new(metrics: &Metrics, manager: Arc<TokenManager<StoreKind>>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            manager,
        }
    }
}

pub async fn router(settings_config: &SettingsConfig, manager: Arc<TokenManager<StoreKind>>) -> Router {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, manager);

    Router::new()
        .route(TOKEN_PATH, get(get_token))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

/// Serve `/token` (and `/metrics` when enabled) until the process stops.
pub async fn start(settings_config: &SettingsConfig, manager: Arc<TokenManager<StoreKind>>) -> Result<()> {
    let app = router(settings_config, manager).await;

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind '{}'", bind_addr))?;
    info!("token server listening on {}", bind_addr);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await.context("token server stopped")?;
    Ok(())
}

async fn get_token(State(state): State<AppState>) -> Response {
    match state.manager.get_token().await {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => {
            error!("token unavailable: {:#}", err);
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": format!("{:#}", err) }))).into_response()
        }
    }
}
