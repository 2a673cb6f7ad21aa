use crate::aggregate::{Aggregator, MediaRequest};
use crate::carousel::{CarouselWindow, Direction};
use crate::config::Config;
use crate::error::AggregateError;
use crate::models::{MediaDetails, MediaSummary, PersonProfile};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub page_size: usize,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>, page_size: usize) -> Self {
        Self {
            aggregator: Aggregator::new(tmdb),
            page_size,
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config.tmdb.clone())?);
    info!(
        "Using TMDB at {} (carousel page size {})",
        config.tmdb.base_url, config.page_size
    );
    let state = AppState::new(tmdb, config.page_size);

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/lists/:list", get(list_window))
        .route("/api/person/:id", get(person))
        .route("/api/:kind/:id", get(details))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Aggregation failure rendered as the JSON error body the front-end expects.
pub struct ApiError(AggregateError);

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AggregateError::MissingInput(_) => StatusCode::NOT_FOUND,
            AggregateError::EmptyQuery => StatusCode::BAD_REQUEST,
            AggregateError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        };
        let body = Json(json!({"status": "error", "message": self.0.user_message()}));
        (status, body).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub page: Option<usize>,
    pub step: Option<Direction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub step: Option<Direction>,
}

async fn details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<MediaDetails>, ApiError> {
    let request = MediaRequest::new(id.parse().ok(), kind.parse().ok())?;
    let details = state.aggregator.details(request).await?;
    Ok(Json(details))
}

async fn person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonProfile>, ApiError> {
    let profile = state.aggregator.person(id.parse().ok()).await?;
    Ok(Json(profile))
}

async fn list_window(
    State(state): State<AppState>,
    Path(list): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<CarouselWindow<MediaSummary>>, ApiError> {
    let items = match list.as_str() {
        "top_rated" => state.aggregator.top_rated().await?,
        "upcoming" => state.aggregator.upcoming().await?,
        other => {
            warn!("Unknown list '{}'", other);
            return Err(AggregateError::MissingInput("list").into());
        }
    };
    Ok(Json(CarouselWindow::at(
        items,
        query.page.unwrap_or(0),
        query.step,
        state.page_size,
    )))
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<CarouselWindow<MediaSummary>>, ApiError> {
    let q = query.q.unwrap_or_default();
    let results = state.aggregator.search(&q).await?;
    info!("Search '{}' returned {} results", q.trim(), results.len());
    Ok(Json(CarouselWindow::at(
        results,
        query.page.unwrap_or(0),
        query.step,
        state.page_size,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
