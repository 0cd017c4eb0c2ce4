//! HTTP surface consumed by the browser feed.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /health` | `ok` |
//! | `GET /api/news?source=<name>` | JSON array of items, `400`/`500` with `{message}` |
//! | `GET /api/digest?sources=a,b` | JSON [`Digest`] across sources, newest first |

use crate::aggregate::aggregate;
use crate::dispatch::Dispatcher;
use crate::models::{Digest, NewsItem, Source};
use crate::scrapers::profile_for;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
}

pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", get(news))
        .route("/api/digest", get(digest))
        .layer(CorsLayer::very_permissive())
        .with_state(AppState { dispatcher })
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, dispatcher: Dispatcher) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, router(dispatcher)).await
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { message: self.message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    source: Option<String>,
}

#[instrument(level = "info", skip(state))]
async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    let Some(source) = query.source.filter(|s| !s.trim().is_empty()) else {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "Source parameter is required".to_string(),
        });
    };

    match state.dispatcher.fetch_for(&source).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            error!(%source, error = %e, "Scrape failed; answering 500");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Failed to fetch news for {source}: {e}"),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct DigestQuery {
    sources: Option<String>,
}

/// Comma-separated names, or every source that has a scraper.
fn requested_sources(raw: Option<&str>) -> Vec<String> {
    let names: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if !names.is_empty() {
        return names;
    }
    Source::ALL
        .iter()
        .filter(|s| profile_for(**s).is_some())
        .map(|s| s.label().to_string())
        .collect()
}

#[instrument(level = "info", skip(state))]
async fn digest(State(state): State<AppState>, Query(query): Query<DigestQuery>) -> Json<Digest> {
    let names = requested_sources(query.sources.as_deref());
    Json(aggregate(&state.dispatcher, &names).await)
}
