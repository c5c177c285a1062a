//! HTTP surface of the explorer.
//!
//! # Endpoints
//!
//! - `GET /` - The explorer page (filters, results, detail panel)
//! - `GET /download.csv` - Filtered rows as a CSV attachment
//! - `GET /api/elements` - Filtered rows as JSON
//! - `GET /api/elements/{id}` - A single row as JSON
//! - `GET /health` - Health check

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::export::{self, ElementList, ElementRecord};
use crate::state::{AppState, PageRequest};
use crate::ui;

/// Query strings arrive as raw pairs so repeated checkbox keys survive.
type QueryPairs = Query<Vec<(String, String)>>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Rows in the loaded table.
    pub rows: usize,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET / - Render the explorer page.
async fn index(State(state): State<AppState>, Query(pairs): QueryPairs) -> Html<String> {
    let req = PageRequest::from_query(state.facets(), &pairs);
    Html(ui::render_page(&state, &req))
}

/// GET /download.csv - Download the filtered rows.
async fn download_csv(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let req = PageRequest::from_query(state.facets(), &pairs);
    let view = state.filter(&req.filter);

    match export::to_csv(&view) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export::CSV_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            log::error!("CSV export failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: format!("{e:#}"),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/elements - Filtered rows as JSON.
async fn list_elements(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    let req = PageRequest::from_query(state.facets(), &pairs);
    let view = state.filter(&req.filter);
    Json(ElementList::new(&view)).into_response()
}

/// GET /api/elements/{id} - One row by id.
async fn get_element(State(state): State<AppState>, Path(id): Path<usize>) -> Response {
    match state.table().row(id) {
        Some(row) => Json(ElementRecord::from(row)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("no element with id {id}"),
            }),
        )
            .into_response(),
    }
}

/// GET /health - Health check.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        rows: state.table().len(),
    })
}

// ---------------------------------------------------------------------------
// Router Setup
// ---------------------------------------------------------------------------

/// Creates the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/download.csv", get(download_csv))
        .route("/api/elements", get(list_elements))
        .route("/api/elements/{id}", get(get_element))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Serving Research Elements Explorer on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
