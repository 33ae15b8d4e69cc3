//! HTTP server for the TeamTrack backend API.
//!
//! The browser frontend drives bulk imports through this surface; persistent
//! storage stays with the external storage actor.
//!
//! # API Endpoints
//!
//! | Method | Path                      | Description                            |
//! |--------|---------------------------|----------------------------------------|
//! | GET    | `/health`                 | Health check                           |
//! | GET    | `/api/logs`               | SSE stream for real-time logs          |
//! | POST   | `/api/auth/demo-login`    | Start a demo session for a role        |
//! | GET    | `/api/auth/profile`       | Profile for the presented token        |
//! | POST   | `/api/auth/logout`        | End the presented session              |
//! | POST   | `/api/resources/import`   | Upload a file; `?commit=true` submits  |
//! | GET    | `/api/resources/template` | Download the import template           |
//! | GET    | `/api/resources/export`   | Download all resources as CSV          |

use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{
    error_response, DemoLoginRequest, ImportResponse, SessionResponse,
};
use crate::error::SessionError;
use crate::export::{export_file_name, resources_to_csv, sample_template_csv, TEMPLATE_FILE_NAME};
use crate::import::pipeline::parse_and_validate;
use crate::import::submit::submit_outcomes;
use crate::models::UserProfile;
use crate::session::SessionStore;
use crate::store::{AnyStore, ResourceStore};

/// Shared application state: the storage actor client and the session
/// context, both passed by reference into the handlers.
pub struct AppState {
    pub store: AnyStore,
    pub sessions: SessionStore,
}

type ApiError = (StatusCode, Json<Value>);

/// Start the HTTP server.
pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/logs", get(sse_logs))
        .route("/api/auth/demo-login", post(demo_login))
        .route("/api/auth/profile", get(profile))
        .route("/api/auth/logout", post(logout))
        .route("/api/resources/import", post(import_resources))
        .route("/api/resources/template", get(template))
        .route("/api/resources/export", get(export_resources))
        .with_state(Arc::new(state))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("TeamTrack backend running on http://localhost:{}", port);
    println!("   POST /api/resources/import   - Upload CSV/XLSX (?commit=true to submit)");
    println!("   GET  /api/resources/template - Import template download");
    println!("   GET  /api/resources/export   - CSV export");
    println!("   GET  /api/logs               - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "teamtrack-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

// =============================================================================
// Auth
// =============================================================================

async fn demo_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DemoLoginRequest>,
) -> Json<SessionResponse> {
    let (token, profile) = state.sessions.login_demo(request.role);
    Json(SessionResponse { token, profile })
}

async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = session_profile(&state, &headers)?;
    Ok(Json(profile))
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.clear(token);
    }
    Json(json!({ "status": "ok" }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn session_profile(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| {
        (StatusCode::UNAUTHORIZED, Json(error_response("missing session token")))
    })?;
    state.sessions.load(token).ok_or_else(|| {
        (StatusCode::UNAUTHORIZED, Json(error_response("invalid or expired session token")))
    })
}

// =============================================================================
// Import
// =============================================================================

#[derive(Debug, Deserialize)]
struct ImportQuery {
    #[serde(default)]
    commit: bool,
}

/// Upload endpoint. Parses and validates the file and returns a per-row
/// preview; with `?commit=true` (admin/PMO sessions only) the valid rows are
/// also submitted to the storage actor in one bulk call.
async fn import_resources(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    if query.commit {
        state
            .sessions
            .authorize_manager(bearer_token(&headers))
            .map_err(|e| {
                let status = match e {
                    SessionError::InvalidToken => StatusCode::UNAUTHORIZED,
                    SessionError::Forbidden(_) => StatusCode::FORBIDDEN,
                };
                (status, Json(error_response(&e.to_string())))
            })?;
    }

    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (StatusCode::BAD_REQUEST, Json(error_response(&format!("Multipart error: {}", e))))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data
        .ok_or_else(|| (StatusCode::BAD_REQUEST, Json(error_response("No file provided"))))?;
    let file_name = file_name.unwrap_or_else(|| "upload.csv".to_string());

    // Spreadsheet decoding of large files is CPU-bound; keep it off the
    // request executor.
    let parse_name = file_name.clone();
    let parsed = tokio::task::spawn_blocking(move || parse_and_validate(&bytes, &parse_name))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_response(&format!("Parse task failed: {}", e))),
            )
        })?
        .map_err(|e| {
            log_error(format!("Parse failed for {file_name}: {e}"));
            (StatusCode::BAD_REQUEST, Json(error_response(&e.to_string())))
        })?;

    let summary = if query.commit {
        submit_outcomes(&parsed.rows, &state.store).await.map_err(|e| {
            log_error(format!("Bulk submit failed: {e}"));
            (StatusCode::BAD_GATEWAY, Json(error_response(&e.to_string())))
        })?
    } else {
        None
    };

    Ok(Json(ImportResponse::from_parts(&parsed, summary.as_ref())))
}

// =============================================================================
// Template & export
// =============================================================================

async fn template() -> impl IntoResponse {
    csv_attachment(TEMPLATE_FILE_NAME.to_string(), sample_template_csv())
}

async fn export_resources(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let resources = state.store.fetch_resources().await.map_err(|e| {
        log_error(format!("Export fetch failed: {e}"));
        (StatusCode::BAD_GATEWAY, Json(error_response(&e.to_string())))
    })?;

    let file_name = export_file_name(chrono::Utc::now().date_naive());
    Ok(csv_attachment(file_name, resources_to_csv(&resources)))
}

fn csv_attachment(file_name: String, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}
