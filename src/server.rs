//! JSON HTTP API for the browser front end.
//!
//! The front end renders; this server answers the questions it asks:
//! what is in the (filtered) feed, what does one item's detail look like,
//! and which items are saved or watched.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/feed` | Filtered feed (`domains`, `platforms`, `q`, `limit`) |
//! | `GET` | `/items/{id}` | Item detail with flags, transcript, and summary |
//! | `GET` | `/items/{id}/transcript` | Transcript, or `{"status": "unavailable"}` |
//! | `GET` | `/items/{id}/summary` | Summary, or `{"status": "unavailable"}` |
//! | `GET` | `/sources` | Followed sources and per-platform stats (`platform`) |
//! | `GET` | `/saved` | Saved items with watched status (`filter`) |
//! | `GET` | `/collections/{kind}` | Ids in `saved` or `watched` |
//! | `PUT` | `/collections/{kind}/{id}` | Add an id |
//! | `DELETE` | `/collections/{kind}/{id}` | Remove an id |
//! | `POST` | `/collections/{kind}/{id}/toggle` | Flip membership |
//!
//! `domains` and `platforms` are comma-separated lists.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "unknown domain: 'Cooking'" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the dashboard can be
//! served from a different origin than the API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use oasis_core::collection::{Collection, CollectionKind};
use oasis_core::enrichment::{load_summary, load_transcript, Availability};
use oasis_core::error::{ItemError, ParseError};
use oasis_core::filter::WatchFilter;
use oasis_core::models::{Platform, Summary, Transcript};

use crate::collections::{apply_change, saved_view, Change, ChangeOutcome, SavedView};
use crate::config::Config;
use crate::data::DataRepository;
use crate::detail::{get_item_detail, ItemDetail};
use crate::feed::{build_filter, query_feed, FeedPage};
use crate::sources::{get_sources, SourcesView};
use crate::sqlite_store::SqliteKv;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    repo: Arc<DataRepository>,
    kv: Arc<SqliteKv>,
    /// Serializes read-modify-write of the collections.
    write_lock: Arc<Mutex<()>>,
}

/// Build the router over an opened store.
pub async fn build_router(config: &Config) -> anyhow::Result<Router> {
    let kv = SqliteKv::open(config).await?;
    let state = AppState {
        config: Arc::new(config.clone()),
        repo: Arc::new(DataRepository::new(&config.data)),
        kv: Arc::new(kv),
        write_lock: Arc::new(Mutex::new(())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/feed", get(handle_feed))
        .route("/items/{id}", get(handle_item))
        .route("/items/{id}/transcript", get(handle_transcript))
        .route("/items/{id}/summary", get(handle_summary))
        .route("/sources", get(handle_sources))
        .route("/saved", get(handle_saved))
        .route("/collections/{kind}", get(handle_collection))
        .route(
            "/collections/{kind}/{id}",
            put(handle_add).delete(handle_remove),
        )
        .route("/collections/{kind}/{id}/toggle", post(handle_toggle))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Starts the HTTP server.
///
/// Binds to `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let app = build_router(config).await?;
    let bind_addr = config.server.bind.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");
    println!("Oasis API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Facet-name parse failures and blank ids are the caller's fault; an
/// unknown item id is a 404; everything else is ours.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(parse) = err.downcast_ref::<ParseError>() {
            return bad_request(parse.to_string());
        }
        match err.downcast_ref::<ItemError>() {
            Some(e @ ItemError::NotFound(_)) => return not_found(e.to_string()),
            Some(e @ ItemError::EmptyId) => return bad_request(e.to_string()),
            None => {}
        }
        tracing::error!(error = %format!("{:#}", err), "request failed");
        internal(format!("{:#}", err))
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        bad_request(err.to_string())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /feed ============

#[derive(Debug, Deserialize)]
struct FeedParams {
    #[serde(default)]
    domains: Option<String>,
    #[serde(default)]
    platforms: Option<String>,
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

async fn handle_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedPage>, AppError> {
    let domains: Vec<String> = params.domains.into_iter().collect();
    let platforms: Vec<String> = params.platforms.into_iter().collect();
    let filter = build_filter(&domains, &platforms, params.q.as_deref())?;

    let page = query_feed(
        &state.repo,
        state.kv.as_ref(),
        &filter,
        Utc::now(),
        Duration::hours(state.config.feed.new_window_hours),
        params.limit,
    )
    .await?;
    Ok(Json(page))
}

// ============ GET /items/{id} ============

async fn handle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemDetail>, AppError> {
    let detail = get_item_detail(&state.repo, state.kv.as_ref(), &id).await?;
    Ok(Json(detail))
}

async fn handle_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Availability<Transcript>> {
    Json(load_transcript(state.repo.as_ref(), &id).await)
}

async fn handle_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Availability<Summary>> {
    Json(load_summary(state.repo.as_ref(), &id).await)
}

// ============ GET /sources ============

#[derive(Debug, Deserialize)]
struct SourcesParams {
    #[serde(default)]
    platform: Option<String>,
}

async fn handle_sources(
    State(state): State<AppState>,
    Query(params): Query<SourcesParams>,
) -> Result<Json<SourcesView>, AppError> {
    let platform = match params.platform.as_deref() {
        None | Some("") | Some("all") => None,
        Some(name) => Some(name.parse::<Platform>()?),
    };
    Ok(Json(get_sources(&state.repo, platform).await?))
}

// ============ GET /saved ============

#[derive(Debug, Deserialize)]
struct SavedParams {
    #[serde(default)]
    filter: Option<String>,
}

async fn handle_saved(
    State(state): State<AppState>,
    Query(params): Query<SavedParams>,
) -> Result<Json<SavedView>, AppError> {
    let filter = match params.filter.as_deref() {
        None | Some("") => WatchFilter::All,
        Some(name) => name.parse::<WatchFilter>()?,
    };
    Ok(Json(saved_view(&state.repo, state.kv.as_ref(), filter).await?))
}

// ============ /collections ============

#[derive(Serialize)]
struct CollectionResponse {
    kind: CollectionKind,
    ids: Vec<String>,
}

async fn handle_collection(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<CollectionResponse>, AppError> {
    let kind: CollectionKind = kind.parse()?;
    let ids = Collection::new(state.kv.as_ref(), kind).list_all().await?;
    Ok(Json(CollectionResponse { kind, ids }))
}

async fn change(
    state: &AppState,
    kind: &str,
    id: &str,
    change: Change,
) -> Result<Json<ChangeOutcome>, AppError> {
    let kind: CollectionKind = kind.parse()?;
    let _guard = state.write_lock.lock().await;
    let outcome = apply_change(state.kv.as_ref(), kind, change, id).await?;
    Ok(Json(outcome))
}

async fn handle_add(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ChangeOutcome>, AppError> {
    change(&state, &kind, &id, Change::Add).await
}

async fn handle_remove(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ChangeOutcome>, AppError> {
    change(&state, &kind, &id, Change::Remove).await
}

async fn handle_toggle(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ChangeOutcome>, AppError> {
    change(&state, &kind, &id, Change::Toggle).await
}
