//! HTTP binding for the sync server.
//!
//! Thin transport glue over [`SyncServer`]: request parsing, response
//! formatting, and status codes live here; everything else is the
//! handlers' business.
//!
//! Routes:
//! - `GET /` — service banner
//! - `GET /health` — liveness query (current version, no side effects)
//! - `POST /sync/write` — JSON [`WriteRequest`] body
//! - `GET /sync/read` — optional `version` and `client` query parameters
//! - `GET /sync/presence` — active-client count

use crate::error::{ServerError, ServerResult};
use crate::server::SyncServer;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use padsync_protocol::{
    HealthResponse, PresenceRequest, PresenceResponse, ReadRequest, ReadResponse, WriteRequest,
    WriteResponse,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Header carrying an opaque client identity for presence tracking.
const CLIENT_ID_HEADER: &str = "x-client-id";

#[derive(Clone)]
struct AppState {
    server: Arc<SyncServer>,
}

/// Builds the router for the given server.
pub fn router(server: Arc<SyncServer>) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/sync/write", post(write))
        .route("/sync/read", get(read))
        .route("/sync/presence", get(presence))
        .with_state(AppState { server })
}

/// Binds the configured address and serves requests until shutdown.
pub async fn serve(server: Arc<SyncServer>) -> ServerResult<()> {
    let addr = server.config().bind_addr;
    let app = router(Arc::clone(&server));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "padsync server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn banner() -> &'static str {
    "padsync shared-document sync server"
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.server.handle_health())
}

async fn write(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WriteResponse>) {
    let request = match WriteRequest::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "rejected malformed write payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(WriteResponse::error(e.to_string())),
            );
        }
    };

    match state.server.handle_write(request) {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => (status_for(&e), Json(WriteResponse::error(e.to_string()))),
    }
}

#[derive(Debug, Deserialize)]
struct ReadQuery {
    version: Option<u64>,
    client: Option<String>,
}

async fn read(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<ReadQuery>,
) -> Json<ReadResponse> {
    let client = query
        .client
        .unwrap_or_else(|| client_key(&headers, peer));

    let request = ReadRequest {
        last_version: query.version,
        client: Some(client),
    };

    Json(state.server.handle_read(request))
}

async fn presence(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(state.server.handle_presence(PresenceRequest::new()))
}

/// Derives the presence key for a request: the `x-client-id` header when
/// present, the peer IP otherwise.
fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

fn status_for(error: &ServerError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
