//! Pin publish proxy
//!
//! A stateless HTTP relay between callers and the Pinterest API. Callers
//! post `{accessToken, action, pinData?, boardId?}`; the proxy re-issues the
//! matching upstream calls with the caller's bearer token and relays the
//! outcome. Every response carries permissive CORS headers.

pub mod client;
pub mod types;

pub use client::ProxyClient;
pub use types::{ProxyAction, ProxyRequest};

use crate::config::Config;
use crate::error::{PinforgeError, Result};
use crate::pinterest::PinterestClient;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path the proxy endpoint is mounted on
pub const PROXY_PATH: &str = "/api/pinterest";

/// Shared proxy state; holds no per-request data
#[derive(Clone)]
pub struct ProxyState {
    pub pinterest: PinterestClient,
}

impl ProxyState {
    pub fn new(pinterest: PinterestClient) -> Self {
        Self { pinterest }
    }
}

/// Build the proxy router
pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route(PROXY_PATH, any(handle_request))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind and serve the proxy until Ctrl-C
pub async fn serve(config: &Config, addr: SocketAddr) -> Result<()> {
    let pinterest = PinterestClient::new(&config.pinterest)?;
    let app = build_router(ProxyState::new(pinterest));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, upstream = %config.pinterest.api_base, "Pinterest proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down proxy");
        })
        .await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_request(
    State(state): State<Arc<ProxyState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return cors_response(StatusCode::NO_CONTENT, None);
    }

    if method != Method::POST {
        return cors_response(
            StatusCode::METHOD_NOT_ALLOWED,
            Some(json!({ "error": "Method not allowed" })),
        );
    }

    let outcome = match serde_json::from_slice::<ProxyRequest>(&body) {
        Ok(request) => dispatch(&state.pinterest, request).await,
        Err(e) => Err(PinforgeError::from(e).into()),
    };

    match outcome {
        Ok((status, body)) => cors_response(status, Some(body)),
        Err(err) => {
            tracing::error!("API Error: {:#}", err);
            error_response(&err)
        }
    }
}

/// Run one proxy action against the upstream API
///
/// Returns the status and JSON body to relay. The access token is checked
/// before the action is looked at, so nothing reaches the upstream API
/// without one.
pub async fn dispatch(
    pinterest: &PinterestClient,
    request: ProxyRequest,
) -> Result<(StatusCode, Value)> {
    let access_token = request
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PinforgeError::MissingField("Missing Access Token".to_string()))?;

    let action = request.action.unwrap_or_default();
    match ProxyAction::parse(&action) {
        Some(ProxyAction::GetBoards) => {
            let upstream = pinterest.list_boards(&access_token).await?;
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
            Ok((status, upstream.body))
        }
        Some(ProxyAction::CreatePin) => {
            let pin_data = request.pin_data.unwrap_or_default();
            let created = pinterest
                .publish(&access_token, request.board_id.as_deref(), &pin_data)
                .await?;
            Ok((StatusCode::CREATED, json!({ "success": true, "data": created })))
        }
        None => Err(PinforgeError::UnknownAction(action).into()),
    }
}

/// Map an error to the proxy's `{error}` response
fn error_response(err: &anyhow::Error) -> Response {
    let (status, message) = match err.downcast_ref::<PinforgeError>() {
        Some(pf) => (
            StatusCode::from_u16(pf.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            pf.to_string(),
        ),
        None => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    cors_response(status, Some(json!({ "error": message })))
}

fn cors_response(status: StatusCode, body: Option<Value>) -> Response {
    let mut response = match body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
