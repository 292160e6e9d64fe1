use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use pinforge::config::PinterestConfig;
use pinforge::pinterest::PinterestClient;
use pinforge::proxy::{build_router, ProxyState, PROXY_PATH};
use pinforge::storage::SqliteStorage;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

/// Ten bytes of image data, base64 encoded
#[allow(dead_code)]
pub const TEN_BYTE_IMAGE: &str = "AAECAwQFBgcICQ==";

#[allow(dead_code)]
pub fn create_temp_storage() -> (SqliteStorage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("pinforge.db");
    let storage =
        SqliteStorage::new_with_path(db_path).expect("failed to create sqlite storage with path");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Proxy router whose upstream Pinterest API lives at `{upstream}/v5`
#[allow(dead_code)]
pub fn proxy_router(upstream: &str) -> Router {
    let pinterest = PinterestClient::new(&PinterestConfig {
        api_base: format!("{}/v5", upstream),
        timeout_seconds: 5,
    })
    .expect("failed to build pinterest client");
    build_router(ProxyState::new(pinterest))
}

/// Send one request to the proxy endpoint and return (status, headers, JSON body)
///
/// An empty body comes back as `Value::Null`.
#[allow(dead_code)]
pub async fn call_proxy(
    router: Router,
    method: Method,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(PROXY_PATH)
        .header("content-type", "application/json")
        .body(body)
        .expect("failed to build request");

    let response = router.oneshot(request).await.expect("router failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is not JSON")
    };
    (status, headers, json)
}
