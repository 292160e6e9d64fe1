//! HTTP client for the Pinterest v5 REST API
//!
//! Every call is single-shot: a non-success status becomes a
//! [`PinforgeError::Upstream`] carrying the upstream status and body, and
//! nothing is retried.

use crate::config::PinterestConfig;
use crate::error::{PinforgeError, Result};
use crate::pinterest::types::{CreatePinPayload, PinData, RegisterMediaRequest, UploadSession};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Status and JSON body of an upstream response, relayed verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

/// Pinterest API client
///
/// # Examples
///
/// ```
/// use pinforge::config::PinterestConfig;
/// use pinforge::pinterest::PinterestClient;
///
/// let client = PinterestClient::new(&PinterestConfig::default());
/// assert!(client.is_ok());
/// ```
#[derive(Clone)]
pub struct PinterestClient {
    client: Client,
    api_base: String,
}

impl PinterestClient {
    /// Create a new client for the configured API base
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &PinterestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("pinforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PinforgeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET /boards` with the caller's token
    ///
    /// On success the upstream body and status are returned unchanged.
    pub async fn list_boards(&self, access_token: &str) -> Result<UpstreamResponse> {
        let url = format!("{}/boards", self.api_base);
        tracing::debug!("Fetching boards from {}", url);

        let response = self.client.get(&url).bearer_auth(access_token).send().await?;
        let (status, body) = read_json(response).await;

        if !(200..300).contains(&status) {
            tracing::error!("Pinterest boards request failed with {}", status);
            return Err(PinforgeError::Upstream {
                status,
                message: format!("Pinterest API Error ({}): {}", status, body),
            }
            .into());
        }

        Ok(UpstreamResponse { status, body })
    }

    /// Register an image upload and return the pre-signed upload session
    pub async fn register_media(&self, access_token: &str) -> Result<UploadSession> {
        let url = format!("{}/media", self.api_base);
        tracing::debug!("Registering media upload at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&RegisterMediaRequest { media_type: "image" })
            .send()
            .await?;
        let (status, body) = read_json(response).await;

        if !(200..300).contains(&status) {
            tracing::error!("Media registration failed with {}", status);
            return Err(PinforgeError::Upstream {
                status,
                message: format!("Media Register Failed: {}", body),
            }
            .into());
        }

        UploadSession::from_response(&body).ok_or_else(|| {
            PinforgeError::MissingField(format!(
                "Media Register Failed: response missing media_id or upload_url: {}",
                body
            ))
            .into()
        })
    }

    /// Upload image bytes to the pre-signed target
    ///
    /// The multipart body carries every upload parameter in the order the
    /// API returned them, followed by the `file` part typed `image/png`.
    /// No authorization header is sent; the signed fields are the only auth.
    pub async fn upload_media(&self, session: &UploadSession, image: Vec<u8>) -> Result<()> {
        let form = upload_form(session, image)?;

        tracing::debug!(media_id = %session.media_id, "Uploading media to pre-signed target");
        let response = self
            .client
            .post(&session.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(media_id = %session.media_id, "Media upload failed with {}", status);
            return Err(PinforgeError::UploadFailed {
                status: status.as_u16(),
            }
            .into());
        }

        Ok(())
    }

    /// `POST /pins` and return the created pin object
    pub async fn create_pin(&self, access_token: &str, payload: &CreatePinPayload) -> Result<Value> {
        let url = format!("{}/pins", self.api_base);
        tracing::debug!("Creating pin at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(payload)
            .send()
            .await?;
        let (status, body) = read_json(response).await;

        if !(200..300).contains(&status) {
            tracing::error!("Pin creation failed with {}", status);
            return Err(PinforgeError::Upstream {
                status,
                message: format!("Pin Creation Failed: {}", body),
            }
            .into());
        }

        Ok(body)
    }

    /// Run the full register -> upload -> create sequence
    ///
    /// Each step needs the previous one's output, so the calls run strictly
    /// in order and the first failure aborts the rest. Media uploaded before
    /// a failed pin creation stays orphaned upstream.
    pub async fn publish(
        &self,
        access_token: &str,
        board_id: Option<&str>,
        pin: &PinData,
    ) -> Result<Value> {
        let image_base64 = pin
            .image_base64
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PinforgeError::MissingField("Missing image data".to_string()))?;
        let image = decode_image(image_base64)?;

        let session = self.register_media(access_token).await?;
        tracing::info!(media_id = %session.media_id, "Registered media upload");

        self.upload_media(&session, image).await?;
        tracing::info!(media_id = %session.media_id, "Uploaded media");

        let payload = CreatePinPayload::new(pin, board_id, &session.media_id);
        let created = self.create_pin(access_token, &payload).await?;
        tracing::info!(media_id = %session.media_id, "Created pin");

        Ok(created)
    }
}

/// Build the multipart body for a pre-signed upload
fn upload_form(session: &UploadSession, image: Vec<u8>) -> Result<Form> {
    let mut form = Form::new();
    for (key, value) in session.form_fields() {
        form = form.text(key, value);
    }

    let file = Part::bytes(image)
        .file_name("blob")
        .mime_str("image/png")?;
    Ok(form.part("file", file))
}

/// Decode a base64 image payload, tolerating a `data:` URL prefix
pub fn decode_image(payload: &str) -> Result<Vec<u8>> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(PinforgeError::from)?;
    Ok(bytes)
}

/// Read a response body as JSON, keeping non-JSON bodies as a string
async fn read_json(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, body)
}
