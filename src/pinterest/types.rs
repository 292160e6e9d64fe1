//! Wire types exchanged with the Pinterest v5 API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pin content supplied by the caller of `create_pin`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Base64 encoded image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

/// Result of registering a media upload
///
/// Lives only for the duration of one `create_pin` request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub media_id: String,
    pub upload_url: String,
    /// Signing fields for the storage endpoint, in the order the API sent them
    pub upload_parameters: Map<String, Value>,
}

impl UploadSession {
    /// Extract a session from the registration response body
    ///
    /// Returns `None` when `media_id` or `upload_url` is missing.
    pub fn from_response(body: &Value) -> Option<Self> {
        let media_id = body.get("media_id").and_then(value_as_string)?;
        let upload_url = body.get("upload_url").and_then(Value::as_str)?.to_string();
        let upload_parameters = body
            .get("upload_parameters")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Some(Self {
            media_id,
            upload_url,
            upload_parameters,
        })
    }

    /// Upload parameters as multipart text fields, order preserved
    ///
    /// Non-string values are sent in their JSON form, so `null` goes out as
    /// `"null"`.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.upload_parameters
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Body of `POST /media`
#[derive(Debug, Serialize)]
pub(crate) struct RegisterMediaRequest {
    pub media_type: &'static str,
}

/// Body of `POST /pins`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePinPayload {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    pub media_source: MediaSource,
}

/// Media reference inside [`CreatePinPayload`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSource {
    pub source_type: &'static str,
    pub cover_image_id: String,
    pub media_id: String,
}

impl CreatePinPayload {
    /// Build the pin payload referencing an uploaded media id
    pub fn new(pin: &PinData, board_id: Option<&str>, media_id: &str) -> Self {
        Self {
            title: pin.title.clone(),
            description: pin.description.clone(),
            link: pin.link.clone(),
            board_id: board_id.map(str::to_string),
            media_source: MediaSource {
                source_type: "media_id",
                cover_image_id: media_id.to_string(),
                media_id: media_id.to_string(),
            },
        }
    }
}
