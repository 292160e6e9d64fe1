//! Base provider trait and wire types for Pinforge
//!
//! This module defines the Provider trait that generative backends implement,
//! along with the request and response shapes of the `generateContent` REST
//! call used by the Gemini implementation.

use crate::error::Result;
use crate::models::PinConcept;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generative backend used to draft pins
///
/// # Examples
///
/// ```no_run
/// use pinforge::providers::Provider;
/// use pinforge::models::PinConcept;
/// use pinforge::error::Result;
/// use async_trait::async_trait;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl Provider for FixedProvider {
///     async fn generate_strategy(&self, _title: &str, _summary: &str) -> Result<Vec<PinConcept>> {
///         Ok(Vec::new())
///     }
///
///     async fn generate_image(&self, _prompt: &str) -> Result<String> {
///         Ok("iVBORw0KGgo=".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate pin concepts for one blog post
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing, the call fails or the model
    /// returns no usable JSON
    async fn generate_strategy(&self, title: &str, summary: &str) -> Result<Vec<PinConcept>>;

    /// Generate one image for `prompt`, returned as base64 PNG data
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or the response carries no image
    async fn generate_image(&self, prompt: &str) -> Result<String>;

    /// Short provider name used in logs
    fn name(&self) -> &str {
        "unknown"
    }
}

/// One text or inline-data part of a content block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

/// Binary payload embedded in a response part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// A role-tagged list of parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single-part user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

/// Structured-output settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// Body of a `generateContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One response candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Response of a `generateContent` call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline data payload of the first candidate
    pub fn inline_data(&self) -> Option<&str> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
            .find(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hello")],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text("be brief")],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({"type": "ARRAY"}),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_response_inline_data_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [
                {"text": "Here is your image"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.inline_data(), Some("iVBORw0KGgo="));
    }

    #[test]
    fn test_empty_response_has_nothing() {
        let response = GenerateContentResponse::default();
        assert!(response.text().is_none());
        assert!(response.inline_data().is_none());
    }
}
