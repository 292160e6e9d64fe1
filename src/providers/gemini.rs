//! Gemini provider implementation for Pinforge
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`)
//! for both the structured pin strategy and the pin image.

use crate::config::ProviderConfig;
use crate::error::{PinforgeError, Result};
use crate::models::PinConcept;
use crate::prompts::{build_strategy_prompt, strategy_response_schema, SYSTEM_INSTRUCTION};
use crate::providers::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Provider,
};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API provider
///
/// The API key is only checked when a generation is attempted, so the rest
/// of the CLI works without one.
///
/// # Examples
///
/// ```no_run
/// use pinforge::config::ProviderConfig;
/// use pinforge::providers::{GeminiProvider, Provider};
///
/// # async fn example() -> pinforge::error::Result<()> {
/// let config = ProviderConfig {
///     api_key: Some("my-key".to_string()),
///     ..Default::default()
/// };
/// let provider = GeminiProvider::new(config)?;
/// let concepts = provider.generate_strategy("Desk Tour", "A white setup").await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("pinforge/0.1.0")
            .build()
            .map_err(|e| PinforgeError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: text_model={}, image_model={}",
            config.text_model,
            config.image_model
        );

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PinforgeError::Provider(
                    "Missing API Key. Please set PINFORGE_API_KEY (or VITE_API_KEY) and retry."
                        .to_string(),
                )
                .into()
            })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.api_key()?;
        let url = self.endpoint(model);
        tracing::debug!("Sending Gemini request: model={}", model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                PinforgeError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(PinforgeError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            PinforgeError::Provider(format!("Failed to parse Gemini response: {}", e)).into()
        })
    }
}

/// Strip a Markdown code fence the model sometimes wraps JSON in
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_strategy(&self, title: &str, summary: &str) -> Result<Vec<PinConcept>> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(build_strategy_prompt(
                title,
                summary,
                self.config.concept_count,
            ))],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: strategy_response_schema(),
            }),
        };

        let response = self
            .generate_content(&self.config.text_model, &request)
            .await?;
        let text = response
            .text()
            .ok_or_else(|| PinforgeError::Provider("No data returned from Gemini".to_string()))?;

        let concepts: Vec<PinConcept> =
            serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
                PinforgeError::Provider(format!("Failed to parse pin strategy: {}", e))
            })?;
        tracing::info!("Generated {} pin concepts", concepts.len());
        Ok(concepts)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        };

        let response = self
            .generate_content(&self.config.image_model, &request)
            .await?;
        response
            .inline_data()
            .map(str::to_string)
            .ok_or_else(|| PinforgeError::Provider("No image generated.".to_string()).into())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
