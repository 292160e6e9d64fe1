//! Configuration management for Pinforge
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{PinforgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Pinforge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative AI provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Upstream Pinterest API settings
    #[serde(default)]
    pub pinterest: PinterestConfig,
    /// Publish proxy settings
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Publish orchestrator settings
    #[serde(default)]
    pub publish: PublishConfig,
    /// Draft generation settings
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Generative AI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for the generative API; checked only when a generation runs
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the generative API (useful for tests and local mocks)
    #[serde(default = "default_provider_api_base")]
    pub api_base: String,

    /// Model used for pin strategy text
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for pin images
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Number of pin concepts requested per blog post
    #[serde(default = "default_concept_count")]
    pub concept_count: usize,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

fn default_provider_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_concept_count() -> usize {
    3
}

fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_provider_api_base(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            concept_count: default_concept_count(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

/// Upstream Pinterest API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinterestConfig {
    /// Base URL of the Pinterest v5 REST API
    #[serde(default = "default_pinterest_api_base")]
    pub api_base: String,

    /// Timeout for each upstream call in seconds
    #[serde(default = "default_pinterest_timeout")]
    pub timeout_seconds: u64,
}

fn default_pinterest_api_base() -> String {
    "https://api.pinterest.com/v5".to_string()
}

fn default_pinterest_timeout() -> u64 {
    30
}

impl Default for PinterestConfig {
    fn default() -> Self {
        Self {
            api_base: default_pinterest_api_base(),
            timeout_seconds: default_pinterest_timeout(),
        }
    }
}

/// Publish proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Address the `serve` command binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Endpoint callers use to reach the proxy
    #[serde(default = "default_proxy_endpoint")]
    pub endpoint: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_proxy_endpoint() -> String {
    "http://127.0.0.1:8787/api/pinterest".to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            endpoint: default_proxy_endpoint(),
        }
    }
}

/// Publish orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Destination link used when a pin has none
    #[serde(default = "default_link")]
    pub default_link: String,

    /// Delay before falling back to the manual path after an API failure
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,

    /// Delay before opening the pin builder on the manual path
    #[serde(default = "default_open_builder_delay_ms")]
    pub open_builder_delay_ms: u64,

    /// Pinterest pin-creation page opened on the manual path
    #[serde(default = "default_pin_builder_url")]
    pub pin_builder_url: String,

    /// Directory manual-path images are written to (defaults to the user's download dir)
    #[serde(default)]
    pub download_dir: Option<String>,
}

fn default_link() -> String {
    "https://gamingsetupaesthetic.blogspot.com".to_string()
}

fn default_fallback_delay_ms() -> u64 {
    2000
}

fn default_open_builder_delay_ms() -> u64 {
    1000
}

fn default_pin_builder_url() -> String {
    "https://www.pinterest.com/pin-builder/".to_string()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_link: default_link(),
            fallback_delay_ms: default_fallback_delay_ms(),
            open_builder_delay_ms: default_open_builder_delay_ms(),
            pin_builder_url: default_pin_builder_url(),
            download_dir: None,
        }
    }
}

/// Draft generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Board name used when the blog input names none
    #[serde(default = "default_board")]
    pub default_board: String,
}

fn default_board() -> String {
    "Gaming Aesthetic".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_board: default_board(),
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database path; the user's data directory is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from file, environment, and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        // VITE_API_KEY is an alias for the AI key
        if let Ok(key) = std::env::var("PINFORGE_API_KEY").or_else(|_| std::env::var("VITE_API_KEY")) {
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }

        if let Ok(base) = std::env::var("PINFORGE_PROVIDER_API_BASE") {
            self.provider.api_base = base;
        }

        if let Ok(model) = std::env::var("PINFORGE_TEXT_MODEL") {
            self.provider.text_model = model;
        }

        if let Ok(model) = std::env::var("PINFORGE_IMAGE_MODEL") {
            self.provider.image_model = model;
        }

        if let Ok(base) = std::env::var("PINFORGE_PINTEREST_API_BASE") {
            self.pinterest.api_base = base;
        }

        if let Ok(addr) = std::env::var("PINFORGE_PROXY_ADDR") {
            self.proxy.listen_addr = addr;
        }

        if let Ok(endpoint) = std::env::var("PINFORGE_PROXY_ENDPOINT") {
            self.proxy.endpoint = endpoint;
        }

        if let Ok(delay) = std::env::var("PINFORGE_FALLBACK_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.publish.fallback_delay_ms = value;
            } else {
                tracing::warn!("Invalid PINFORGE_FALLBACK_DELAY_MS: {}", delay);
            }
        }

        if let Ok(link) = std::env::var("PINFORGE_DEFAULT_LINK") {
            self.publish.default_link = link;
        }

        if let Ok(dir) = std::env::var("PINFORGE_DOWNLOAD_DIR") {
            self.publish.download_dir = Some(dir);
        }

        if let Ok(path) = std::env::var("PINFORGE_STORAGE_PATH") {
            self.storage.path = Some(path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any URL is malformed or a count/timeout is zero
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("provider.api_base", &self.provider.api_base),
            ("pinterest.api_base", &self.pinterest.api_base),
            ("proxy.endpoint", &self.proxy.endpoint),
            ("publish.default_link", &self.publish.default_link),
            ("publish.pin_builder_url", &self.publish.pin_builder_url),
        ];
        for (name, value) in urls {
            if url::Url::parse(value).is_err() {
                return Err(
                    PinforgeError::Config(format!("{} is not a valid URL: {}", name, value)).into(),
                );
            }
        }

        if self.proxy.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(PinforgeError::Config(format!(
                "proxy.listen_addr is not a socket address: {}",
                self.proxy.listen_addr
            ))
            .into());
        }

        if self.provider.concept_count == 0 {
            return Err(PinforgeError::Config(
                "provider.concept_count must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.timeout_seconds == 0 || self.pinterest.timeout_seconds == 0 {
            return Err(
                PinforgeError::Config("timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        Ok(())
    }
}
