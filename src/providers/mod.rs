//! Provider module for Pinforge
//!
//! This module contains the generative provider abstraction and the Gemini
//! implementation used for pin strategies and pin images.

pub mod base;
pub mod gemini;

pub use base::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, Provider,
};
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create the configured provider instance
///
/// # Errors
///
/// Returns error if provider initialization fails
///
/// # Examples
///
/// ```
/// use pinforge::config::ProviderConfig;
/// use pinforge::providers::create_provider;
///
/// let provider = create_provider(&ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    Ok(Box::new(GeminiProvider::new(config.clone())?))
}
