//! Prompts for the generative text model
//!
//! This module builds the pin-strategy prompt sent with each blog post and the
//! JSON schema the model's structured output must follow.

pub mod strategy_prompt;

pub use strategy_prompt::{generate_strategy_prompt, strategy_response_schema, SYSTEM_INSTRUCTION};

/// Builds the full prompt for a strategy request
///
/// # Arguments
///
/// * `title` - Blog post title
/// * `summary` - Blog post summary or body text
/// * `concept_count` - Number of pin concepts requested
///
/// # Examples
///
/// ```
/// use pinforge::prompts::build_strategy_prompt;
///
/// let prompt = build_strategy_prompt("Cozy Setups", "Warm lighting ideas", 3);
/// assert!(prompt.contains("Cozy Setups"));
/// assert!(prompt.contains("Create 3 distinct"));
/// ```
pub fn build_strategy_prompt(title: &str, summary: &str, concept_count: usize) -> String {
    generate_strategy_prompt(title.trim(), summary.trim(), concept_count)
}
