//! Draft generation and pin editing
//!
//! Turns a blog post into draft pins through a [`Provider`], and applies the
//! in-place edits the dashboard offers: image (re)generation, field edits and
//! scheduling. Every change goes through the [`PinRepository`].

use crate::config::GeneratorConfig;
use crate::error::{PinforgeError, Result};
use crate::models::{BlogPostInput, PinSuggestion};
use crate::providers::Provider;
use crate::storage::PinRepository;

/// Field edits for an existing pin; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct PinEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_text: Option<String>,
    pub tags: Option<Vec<String>>,
    pub destination_link: Option<String>,
    pub board_name: Option<String>,
}

impl PinEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.alt_text.is_none()
            && self.tags.is_none()
            && self.destination_link.is_none()
            && self.board_name.is_none()
    }

    fn apply(self, pin: &mut PinSuggestion) {
        if let Some(title) = self.title {
            pin.title = title;
        }
        if let Some(description) = self.description {
            pin.description = description;
        }
        if let Some(alt_text) = self.alt_text {
            pin.alt_text = alt_text;
        }
        if let Some(tags) = self.tags {
            pin.tags = tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(link) = self.destination_link {
            pin.destination_link = non_empty(link);
        }
        if let Some(board) = self.board_name {
            pin.board_name = non_empty(board);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Generate draft pins for a blog post and persist them
///
/// Each concept becomes a `draft` pin with a fresh id. The destination link
/// is the post url, and the board falls back to the configured default.
///
/// # Errors
///
/// Returns error if the title or summary is empty, the provider fails or
/// the pins cannot be saved
pub async fn generate_drafts(
    provider: &dyn Provider,
    repo: &PinRepository,
    input: &BlogPostInput,
    config: &GeneratorConfig,
) -> Result<Vec<PinSuggestion>> {
    if input.title.trim().is_empty() || input.summary.trim().is_empty() {
        return Err(PinforgeError::MissingField(
            "A blog title and summary are required".to_string(),
        )
        .into());
    }

    let board = non_empty(input.board_name.clone()).unwrap_or_else(|| config.default_board.clone());
    let link = non_empty(input.url.clone());

    tracing::info!(provider = provider.name(), "Generating pin strategy for '{}'", input.title);
    let concepts = provider
        .generate_strategy(&input.title, &input.summary)
        .await?;

    let drafts: Vec<PinSuggestion> = concepts
        .into_iter()
        .map(|concept| PinSuggestion::from_concept(concept, link.clone(), Some(board.clone())))
        .collect();

    repo.upsert_many(drafts.clone())?;
    tracing::info!("Saved {} draft pins", drafts.len());
    Ok(drafts)
}

/// Generate (or regenerate) the image of a stored pin
///
/// The pin is left unchanged if generation fails.
pub async fn generate_pin_image(
    provider: &dyn Provider,
    repo: &PinRepository,
    pin_id: &str,
) -> Result<PinSuggestion> {
    let pin = repo.require(pin_id)?;
    tracing::info!(pin = %pin.id, "Generating pin image");

    let image = provider.generate_image(&pin.image_prompt).await.map_err(|e| {
        tracing::warn!(pin = %pin.id, "Image generation failed: {:#}", e);
        e
    })?;

    repo.update(pin_id, |pin| {
        pin.generated_image_base64 = Some(image);
        Ok(())
    })
}

/// Set a pin's schedule date, moving it to `scheduled`
///
/// Published pins are refused and stay unchanged.
pub fn schedule_pin(repo: &PinRepository, pin_id: &str, date: &str) -> Result<PinSuggestion> {
    let pin = repo.update(pin_id, |pin| pin.schedule(date))?;
    tracing::info!(pin = %pin.id, date, "Pin scheduled");
    Ok(pin)
}

/// Apply field edits to a stored pin
pub fn edit_pin(repo: &PinRepository, pin_id: &str, edit: PinEdit) -> Result<PinSuggestion> {
    repo.update(pin_id, |pin| {
        edit.apply(pin);
        Ok(())
    })
}
