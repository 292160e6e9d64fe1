//! Domain records for Pinforge
//!
//! Pins, the connected Pinterest account and the inputs that drive draft
//! generation. Field names serialize in camelCase so persisted records keep
//! the same shape the dashboard has always stored.

use crate::error::{PinforgeError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication state of a pin
///
/// States only ever move forward: `draft -> scheduled -> published` or
/// `draft -> published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    /// Freshly generated, not yet scheduled or published
    #[default]
    Draft,
    /// Has a schedule date for display purposes
    Scheduled,
    /// Published via the API or the manual path
    Published,
}

impl PinStatus {
    fn rank(self) -> u8 {
        match self {
            PinStatus::Draft => 0,
            PinStatus::Scheduled => 1,
            PinStatus::Published => 2,
        }
    }

    /// Returns true if moving from `self` to `next` does not regress.
    ///
    /// Staying in the same state is allowed (re-scheduling a scheduled pin).
    pub fn can_transition_to(self, next: PinStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl fmt::Display for PinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PinStatus::Draft => "draft",
            PinStatus::Scheduled => "scheduled",
            PinStatus::Published => "published",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for PinStatus {
    type Err = PinforgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PinStatus::Draft),
            "scheduled" => Ok(PinStatus::Scheduled),
            "published" => Ok(PinStatus::Published),
            other => Err(PinforgeError::Config(format!("Unknown pin status: {}", other))),
        }
    }
}

/// One pin concept as returned by the generative text model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinConcept {
    pub title: String,
    pub description: String,
    pub alt_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_prompt: String,
}

/// One generated pin candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinSuggestion {
    /// Opaque unique identifier
    pub id: String,
    pub title: String,
    pub description: String,
    pub alt_text: String,
    /// Ordered tag strings
    #[serde(default)]
    pub tags: Vec<String>,
    /// Prompt used to generate the image
    pub image_prompt: String,
    /// Base64 encoded PNG, once generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_base64: Option<String>,
    /// ISO-8601 schedule timestamp, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<String>,
    #[serde(default)]
    pub status: PinStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_name: Option<String>,
}

impl PinSuggestion {
    /// Build a draft pin from a generated concept
    ///
    /// A fresh identifier is assigned and the status starts at `draft`.
    pub fn from_concept(
        concept: PinConcept,
        destination_link: Option<String>,
        board_name: Option<String>,
    ) -> Self {
        Self {
            id: new_pin_id(),
            title: concept.title,
            description: concept.description,
            alt_text: concept.alt_text,
            tags: concept.tags,
            image_prompt: concept.image_prompt,
            generated_image_base64: None,
            schedule_date: None,
            status: PinStatus::Draft,
            destination_link,
            board_name,
        }
    }

    /// Returns true if a non-empty image has been generated
    pub fn has_image(&self) -> bool {
        self.generated_image_base64
            .as_deref()
            .is_some_and(|img| !img.trim().is_empty())
    }

    /// Move the pin to `next`, refusing any regression
    pub fn advance_to(&mut self, next: PinStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(PinforgeError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        self.status = next;
        Ok(())
    }

    /// Set a schedule date and move the pin to `scheduled`
    ///
    /// The date must parse as RFC 3339 or as a local `YYYY-MM-DDTHH:MM[:SS]`
    /// timestamp. Published pins cannot be rescheduled.
    pub fn schedule(&mut self, date: &str) -> Result<()> {
        if parse_schedule_date(date).is_none() {
            return Err(PinforgeError::Config(format!("Invalid schedule date: {}", date)).into());
        }
        self.advance_to(PinStatus::Scheduled)?;
        self.schedule_date = Some(date.to_string());
        Ok(())
    }

    /// Mark the pin published
    ///
    /// Fails with [`PinforgeError::MissingImage`] if there is no image.
    pub fn mark_published(&mut self) -> Result<()> {
        if !self.has_image() {
            return Err(PinforgeError::MissingImage.into());
        }
        self.advance_to(PinStatus::Published)
    }

    /// Parsed schedule date, if present and valid
    pub fn schedule_time(&self) -> Option<DateTime<Utc>> {
        self.schedule_date.as_deref().and_then(parse_schedule_date)
    }

    /// Text block copied to the clipboard on the manual publish path
    pub fn clipboard_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.description)
    }
}

/// Parse an ISO-8601 schedule timestamp
///
/// Timestamps without an offset are treated as UTC.
pub fn parse_schedule_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Generate a new opaque pin identifier
pub fn new_pin_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

/// Blog post details that seed draft generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostInput {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub board_name: String,
}

/// Locally cached Pinterest account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinterestUser {
    pub username: String,
    pub avatar_url: String,
    #[serde(default)]
    pub boards: Vec<String>,
    #[serde(default)]
    pub auto_publish: bool,
    /// Bearer token for the Pinterest API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Default board identifier for API publishing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

impl PinterestUser {
    /// Build a connected user record
    pub fn connected(
        username: impl Into<String>,
        boards: Vec<String>,
        access_token: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            avatar_url: format!(
                "https://api.dicebear.com/9.x/initials/svg?seed={}",
                username
            ),
            username,
            boards,
            auto_publish: true,
            access_token: Some(access_token.into()),
            board_id: Some(board_id.into()),
        }
    }

    /// Token and board id, when both are present and non-empty
    pub fn api_credentials(&self) -> Option<(&str, &str)> {
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        let board = self.board_id.as_deref().filter(|b| !b.is_empty())?;
        Some((token, board))
    }
}

/// A Pinterest board as listed by the boards endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}
