//! Pin strategy prompt
//!
//! Asks the text model for a set of distinct pin concepts for one blog post,
//! each with a detailed image prompt suitable for the image model.

use serde_json::{json, Value};

/// System instruction sent with every strategy request
pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert social media manager specializing in gaming aesthetics.";

/// Angles used for the first concepts, in order
const CONCEPT_ANGLES: [&str; 3] = [
    "One focused on \"Inspiration\".",
    "One focused on \"Tips/How-to\" or \"Checklist\".",
    "One focused on \"Aesthetic/Vibe\".",
];

/// Generates the strategy prompt for a blog post
///
/// When more concepts are requested than there are named angles, the extra
/// concepts are left to the model.
///
/// # Examples
///
/// ```
/// use pinforge::prompts::strategy_prompt::generate_strategy_prompt;
///
/// let prompt = generate_strategy_prompt("Desk Tour", "A minimal white setup", 3);
/// assert!(prompt.contains("Inspiration"));
/// ```
pub fn generate_strategy_prompt(title: &str, summary: &str, concept_count: usize) -> String {
    let angles = CONCEPT_ANGLES
        .iter()
        .take(concept_count)
        .enumerate()
        .map(|(i, angle)| format!("{}. {}", i + 1, angle))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a Pinterest Marketing Expert for a Gaming Setup Aesthetic blog.

Blog Post Title: {title}
Blog Summary/Content: {summary}

Create {concept_count} distinct Pinterest Pin concepts for this post.
{angles}

Ensure the "imagePrompt" is highly detailed, specifying lighting (neon, soft), colors, camera angles, and objects (RGB keyboards, monitors, plants) suitable for a vertical AI-generated image.
"#
    )
}

/// JSON schema for the model's structured response
///
/// An array of objects carrying `title`, `description`, `altText`, `tags` and
/// `imagePrompt`, all required.
pub fn strategy_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "Catchy Pinterest title" },
                "description": {
                    "type": "STRING",
                    "description": "SEO optimized description with keywords"
                },
                "altText": {
                    "type": "STRING",
                    "description": "Accessibility text describing the visual"
                },
                "tags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "5-10 relevant hashtags"
                },
                "imagePrompt": {
                    "type": "STRING",
                    "description": "A highly detailed prompt for an AI image generator to create a vertical aesthetic gaming setup image. Mention lighting, colors, and specific objects."
                }
            },
            "required": ["title", "description", "altText", "tags", "imagePrompt"]
        }
    })
}
