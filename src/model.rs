use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Fallback keywords when the model omits `image_keywords`
const DEFAULT_IMAGE_KEYWORDS: &str = "asian noodles, chicken, glossy sauce, chopsticks";

/// One generated recipe, as returned by the strict-JSON generation prompt.
/// Immutable once validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub title: String,
    pub intro: String,
    #[serde(default)]
    pub ingredients_2: Vec<String>,
    #[serde(default)]
    pub ingredients_3: Vec<String>,
    #[serde(default)]
    pub ingredients_4: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub image_keywords: String,
}

impl RecipeRecord {
    /// Parse a model reply into a record.
    ///
    /// Models occasionally wrap the JSON in a Markdown code fence despite
    /// being told not to; the fence is stripped before parsing.
    pub fn from_model_output(raw: &str) -> Result<Self, PublishError> {
        let json = strip_code_fences(raw.trim());
        let record: RecipeRecord = serde_json::from_str(json)?;
        Ok(record)
    }

    /// Check the invariants every downstream consumer relies on:
    /// non-empty title, intro and steps, and one non-empty ingredient
    /// list per serving size.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.title.trim().is_empty() {
            return Err(PublishError::Validation("title is empty".to_string()));
        }
        if self.intro.trim().is_empty() {
            return Err(PublishError::Validation("intro is empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(PublishError::Validation("no steps".to_string()));
        }
        for (name, list) in [
            ("ingredients_2", &self.ingredients_2),
            ("ingredients_3", &self.ingredients_3),
            ("ingredients_4", &self.ingredients_4),
        ] {
            if list.is_empty() {
                return Err(PublishError::Validation(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// Keywords for the image prompt, with a sensible default when the
    /// model left them out.
    pub fn keywords_or_default(&self) -> &str {
        if self.image_keywords.trim().is_empty() {
            DEFAULT_IMAGE_KEYWORDS
        } else {
            &self.image_keywords
        }
    }
}

/// Remove a surrounding ```/```json fence, if any.
fn strip_code_fences(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    // drop the info string ("json") up to the first newline
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
