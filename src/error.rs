use thiserror::Error;

/// Errors that can occur while generating and publishing a recipe page
#[derive(Error, Debug)]
pub enum PublishError {
    /// Generated record is missing a required field or list
    #[error("Invalid recipe record: {0}")]
    Validation(String),

    /// Template is missing a required placeholder, or one survived substitution
    #[error("Template error: {0}")]
    Template(String),

    /// Index document cannot be safely mutated (no markers, no anchor)
    #[error("Index structure error: {0}")]
    Structure(String),

    /// Recipe generation failed after all retry attempts
    #[error("Generation failed: {0}")]
    Provider(String),

    /// HTTP request to an external API failed
    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model reply was not the strict JSON we asked for
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl PublishError {
    /// Whether another attempt against the provider could succeed.
    /// A malformed record aborts the run; a failed network call does not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::Fetch(_) | PublishError::Provider(_))
    }
}
