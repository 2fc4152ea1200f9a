mod anthropic;
mod factory;
mod open_ai;
mod prompt;
mod retry;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;
pub use prompt::RECIPE_PROMPT;
pub use retry::generate_with_retry;

use async_trait::async_trait;
use std::error::Error;

use crate::model::RecipeRecord;

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Ask the model for one recipe and parse its strict-JSON reply
    async fn generate_recipe(&self) -> Result<RecipeRecord, Box<dyn Error>>;
}
