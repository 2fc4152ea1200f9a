use crate::config::ProviderConfig;
use crate::model::RecipeRecord;
use crate::providers::{LlmProvider, RECIPE_PROMPT};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error>> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or("ANTHROPIC_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com".to_string());

        Ok(AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn generate_recipe(&self) -> Result<RecipeRecord, Box<dyn Error>> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {"role": "user", "content": RECIPE_PROMPT}
                ]
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["content"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Anthropic response")?;

        Ok(RecipeRecord::from_model_output(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_generate_recipe() {
        let mut server = Server::new_async().await;
        let body = serde_json::json!({
            "content": [{"text": r#"{
                "title": "Soupe miso express",
                "intro": "Réconfortante et prête en dix minutes.",
                "ingredients_2": ["2 c. à s. de miso", "100 g de tofu"],
                "ingredients_3": ["3 c. à s. de miso", "150 g de tofu"],
                "ingredients_4": ["4 c. à s. de miso", "200 g de tofu"],
                "steps": ["Chauffer le bouillon.", "Diluer le miso."],
                "image_keywords": "miso soup, tofu, scallions"
            }"#}]
        })
        .to_string();

        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let provider = AnthropicProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "claude-3-5-haiku-latest".to_string(),
        );

        let record = provider.generate_recipe().await.unwrap();
        assert_eq!(record.title, "Soupe miso express");
        assert_eq!(record.steps.len(), 2);
        mock.assert();
    }

    #[tokio::test]
    async fn test_provider_name() {
        let provider = AnthropicProvider::with_base_url(
            "fake_api_key".to_string(),
            "http://localhost".to_string(),
            "claude-3-5-haiku-latest".to_string(),
        );
        assert_eq!(provider.provider_name(), "anthropic");
    }
}
