use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

use crate::config::ImageConfig;

/// Client for the hosted image-generation API, used for hero photos.
///
/// Generation is best-effort: each prompt variant is tried against each
/// configured size, and the first attempt that yields bytes wins. When
/// every attempt fails the article simply ships without a photo.
pub struct HeroImageClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    sizes: Vec<String>,
}

impl HeroImageClient {
    /// Create a new image client from configuration
    pub fn new(config: &ImageConfig) -> Result<Self, Box<dyn Error>> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(HeroImageClient {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            sizes: config.sizes.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        HeroImageClient {
            client: Client::new(),
            api_key,
            base_url,
            model,
            sizes: vec!["1024x768".to_string()],
        }
    }

    /// Generate a hero photo for the dish, or `None` when every attempt
    /// failed.
    pub async fn generate(&self, title: &str, keywords: &str) -> Option<Vec<u8>> {
        for prompt in prompt_variants(title, keywords) {
            for size in &self.sizes {
                match self.attempt(&prompt, size).await {
                    Ok(bytes) => {
                        info!("Hero image generated ({size}, {} bytes)", bytes.len());
                        return Some(bytes);
                    }
                    Err(e) => {
                        warn!("Image attempt failed ({size}): {e}");
                    }
                }
            }
        }
        warn!("Giving up on hero image for '{title}'");
        None
    }

    async fn attempt(&self, prompt: &str, size: &str) -> Result<Vec<u8>, Box<dyn Error>> {
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "size": size
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        let datum = &response_body["data"][0];

        if let Some(b64) = datum["b64_json"].as_str() {
            return Ok(STANDARD.decode(b64)?);
        }
        if let Some(url) = datum["url"].as_str() {
            debug!("Downloading generated image from returned URL");
            let bytes = self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            return Ok(bytes.to_vec());
        }

        Err("image response carried neither b64_json nor url".into())
    }
}

/// Prompt variants tried in order, most elaborate first.
fn prompt_variants(title: &str, keywords: &str) -> Vec<String> {
    vec![
        format!(
            "Food photography, high-end editorial, soft daylight, shallow depth of field. \
             Dish: {title}. Keywords: {keywords}. Serve on a beautiful plate, elegant cutlery \
             and chopsticks on side. Asian table setting, neutral background, appetizing, realistic."
        ),
        format!(
            "Professional food photo of {title}. Gorgeous plating, chopsticks, clean linen \
             napkin, restaurant quality."
        ),
    ]
}
