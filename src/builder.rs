use crate::config::{ProviderConfig, SiteConfig};
use crate::error::PublishError;
use crate::pipeline::{publish, PublishReport};

/// Optional LLM provider selection
#[derive(Debug, Clone)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
}

impl ProviderKind {
    /// Convert to the provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Model used when the caller does not name one
    fn default_model(&self) -> &str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
        }
    }
}

/// Builder for configuring and executing a publish run
#[derive(Debug, Default)]
pub struct SitePublisherBuilder {
    root: Option<String>,
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
    skip_image: bool,
}

impl SitePublisherBuilder {
    /// Set the site root directory (where `index.html` lives)
    ///
    /// # Example
    /// ```
    /// use recette_gen::SitePublisher;
    ///
    /// let builder = SitePublisher::builder()
    ///     .root("/srv/cuisine");
    /// ```
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set a custom LLM provider for generation
    ///
    /// # Example
    /// ```
    /// use recette_gen::{ProviderKind, SitePublisher};
    ///
    /// let builder = SitePublisher::builder()
    ///     .provider(ProviderKind::Anthropic);
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the LLM provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the LLM provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Publish without attempting a hero image
    pub fn skip_image(mut self) -> Self {
        self.skip_image = true;
        self
    }

    /// Build the effective configuration and execute the publish run
    ///
    /// # Example
    /// ```no_run
    /// # use recette_gen::SitePublisher;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let report = SitePublisher::builder()
    ///     .root("/srv/cuisine")
    ///     .skip_image()
    ///     .build()
    ///     .await?;
    /// println!("{}", report.article_path.display());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<PublishReport, PublishError> {
        let mut config = SiteConfig::load()?;

        if let Some(root) = self.root {
            config.site.root = root;
        }
        if let Some(provider) = &self.provider {
            config.default_provider = provider.as_str().to_string();
        }
        if self.skip_image {
            config.image.enabled = false;
        }

        // make sure the selected provider exists, then apply overrides
        let name = config.default_provider.clone();
        let entry = config
            .providers
            .entry(name)
            .or_insert_with(|| ProviderConfig {
                enabled: true,
                model: self
                    .provider
                    .as_ref()
                    .map(|p| p.default_model().to_string())
                    .unwrap_or_else(|| "gpt-4o-mini".to_string()),
                temperature: 0.7,
                max_tokens: 2000,
                api_key: None,
                base_url: None,
            });
        if let Some(key) = self.api_key {
            entry.api_key = Some(key);
        }
        if let Some(model) = self.model {
            entry.model = model;
        }

        publish(&config).await
    }
}

/// Main entry point for the builder API
pub struct SitePublisher;

impl SitePublisher {
    /// Creates a new builder for publish runs
    ///
    /// # Example
    /// ```
    /// use recette_gen::SitePublisher;
    ///
    /// let builder = SitePublisher::builder();
    /// ```
    pub fn builder() -> SitePublisherBuilder {
        SitePublisherBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_names() {
        assert_eq!(ProviderKind::OpenAI.as_str(), "openai");
        assert_eq!(ProviderKind::Anthropic.as_str(), "anthropic");
    }

    #[test]
    fn test_builder_accumulates_options() {
        let builder = SitePublisher::builder()
            .root("/tmp/site")
            .provider(ProviderKind::Anthropic)
            .api_key("k")
            .model("m")
            .skip_image();
        assert_eq!(builder.root.as_deref(), Some("/tmp/site"));
        assert!(builder.skip_image);
        assert_eq!(builder.model.as_deref(), Some("m"));
    }
}
