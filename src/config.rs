use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::feed::{MarkerStyle, ThumbnailBase};

/// Main site configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// On-disk layout of the generated site
    #[serde(default)]
    pub site: SitePaths,
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Hero image generation configuration
    #[serde(default)]
    pub image: ImageConfig,
    /// Retry behavior for the generation call
    #[serde(default)]
    pub retry: RetryConfig,
    /// Index feed region configuration
    #[serde(default)]
    pub feed: FeedConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Where the site's files live, relative to `root`
#[derive(Debug, Deserialize, Clone)]
pub struct SitePaths {
    /// Site root directory
    #[serde(default = "default_root")]
    pub root: String,
    /// Shared landing page, must already exist
    #[serde(default = "default_index")]
    pub index: String,
    /// Directory receiving one HTML file per recipe
    #[serde(default = "default_articles_dir")]
    pub articles_dir: String,
    /// Directory receiving hero images
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    /// Directory holding article templates
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    /// Template file name inside `templates_dir`
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for SitePaths {
    fn default() -> Self {
        Self {
            root: default_root(),
            index: default_index(),
            articles_dir: default_articles_dir(),
            images_dir: default_images_dir(),
            templates_dir: default_templates_dir(),
            template: default_template(),
        }
    }
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4o-mini", "claude-3-5-haiku-latest")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for hero image generation
#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Whether to attempt a hero image at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Image model identifier
    #[serde(default = "default_image_model")]
    pub model: String,
    /// Sizes to try, in order, for each prompt variant
    #[serde(default = "default_image_sizes")]
    pub sizes: Vec<String>,
    /// API key (falls back to OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Base URL for the images endpoint
    pub base_url: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_image_model(),
            sizes: default_image_sizes(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for generation retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    /// Number of attempts before giving up
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,
    /// Initial delay between retries in milliseconds (grows with each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_retry_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for the index feed region
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeedConfig {
    /// Which marker tokens delimit the feed region
    #[serde(default)]
    pub markers: MarkerStyle,
    /// How card thumbnails reference the images directory
    #[serde(default)]
    pub thumbnails: ThumbnailBase,
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    // Zero-config runs talk to OpenAI with the key from the environment
    let mut providers = HashMap::new();
    providers.insert(
        "openai".to_string(),
        ProviderConfig {
            enabled: true,
            model: "gpt-4o-mini".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        },
    );
    providers
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_root() -> String {
    ".".to_string()
}

fn default_index() -> String {
    "index.html".to_string()
}

fn default_articles_dir() -> String {
    "articles".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_template() -> String {
    "template_cuisine.html".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_image_sizes() -> Vec<String> {
    vec![
        "1024x768".to_string(),
        "768x768".to_string(),
        "1200x800".to_string(),
    ]
}

impl SiteConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECETTES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECETTES__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECETTES__ prefix
/// 2. config.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECETTES__PROVIDERS__OPENAI__API_KEY
pub fn load_config() -> Result<SiteConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Environment variables with RECETTES prefix
        // Use double underscore for nested: RECETTES__PROVIDERS__OPENAI__API_KEY
        .add_source(
            Environment::with_prefix("RECETTES")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_temperature(), 0.7);
        assert_eq!(default_max_tokens(), 2000);
        assert_eq!(default_retry_attempts(), 3);
        assert_eq!(default_retry_delay_ms(), 1000);
        assert_eq!(default_image_model(), "gpt-image-1");
    }

    #[test]
    fn test_default_providers_map() {
        let providers = default_providers();
        assert_eq!(providers.len(), 1);
        let openai = providers.get("openai").unwrap();
        assert!(openai.enabled);
        assert_eq!(openai.model, "gpt-4o-mini");
        assert!(openai.api_key.is_none());
    }

    #[test]
    fn test_site_paths_default() {
        let paths = SitePaths::default();
        assert_eq!(paths.root, ".");
        assert_eq!(paths.index, "index.html");
        assert_eq!(paths.articles_dir, "articles");
        assert_eq!(paths.images_dir, "images");
        assert_eq!(paths.template, "template_cuisine.html");
    }

    #[test]
    fn test_retry_config_default() {
        let retry = RetryConfig::default();
        assert_eq!(retry.attempts, 3);
        assert_eq!(retry.delay_ms, 1000);
    }

    #[test]
    fn test_image_config_default() {
        let image = ImageConfig::default();
        assert!(image.enabled);
        assert_eq!(image.sizes.len(), 3);
        assert!(image.base_url.is_none());
    }

    #[test]
    fn test_feed_config_default() {
        let feed = FeedConfig::default();
        assert_eq!(feed.markers, MarkerStyle::Feed);
        assert_eq!(feed.thumbnails, ThumbnailBase::IndexRelative);
    }
}
