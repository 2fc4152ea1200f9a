pub mod builder;
pub mod config;
pub mod error;
pub mod feed;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod site;
pub mod slug;

pub use builder::{ProviderKind, SitePublisher, SitePublisherBuilder};
pub use config::SiteConfig;
pub use error::PublishError;
pub use feed::{FeedFragment, Injector, MarkerStyle, ThumbnailBase};
pub use model::RecipeRecord;
pub use pipeline::{publish, PublishReport};
pub use render::{render, ArticleDocument, RenderContext};

/// Generate one recipe and publish it into the configured site.
///
/// Convenience wrapper over [`pipeline::publish`] with configuration
/// loaded from `config.toml` and `RECETTES`-prefixed environment
/// variables.
pub async fn publish_once() -> Result<PublishReport, PublishError> {
    let config = SiteConfig::load()?;
    pipeline::publish(&config).await
}
