use chrono::Utc;
use log::{info, warn};
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::error::PublishError;
use crate::feed::{FeedFragment, Injector};
use crate::image::HeroImageClient;
use crate::providers::{generate_with_retry, ProviderFactory};
use crate::render::{self, excerpt, RenderContext};
use crate::site::{article_names, SiteLayout};

/// What one publish run produced.
#[derive(Debug)]
pub struct PublishReport {
    pub article_path: PathBuf,
    pub image_path: Option<PathBuf>,
    pub index_path: PathBuf,
}

/// Run one full publish:
///
/// 1. Generates a structured recipe from the configured provider
///    (with retry)
/// 2. Generates a hero image, best effort
/// 3. Renders the article from the template and writes it
/// 4. Builds the summary card and injects it into the index feed region
/// 5. Writes the index back in one piece
///
/// # Errors
/// Fails when generation exhausts its retries, the record is invalid,
/// the template misses a placeholder, or the index has no usable feed
/// region anchor. A failed hero image is logged, not fatal.
pub async fn publish(config: &SiteConfig) -> Result<PublishReport, PublishError> {
    let layout = SiteLayout::new(&config.site);
    layout.ensure().await?;

    // 1. Structured recipe
    let provider = ProviderFactory::get_default_provider(config)
        .map_err(|e| PublishError::Provider(e.to_string()))?;
    let record = generate_with_retry(provider.as_ref(), &config.retry).await?;
    record.validate()?;
    info!("Generated recipe: {}", record.title);

    let now = Utc::now();
    let names = article_names(&record.title, now);

    // 2. Hero image, best effort
    let mut image_path = None;
    let mut hero_file = None;
    if config.image.enabled {
        match HeroImageClient::new(&config.image) {
            Ok(client) => {
                if let Some(bytes) = client
                    .generate(&record.title, record.keywords_or_default())
                    .await
                {
                    image_path = Some(layout.write_image(&names.hero_file, &bytes).await?);
                    hero_file = Some(names.hero_file.clone());
                }
            }
            Err(e) => warn!("Hero image client unavailable: {e}"),
        }
    }

    // 3. Article
    let stored_template = layout.load_template().await?;
    let template = stored_template
        .as_deref()
        .unwrap_or(render::FALLBACK_TEMPLATE);
    let ctx = RenderContext {
        article_file: names.article_file.clone(),
        hero_file: hero_file.clone(),
    };
    let article = render::render(&record, template, &ctx)?;
    let article_path = layout.write_article(&article.file_name, &article.html).await?;
    info!("Article written: {}", article_path.display());

    // 4. + 5. Summary card into the index
    let fragment = FeedFragment {
        article_ref: format!("articles/{}", article.file_name),
        title: record.title.clone(),
        excerpt: excerpt::make_excerpt(&render::strip_inline_refs(&record.intro)),
        thumbnail: hero_file,
        published: now,
    };
    let injector = Injector::new(config.feed.markers, config.feed.thumbnails);
    let index = layout.read_index().await?;
    let updated = injector.inject(&index, &fragment, now)?;
    layout.write_index(&updated).await?;
    info!("Index updated: {}", layout.index_path().display());

    Ok(PublishReport {
        article_path,
        image_path,
        index_path: layout.index_path().to_path_buf(),
    })
}
