mod injector;

pub use injector::{Injector, FEED_END, FEED_START, LEGACY_MARKER};

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use std::path::Path;

/// Which marker tokens delimit the feed region of the index page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// `<!-- FEED:start -->` / `<!-- FEED:end -->`
    #[default]
    Feed,
    /// Legacy single token `<!--RECIPES-->`, normalized to the pair on
    /// first injection
    Recipes,
}

/// How card thumbnails reference the images directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailBase {
    /// `images/foo.jpg` — resolved relative to the index page
    #[default]
    IndexRelative,
    /// `/images/foo.jpg` — resolved from the site root
    SiteRoot,
}

impl ThumbnailBase {
    pub fn image_src(&self, file: &str) -> String {
        match self {
            ThumbnailBase::IndexRelative => format!("images/{file}"),
            ThumbnailBase::SiteRoot => format!("/images/{file}"),
        }
    }
}

/// A summary card for one article, created fresh on every run.
#[derive(Debug, Clone)]
pub struct FeedFragment {
    /// Navigable link target, e.g. `articles/2025-08-05-bo-bun.html`
    pub article_ref: String,
    pub title: String,
    pub excerpt: String,
    /// Hero image file name, when one exists
    pub thumbnail: Option<String>,
    pub published: DateTime<Utc>,
}

impl FeedFragment {
    /// Deterministic identity: the article reference's final path
    /// segment, extension-free. Two fragments for the same article
    /// always share a key.
    pub fn key(&self) -> String {
        Path::new(&self.article_ref)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.article_ref.clone())
    }

    /// Serialize the card markup inserted into the feed region.
    pub fn to_html(&self, thumbnails: ThumbnailBase) -> String {
        let alt = format!("Photo de {}", self.title);
        let thumb = match &self.thumbnail {
            Some(file) => format!(
                r#"<img src="{}" alt="{}">"#,
                thumbnails.image_src(file),
                encode_double_quoted_attribute(&alt)
            ),
            None => concat!(
                r#"<div style="aspect-ratio:4/3;border:1px solid rgba(255,255,255,.12);"#,
                r#"background:rgba(255,255,255,.05)"></div>"#
            )
            .to_string(),
        };

        format!(
            r#"<!-- card-{key} -->
<a class="card" href="{href}">
  <figure>
    {thumb}
    <figcaption>
      <div class="title">{title}</div>
      <p class="excerpt">{excerpt}</p>
      <div class="date">{date}</div>
    </figcaption>
  </figure>
</a>"#,
            key = self.key(),
            href = self.article_ref,
            thumb = thumb,
            title = encode_text(&self.title),
            excerpt = encode_text(&self.excerpt),
            date = self.published.format("%d/%m/%Y"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fragment() -> FeedFragment {
        FeedFragment {
            article_ref: "articles/2025-08-05-bo-bun.html".to_string(),
            title: "Bo bun".to_string(),
            excerpt: "Frais et complet, prêt en trente minutes.".to_string(),
            thumbnail: Some("2025-08-05-bo-bun-hero.jpg".to_string()),
            published: Utc.with_ymd_and_hms(2025, 8, 5, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_key_is_extension_free_stem() {
        assert_eq!(fragment().key(), "2025-08-05-bo-bun");
    }

    #[test]
    fn test_same_reference_same_key() {
        let a = fragment();
        let mut b = fragment();
        b.title = "Autre titre".to_string();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_card_markup() {
        let html = fragment().to_html(ThumbnailBase::IndexRelative);
        assert!(html.starts_with("<!-- card-2025-08-05-bo-bun -->"));
        assert!(html.contains(r#"href="articles/2025-08-05-bo-bun.html""#));
        assert!(html.contains(r#"src="images/2025-08-05-bo-bun-hero.jpg""#));
        assert!(html.contains("05/08/2025"));
        assert!(html.ends_with("</a>"));
    }

    #[test]
    fn test_card_markup_site_root_thumbnails() {
        let html = fragment().to_html(ThumbnailBase::SiteRoot);
        assert!(html.contains(r#"src="/images/2025-08-05-bo-bun-hero.jpg""#));
    }

    #[test]
    fn test_card_markup_placeholder_without_thumbnail() {
        let mut card = fragment();
        card.thumbnail = None;
        let html = card.to_html(ThumbnailBase::IndexRelative);
        assert!(html.contains("aspect-ratio:4/3"));
        assert!(!html.contains("<img"));
    }
}
