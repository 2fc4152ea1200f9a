use chrono::{DateTime, Utc};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::SitePaths;
use crate::error::PublishError;
use crate::slug;

/// Resolved on-disk layout of the generated site.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    index: PathBuf,
    articles: PathBuf,
    images: PathBuf,
    templates: PathBuf,
    template: PathBuf,
}

impl SiteLayout {
    pub fn new(paths: &SitePaths) -> Self {
        let root = PathBuf::from(&paths.root);
        let templates = root.join(&paths.templates_dir);
        SiteLayout {
            index: root.join(&paths.index),
            articles: root.join(&paths.articles_dir),
            images: root.join(&paths.images_dir),
            template: templates.join(&paths.template),
            templates,
        }
    }

    /// Create the content directories. The index page itself must
    /// pre-exist: without it there is nothing to inject into.
    pub async fn ensure(&self) -> Result<(), PublishError> {
        if fs::metadata(&self.index).await.is_err() {
            return Err(PublishError::Structure(format!(
                "index page not found at {}",
                self.index.display()
            )));
        }
        fs::create_dir_all(&self.articles).await?;
        fs::create_dir_all(&self.images).await?;
        fs::create_dir_all(&self.templates).await?;
        Ok(())
    }

    pub fn index_path(&self) -> &Path {
        &self.index
    }

    /// The configured template, or `None` when the file does not exist
    /// (the embedded fallback is used instead).
    pub async fn load_template(&self) -> Result<Option<String>, PublishError> {
        match fs::read_to_string(&self.template).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No template at {}, using the embedded one", self.template.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn read_index(&self) -> Result<String, PublishError> {
        Ok(fs::read_to_string(&self.index).await?)
    }

    /// Whole-file rewrite through a scoped handle with an explicit
    /// flush and sync, so an interrupted run never leaves a truncated
    /// index behind unnoticed.
    pub async fn write_index(&self, contents: &str) -> Result<(), PublishError> {
        let mut file = fs::File::create(&self.index).await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    pub async fn write_article(&self, name: &str, html: &str) -> Result<PathBuf, PublishError> {
        let path = self.articles.join(name);
        fs::write(&path, html).await?;
        Ok(path)
    }

    pub async fn write_image(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, PublishError> {
        let path = self.images.join(name);
        fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Date-prefixed file names shared by an article and its hero image.
#[derive(Debug, Clone)]
pub struct ArticleNames {
    pub slug: String,
    pub article_file: String,
    pub hero_file: String,
}

pub fn article_names(title: &str, now: DateTime<Utc>) -> ArticleNames {
    let slug = slug::article_slug(title, now.date_naive());
    ArticleNames {
        article_file: format!("{slug}.html"),
        hero_file: format!("{slug}-hero.jpg"),
        slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_article_names_share_stem() {
        let now = Utc.with_ymd_and_hms(2025, 8, 5, 10, 0, 0).unwrap();
        let names = article_names("Nouilles au poulet", now);
        assert_eq!(names.slug, "2025-08-05-nouilles-au-poulet");
        assert_eq!(names.article_file, "2025-08-05-nouilles-au-poulet.html");
        assert_eq!(names.hero_file, "2025-08-05-nouilles-au-poulet-hero.jpg");
    }

    #[tokio::test]
    async fn test_ensure_requires_index() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SitePaths {
            root: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let layout = SiteLayout::new(&paths);

        let err = layout.ensure().await.unwrap_err();
        assert!(matches!(err, PublishError::Structure(_)));

        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        layout.ensure().await.unwrap();
        assert!(dir.path().join("articles").is_dir());
        assert!(dir.path().join("images").is_dir());
    }

    #[tokio::test]
    async fn test_index_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "avant").unwrap();
        let paths = SitePaths {
            root: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let layout = SiteLayout::new(&paths);

        assert_eq!(layout.read_index().await.unwrap(), "avant");
        layout.write_index("après").await.unwrap();
        assert_eq!(layout.read_index().await.unwrap(), "après");
    }
}
