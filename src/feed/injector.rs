use chrono::{DateTime, Utc};
use log::debug;
use std::ops::Range;

use crate::error::PublishError;
use crate::feed::{FeedFragment, MarkerStyle, ThumbnailBase};

pub const FEED_START: &str = "<!-- FEED:start -->";
pub const FEED_END: &str = "<!-- FEED:end -->";
/// Single-token marker used by older index layouts
pub const LEGACY_MARKER: &str = "<!--RECIPES-->";

/// Opening tag of the primary listing container, the bootstrap anchor
/// when the index carries no markers yet.
const ANCHOR_TAG: &str = "<main";

const STAMP_LABEL: &str = "automated-build";
const CARD_OPEN: &str = "<a class=\"card\"";
const CARD_CLOSE: &str = "</a>";
const KEY_COMMENT_OPEN: &str = "<!-- card-";

/// Rewrites the site index around a marker-delimited feed region.
///
/// Everything outside the region is preserved byte-for-byte (apart from
/// the audit trailer appended at the very end); inside it, at most one
/// card exists per article reference, newest first.
#[derive(Debug, Clone)]
pub struct Injector {
    markers: MarkerStyle,
    thumbnails: ThumbnailBase,
}

impl Injector {
    pub fn new(markers: MarkerStyle, thumbnails: ThumbnailBase) -> Self {
        Injector {
            markers,
            thumbnails,
        }
    }

    /// Single-pass injection against an in-memory copy; the caller
    /// persists the returned text.
    ///
    /// 1. Locate the marker pair, or bootstrap one after the listing
    ///    container's opening tag.
    /// 2. Drop any existing card for the same article reference.
    /// 3. Insert the new card immediately after the start marker.
    /// 4. Append the audit trailer.
    pub fn inject(
        &self,
        index: &str,
        fragment: &FeedFragment,
        now: DateTime<Utc>,
    ) -> Result<String, PublishError> {
        let (mut doc, region) = self.locate_or_bootstrap(index)?;

        let body = remove_card_for(&doc[region.clone()], &fragment.article_ref);
        let card = fragment.to_html(self.thumbnails);

        let mut rebuilt = String::with_capacity(card.len() + body.len() + 1);
        rebuilt.push('\n');
        rebuilt.push_str(&card);
        rebuilt.push_str(&body);
        doc.replace_range(region, &rebuilt);

        doc.push_str(&format!(
            "\n<!-- {} {} -->\n",
            STAMP_LABEL,
            now.format("%Y-%m-%d %H:%M:%S %z")
        ));
        Ok(doc)
    }

    /// Resolve the feed region as an explicit byte span, bootstrapping
    /// the markers when the document does not carry them yet.
    fn locate_or_bootstrap(&self, index: &str) -> Result<(String, Range<usize>), PublishError> {
        if let Some(region) = find_region(index) {
            return Ok((index.to_string(), region));
        }

        if self.markers == MarkerStyle::Recipes {
            if let Some(pos) = index.find(LEGACY_MARKER) {
                debug!("Normalizing legacy feed marker into a marker pair");
                let mut doc = index.to_string();
                doc.replace_range(
                    pos..pos + LEGACY_MARKER.len(),
                    &format!("{FEED_START}\n{FEED_END}"),
                );
                let region = find_region(&doc).ok_or_else(|| {
                    PublishError::Structure("legacy marker normalization failed".to_string())
                })?;
                return Ok((doc, region));
            }
        }

        // no markers at all: anchor a fresh, empty region to the listing
        // container
        let anchor = find_anchor(index).ok_or_else(|| {
            PublishError::Structure(
                "index has neither feed markers nor a listing container to anchor them"
                    .to_string(),
            )
        })?;
        debug!("Bootstrapping feed markers after the listing container");
        let mut doc = index.to_string();
        doc.insert_str(anchor, &format!("\n{FEED_START}\n{FEED_END}"));
        let region = find_region(&doc).ok_or_else(|| {
            PublishError::Structure("marker bootstrap failed".to_string())
        })?;
        Ok((doc, region))
    }
}

/// Byte span strictly between the start and end markers.
fn find_region(doc: &str) -> Option<Range<usize>> {
    let start = doc.find(FEED_START)? + FEED_START.len();
    let end = start + doc[start..].find(FEED_END)?;
    Some(start..end)
}

/// Offset just past the opening tag of the primary listing container.
fn find_anchor(doc: &str) -> Option<usize> {
    let open = doc.find(ANCHOR_TAG)?;
    let close = doc[open..].find('>')?;
    Some(open + close + 1)
}

/// Drop the card whose `href` points at `article_ref`, along with its
/// adjacent key comment. Everything else passes through untouched, in
/// order. Matching is on the navigable link target, not the key label.
fn remove_card_for(body: &str, article_ref: &str) -> String {
    let needle = format!("href=\"{article_ref}\"");
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(open) = rest.find(CARD_OPEN) {
        let Some(close_rel) = rest[open..].find(CARD_CLOSE) else {
            break;
        };
        let close = open + close_rel + CARD_CLOSE.len();

        // take an immediately preceding key comment along with its card
        let mut block_start = open;
        let head = &rest[..open];
        if let Some(comment) = head.rfind(KEY_COMMENT_OPEN) {
            if let Some(comment_end_rel) = head[comment..].find("-->") {
                let comment_end = comment + comment_end_rel + 3;
                if head[comment_end..].trim().is_empty() {
                    block_start = comment;
                }
            }
        }

        if rest[block_start..close].contains(&needle) {
            debug!("Removing existing card for {article_ref}");
            out.push_str(&rest[..block_start]);
        } else {
            out.push_str(&rest[..close]);
        }
        rest = &rest[close..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn injector() -> Injector {
        Injector::new(MarkerStyle::Feed, ThumbnailBase::IndexRelative)
    }

    fn fragment(slug: &str, title: &str) -> FeedFragment {
        FeedFragment {
            article_ref: format!("articles/{slug}.html"),
            title: title.to_string(),
            excerpt: "Un petit plat du soir.".to_string(),
            thumbnail: None,
            published: Utc.with_ymd_and_hms(2025, 8, 5, 12, 0, 0).unwrap(),
        }
    }

    const INDEX: &str = "<!doctype html>\n<html><body>\n<main class=\"grid\">\n<!-- FEED:start -->\n<!-- FEED:end -->\n</main>\n</body></html>\n";

    #[test]
    fn test_find_region() {
        let region = find_region(INDEX).unwrap();
        assert_eq!(&INDEX[region], "\n");
    }

    #[test]
    fn test_find_region_absent() {
        assert!(find_region("<html><body></body></html>").is_none());
    }

    #[test]
    fn test_find_anchor_past_opening_tag() {
        let doc = "<body><main class=\"grid\">rest</main></body>";
        let anchor = find_anchor(doc).unwrap();
        assert_eq!(&doc[anchor..anchor + 4], "rest");
    }

    #[test]
    fn test_inject_inserts_after_start_marker() {
        let out = injector()
            .inject(INDEX, &fragment("a", "Plat A"), Utc::now())
            .unwrap();
        let region = find_region(&out).unwrap();
        let body = &out[region];
        assert!(body.trim_start().starts_with("<!-- card-a -->"));
        assert!(body.contains("href=\"articles/a.html\""));
    }

    #[test]
    fn test_inject_stamps_trailer() {
        let now = Utc.with_ymd_and_hms(2025, 8, 5, 7, 26, 53).unwrap();
        let out = injector().inject(INDEX, &fragment("a", "Plat A"), now).unwrap();
        assert!(out.ends_with("<!-- automated-build 2025-08-05 07:26:53 +0000 -->\n"));
    }

    #[test]
    fn test_structure_error_without_markers_or_anchor() {
        let err = injector()
            .inject("<html><body><p>rien</p></body></html>", &fragment("a", "A"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, PublishError::Structure(_)));
    }

    #[test]
    fn test_remove_card_matches_href_not_key() {
        let body = "\n<!-- card-x -->\n<a class=\"card\" href=\"articles/y.html\">Y</a>\n";
        // same key comment, different target: nothing removed
        let kept = remove_card_for(body, "articles/x.html");
        assert_eq!(kept, body);
        // matching target: whole block removed, comment included
        let removed = remove_card_for(body, "articles/y.html");
        assert!(!removed.contains("card-x"));
        assert!(!removed.contains("href"));
    }

    #[test]
    fn test_remove_card_keeps_neighbors() {
        let body = "\n<!-- card-a -->\n<a class=\"card\" href=\"articles/a.html\">A</a>\n<!-- card-b -->\n<a class=\"card\" href=\"articles/b.html\">B</a>\n";
        let out = remove_card_for(body, "articles/a.html");
        assert!(!out.contains("articles/a.html"));
        assert!(out.contains("<!-- card-b -->"));
        assert!(out.contains("articles/b.html"));
    }
}
