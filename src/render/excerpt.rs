use scraper::Html;

/// Excerpt bounds, in characters. Truncation prefers the last word
/// boundary at or before the maximum; the hard cut only applies when no
/// boundary exists above the minimum.
pub const EXCERPT_MIN: usize = 120;
pub const EXCERPT_MAX: usize = 160;

/// Turn an HTML snippet into a card excerpt: strip markup, collapse
/// whitespace runs to single spaces, truncate at a word boundary.
pub fn make_excerpt(html: &str) -> String {
    let text = strip_markup(html);
    let text = collapse_whitespace(&text);
    truncate_at_word(&text, EXCERPT_MIN, EXCERPT_MAX)
}

/// Text content of an HTML fragment, tags dropped.
fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_at_word(text: &str, min: usize, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    // byte offset of the max-th character
    let mut end = text.len();
    for (count, (offset, _)) in text.char_indices().enumerate() {
        if count == max {
            end = offset;
            break;
        }
    }

    let head = &text[..end];
    match head.rfind(' ') {
        Some(cut) if head[..cut].chars().count() >= min => head[..cut].trim_end().to_string(),
        _ => head.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(make_excerpt("<p>Un plat simple.</p>"), "Un plat simple.");
    }

    #[test]
    fn test_markup_stripped_and_whitespace_collapsed() {
        let html = "<p class=\"lead\">Des  nouilles\n  <em>sautées</em>   au poulet.</p>";
        assert_eq!(make_excerpt(html), "Des nouilles sautées au poulet.");
    }

    #[test]
    fn test_long_text_cut_at_word_boundary() {
        let word = "poulet ";
        let source = word.repeat(50); // 350 chars, plenty of boundaries
        let excerpt = make_excerpt(&source);

        assert!(excerpt.chars().count() <= EXCERPT_MAX);
        assert!(excerpt.chars().count() >= EXCERPT_MIN);
        assert!(!excerpt.ends_with(' '));
        // prefix of the collapsed source
        let collapsed = collapse_whitespace(&source);
        assert!(collapsed.starts_with(&excerpt));
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let source = "x".repeat(300);
        let excerpt = make_excerpt(&source);
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX);
    }

    #[test]
    fn test_boundary_below_min_falls_back_to_hard_cut() {
        // one 10-char word, then a 300-char word: the only boundary sits
        // below the minimum, so the cut is hard at the maximum
        let source = format!("{} {}", "nouillette", "y".repeat(300));
        let excerpt = make_excerpt(&source);
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX);
    }
}
