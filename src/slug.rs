use chrono::NaiveDate;

/// Longest title-derived part of an article slug; the date prefix is extra.
const MAX_TITLE_SLUG: usize = 60;

/// Lowercase ASCII slug: accents folded, non-alphanumeric runs collapsed
/// to a single dash, never empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if let Some(folded) = fold_accent(c) {
            slug.push_str(folded);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "recette".to_string()
    } else {
        slug.to_string()
    }
}

/// Date-prefixed slug used as the shared stem of the article and hero
/// image file names, e.g. `2025-08-05-nouilles-au-poulet`.
pub fn article_slug(title: &str, date: NaiveDate) -> String {
    let slug = slugify(title);
    // slug is pure ASCII, so byte truncation is safe
    let cut = slug.len().min(MAX_TITLE_SLUG);
    format!("{}-{}", date.format("%Y-%m-%d"), slug[..cut].trim_end_matches('-'))
}

/// ASCII folding for the accented letters French recipe titles actually
/// contain. Anything else non-ASCII acts as a separator.
fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c.to_lowercase().next().unwrap_or(c) {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'œ' => "oe",
        'æ' => "ae",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("Bœuf sauté à l'ail"), "boeuf-saute-a-l-ail");
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Nouilles --  au   poulet!"), "nouilles-au-poulet");
    }

    #[test]
    fn test_slugify_uppercase_accents() {
        assert_eq!(slugify("Étape Finale"), "etape-finale");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify("   "), "recette");
        assert_eq!(slugify("!!!"), "recette");
        assert_eq!(slugify(""), "recette");
    }

    #[test]
    fn test_article_slug_date_prefix() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        assert_eq!(
            article_slug("Nouilles au poulet", date),
            "2025-08-05-nouilles-au-poulet"
        );
    }

    #[test]
    fn test_article_slug_truncates_long_titles() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let title = "Une recette avec un titre démesurément long qui ne rentre jamais dans un nom de fichier raisonnable";
        let slug = article_slug(title, date);
        // "YYYY-MM-DD-" prefix plus at most 60 slug bytes
        assert!(slug.len() <= 11 + MAX_TITLE_SLUG);
        assert!(!slug.ends_with('-'));
    }
}
