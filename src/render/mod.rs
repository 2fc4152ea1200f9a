pub mod excerpt;
mod schema;

pub use schema::recipe_schema;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::PublishError;
use crate::model::RecipeRecord;

/// Built-in article template, used when the configured one is missing.
/// Loaded at compile time using the `include_str!` macro.
pub const FALLBACK_TEMPLATE: &str = include_str!("fallback_template.html");

/// Placeholders every article template must provide. `{{SCHEMA_JSON}}`
/// is optional and only substituted when present.
const REQUIRED_PLACEHOLDERS: [&str; 8] = [
    "{{TITLE}}",
    "{{HERO_FILENAME}}",
    "{{HERO_ALT}}",
    "{{INTRO_HTML}}",
    "{{INGREDIENTS_2}}",
    "{{INGREDIENTS_3}}",
    "{{INGREDIENTS_4}}",
    "{{STEPS_HTML}}",
];

const SCHEMA_PLACEHOLDER: &str = "{{SCHEMA_JSON}}";

/// A fully rendered article page plus its storage reference.
#[derive(Debug, Clone)]
pub struct ArticleDocument {
    pub html: String,
    pub file_name: String,
}

/// Everything the template needs besides the record itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// File name the article will be written under
    pub article_file: String,
    /// Hero image file name, when one was generated
    pub hero_file: Option<String>,
}

/// Render one recipe into a complete article page. Pure transform: the
/// caller is responsible for writing the result to disk.
///
/// Fails with a template error when a required placeholder is missing
/// from the template or survives substitution, and with a validation
/// error when the record breaks its invariants.
pub fn render(
    record: &RecipeRecord,
    template: &str,
    ctx: &RenderContext,
) -> Result<ArticleDocument, PublishError> {
    record.validate()?;

    for placeholder in REQUIRED_PLACEHOLDERS {
        if !template.contains(placeholder) {
            return Err(PublishError::Template(format!(
                "template is missing {placeholder}"
            )));
        }
    }

    let hero_alt = format!("Photo de {}", record.title);
    let intro_clean = strip_inline_refs(record.intro.trim());
    let intro_html = format!(
        r#"<p class="lead">{}</p>"#,
        encode_text(intro_clean.trim())
    );

    let mut html = template
        .replace("{{TITLE}}", &encode_text(&record.title))
        .replace(
            "{{HERO_FILENAME}}",
            ctx.hero_file.as_deref().unwrap_or(""),
        )
        .replace("{{HERO_ALT}}", &encode_double_quoted_attribute(&hero_alt))
        .replace("{{INTRO_HTML}}", &intro_html)
        .replace("{{INGREDIENTS_2}}", &unordered_list(&record.ingredients_2))
        .replace("{{INGREDIENTS_3}}", &unordered_list(&record.ingredients_3))
        .replace("{{INGREDIENTS_4}}", &unordered_list(&record.ingredients_4))
        .replace("{{STEPS_HTML}}", &step_blocks(&record.steps));

    if template.contains(SCHEMA_PLACEHOLDER) {
        let schema = schema::recipe_schema(record, ctx.hero_file.as_deref());
        html = html.replace(SCHEMA_PLACEHOLDER, &schema);
    }

    // without a photo the empty hero figure becomes a spacer
    if ctx.hero_file.is_none() {
        html = remove_hero_figure(&html);
    }

    if let Some(leftover) = find_placeholder(&html) {
        return Err(PublishError::Template(format!(
            "unreplaced placeholder {leftover}"
        )));
    }

    Ok(ArticleDocument {
        html,
        file_name: ctx.article_file.clone(),
    })
}

/// One block per step, so the rendered count always equals the record's.
fn step_blocks(steps: &[String]) -> String {
    steps
        .iter()
        .map(|s| {
            format!(
                "<div class=\"step\"><p>{}</p></div>",
                encode_text(&flatten(s))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<ul>` with one `<li>` per input item.
fn unordered_list(items: &[String]) -> String {
    let lis = items
        .iter()
        .map(|i| format!("  <li>{}</li>", encode_text(&flatten(i))))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<ul>\n{lis}\n</ul>")
}

/// Newline and whitespace runs inside an item collapse to single spaces.
fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `[1]`-style citation markers and numeric `<sup>` spans the
/// model sometimes copies from its sources.
pub(crate) fn strip_inline_refs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(['[', '<']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(skipped) = match_bracket_ref(tail).or_else(|| match_sup_ref(tail)) {
            rest = &tail[skipped..];
        } else {
            let ch_len = tail.chars().next().map(char::len_utf8).unwrap_or(1);
            out.push_str(&tail[..ch_len]);
            rest = &tail[ch_len..];
        }
    }
    out.push_str(rest);
    out
}

/// Length of a leading `[ 12 ]` marker, if `s` starts with one.
fn match_bracket_ref(s: &str) -> Option<usize> {
    let inner = s.strip_prefix('[')?;
    let close = inner.find(']')?;
    let body = inner[..close].trim();
    if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
        Some(close + 2)
    } else {
        None
    }
}

/// Length of a leading `<sup>1</sup>` or `<sup>[1]</sup>` span.
fn match_sup_ref(s: &str) -> Option<usize> {
    const OPEN: &str = "<sup>";
    const CLOSE: &str = "</sup>";
    let inner = s.strip_prefix(OPEN)?;
    let close = inner.find(CLOSE)?;
    let body = inner[..close].trim();
    let is_ref = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == '[' || c == ']' || c.is_whitespace());
    if is_ref {
        Some(OPEN.len() + close + CLOSE.len())
    } else {
        None
    }
}

/// Swap the (empty) hero figure for a fixed spacer when no photo exists.
fn remove_hero_figure(html: &str) -> String {
    const OPEN: &str = "<figure class=\"img\">";
    const CLOSE: &str = "</figure>";
    let Some(start) = html.find(OPEN) else {
        return html.to_string();
    };
    let Some(close_rel) = html[start..].find(CLOSE) else {
        return html.to_string();
    };
    let end = start + close_rel + CLOSE.len();
    format!(
        "{}<div style=\"height:24px\"></div>{}",
        &html[..start],
        &html[end..]
    )
}

/// First surviving `{{...}}` placeholder, if any.
fn find_placeholder(html: &str) -> Option<&str> {
    let start = html.find("{{")?;
    let end = html[start..].find("}}")? + start + 2;
    Some(&html[start..end])
}
