use serde_json::json;

use crate::model::RecipeRecord;

/// Build the schema.org `Recipe` JSON-LD block embedded in each article.
pub fn recipe_schema(record: &RecipeRecord, hero_file: Option<&str>) -> String {
    let instructions: Vec<_> = record
        .steps
        .iter()
        .map(|s| json!({"@type": "HowToStep", "text": s}))
        .collect();

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": record.title,
        "description": record.intro,
        "recipeCuisine": "Asiatique",
        "recipeInstructions": instructions,
    });
    if let Some(name) = hero_file {
        data["image"] = json!([format!("/images/{name}")]);
    }

    format!(r#"<script type="application/ld+json">{data}</script>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecipeRecord {
        RecipeRecord {
            title: "Bo bun".to_string(),
            intro: "Frais et complet.".to_string(),
            ingredients_2: vec!["vermicelles".to_string()],
            ingredients_3: vec!["vermicelles".to_string()],
            ingredients_4: vec!["vermicelles".to_string()],
            steps: vec!["Cuire.".to_string(), "Assembler.".to_string()],
            image_keywords: String::new(),
        }
    }

    #[test]
    fn test_schema_with_image() {
        let block = recipe_schema(&sample(), Some("2025-08-05-bo-bun-hero.jpg"));
        assert!(block.starts_with(r#"<script type="application/ld+json">"#));
        assert!(block.contains(r#""@type":"Recipe""#));
        assert!(block.contains("/images/2025-08-05-bo-bun-hero.jpg"));
        // one HowToStep per record step
        assert_eq!(block.matches("HowToStep").count(), 2);
    }

    #[test]
    fn test_schema_without_image() {
        let block = recipe_schema(&sample(), None);
        assert!(!block.contains(r#""image""#));
    }
}
