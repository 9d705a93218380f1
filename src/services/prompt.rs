use serde_json::Value;

use crate::models::{ContextSet, PreferenceSet};

/// Shape the backend is asked to reproduce. Kept in sync with
/// `models::recipe::RecipeDocument`.
pub const RECIPE_SCHEMA_TEMPLATE: &str = r#"{
  "metadata": {"version": "2.0", "style": "professional"},
  "basic_info": {
    "name": "string",
    "description": "string",
    "cuisine": "string",
    "difficulty": "easy | medium | hard",
    "diet": "string",
    "prep_time": 0,
    "cook_time": 0,
    "total_time": 0,
    "servings": 0,
    "calories": 0
  },
  "ingredients_section": {
    "ingredient_groups": [
      {
        "group_name": "string",
        "ingredients": [
          {"name": "string", "quantity": "string", "unit": "string", "preparation": "string", "substitutes": ["string"]}
        ]
      }
    ]
  },
  "cooking_instructions": {
    "preparation_steps": ["string"],
    "cooking_steps": [
      {"step_number": 1, "title": "string", "description": "string", "time": 0, "temperature": "string", "techniques": ["string"], "pro_tips": ["string"]}
    ]
  },
  "flavor_profile": {"sweet": 0, "salty": 0, "sour": 0, "bitter": 0, "umami": 0, "spicy": 0},
  "wine_pairings": {
    "red_wines": [{"type": "string", "reason": "string"}],
    "white_wines": [{"type": "string", "reason": "string"}]
  },
  "chef_expertise": {"techniques": ["string"], "tips": ["string"]},
  "recipe_ratings": {"overall_score": 0, "sub_ratings": {"taste": 0, "difficulty": 0, "presentation": 0}}
}"#;

/// Render the single generation prompt shared by every backend in a sweep.
pub fn build_recipe_prompt(topic: &str, preferences: &PreferenceSet, context: &ContextSet) -> String {
    let mut prompt = format!(
        "You are a professional chef. Create a detailed recipe for: \"{}\".\n\n\
         Preferences:\n\
         - Diet: {}\n\
         - Cuisine: {}\n\
         - Difficulty: {}\n\
         - Servings: {}\n",
        topic.trim(),
        preferences.diet,
        preferences.cuisine,
        preferences.difficulty,
        preferences.servings
    );

    let context_lines = render_context(context);
    if !context_lines.is_empty() {
        prompt.push_str("\nAdditional context:\n");
        prompt.push_str(&context_lines);
    }

    prompt.push_str(
        "\nRespond with ONLY a JSON object matching this structure, with no prose before or after it.\n\
         Times are whole minutes. Cooking steps are numbered from 1 without gaps. \
         Flavor values and sub ratings use a 1-10 scale; overall_score uses 0-100.\n\n",
    );
    prompt.push_str(RECIPE_SCHEMA_TEMPLATE);
    prompt
}

/// Scalar context entries as "- key: value" lines; nested values are skipped.
fn render_context(context: &ContextSet) -> String {
    context
        .iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some(format!("- {}: {}\n", key, rendered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeDocument;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_topic_and_preferences() {
        let prefs = PreferenceSet {
            diet: "vegetarian".to_string(),
            cuisine: "indian".to_string(),
            difficulty: "easy".to_string(),
            servings: 2,
        };
        let prompt = build_recipe_prompt("  paneer tikka ", &prefs, &ContextSet::new());

        assert!(prompt.contains("\"paneer tikka\""));
        assert!(prompt.contains("Diet: vegetarian"));
        assert!(prompt.contains("Cuisine: indian"));
        assert!(prompt.contains("Servings: 2"));
        assert!(prompt.ends_with(RECIPE_SCHEMA_TEMPLATE));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_prompt_renders_scalar_context_only() {
        let context = json!({
            "occasion": "birthday dinner",
            "guests": 8,
            "history": [{"role": "user"}],
            "blank": " "
        });
        let context = context.as_object().unwrap().clone();
        let prompt = build_recipe_prompt("cake", &PreferenceSet::default(), &context);

        assert!(prompt.contains("- occasion: birthday dinner"));
        assert!(prompt.contains("- guests: 8"));
        assert!(!prompt.contains("history"));
        assert!(!prompt.contains("- blank"));
    }

    #[test]
    fn test_schema_template_is_valid_document_json() {
        let doc: RecipeDocument = serde_json::from_str(RECIPE_SCHEMA_TEMPLATE).unwrap();
        assert_eq!(doc.cooking_instructions.cooking_steps.len(), 1);
        assert_eq!(doc.basic_info.name, "string");
    }
}
