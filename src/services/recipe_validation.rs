use crate::models::{PreferenceSet, RecipeDocument};
use crate::models::recipe::{DEFAULT_STYLE, SCHEMA_VERSION};

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 10.0;
pub const OVERALL_MIN: f64 = 0.0;
pub const OVERALL_MAX: f64 = 100.0;

/// Minimum a parsed backend document needs before it is accepted.
pub fn validate_structure(doc: &RecipeDocument) -> Result<(), String> {
    if doc.basic_info.name.trim().is_empty() {
        return Err("basic_info.name is missing".to_string());
    }
    if doc.cooking_instructions.cooking_steps.is_empty() {
        return Err("cooking_instructions.cooking_steps is empty".to_string());
    }
    Ok(())
}

/// Bring an accepted document in line with the documented invariants.
///
/// Steps are renumbered 1..N in the order received, blanks are filled from
/// the caller's preferences, ratings are clamped and `total_time` is
/// recomputed from its parts.
pub fn repair(mut doc: RecipeDocument, preferences: &PreferenceSet) -> RecipeDocument {
    for (index, step) in doc
        .cooking_instructions
        .cooking_steps
        .iter_mut()
        .enumerate()
    {
        step.step_number = index as u32 + 1;
    }

    let info = &mut doc.basic_info;
    if info.description.trim().is_empty() {
        info.description = format!("A {} recipe for {}.", preferences.cuisine, info.name);
    }
    fill_blank(&mut info.cuisine, &preferences.cuisine);
    fill_blank(&mut info.difficulty, &preferences.difficulty);
    fill_blank(&mut info.diet, &preferences.diet);
    if info.servings == 0 {
        info.servings = preferences.servings;
    }
    if info.prep_time > 0 || info.cook_time > 0 {
        info.total_time = info.prep_time.saturating_add(info.cook_time);
    }

    fill_blank(&mut doc.metadata.version, SCHEMA_VERSION);
    fill_blank(&mut doc.metadata.style, DEFAULT_STYLE);

    for value in doc.flavor_profile.values_mut() {
        *value = value.clamp(RATING_MIN, RATING_MAX);
    }
    let ratings = &mut doc.recipe_ratings;
    ratings.overall_score = ratings.overall_score.clamp(OVERALL_MIN, OVERALL_MAX);
    for value in ratings.sub_ratings.values_mut() {
        *value = value.clamp(RATING_MIN, RATING_MAX);
    }

    doc
}

/// True when steps are numbered exactly 1..N.
pub fn steps_are_sequential(doc: &RecipeDocument) -> bool {
    doc.cooking_instructions
        .cooking_steps
        .iter()
        .enumerate()
        .all(|(index, step)| step.step_number as usize == index + 1)
}

fn fill_blank(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}
