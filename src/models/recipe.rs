use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::lenient::{
    deserialize_lenient_f64, deserialize_lenient_f64_map, deserialize_lenient_string,
    deserialize_lenient_text, deserialize_lenient_u32, deserialize_lenient_vec,
    deserialize_or_default, deserialize_string_list, keyed_or_bare_list,
};

pub const SCHEMA_VERSION: &str = "2.0";
pub const DEFAULT_STYLE: &str = "professional";

const UNKEYED_PAIRINGS: &str = "suggestions";

/// Accepts the keyed form `{"red_wines": [...]}` or a bare list of
/// pairings, which is filed under `"suggestions"`.
fn deserialize_wine_pairings<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, Vec<WinePairing>>>, D::Error>
where
    D: Deserializer<'de>,
{
    keyed_or_bare_list(deserializer, UNKEYED_PAIRINGS)
}

/// A structured recipe as returned to clients.
///
/// Every section defaults when missing so that partially conforming
/// backend output still deserializes; structural checks happen later in
/// `services::recipe_validation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    #[serde(
        default,
        alias = "recipe_metadata",
        deserialize_with = "deserialize_or_default"
    )]
    pub metadata: RecipeMetadata,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub basic_info: BasicInfo,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub ingredients_section: IngredientsSection,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub cooking_instructions: CookingInstructions,
    #[serde(default, deserialize_with = "deserialize_lenient_f64_map")]
    pub flavor_profile: BTreeMap<String, f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_wine_pairings"
    )]
    pub wine_pairings: Option<BTreeMap<String, Vec<WinePairing>>>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub chef_expertise: ChefExpertise,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub recipe_ratings: RecipeRatings,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub version: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub style: String,
}

impl Default for RecipeMetadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            version: SCHEMA_VERSION.to_string(),
            style: DEFAULT_STYLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub diet: String,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub prep_time: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub cook_time: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub total_time: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub servings: u32,
    #[serde(
        default,
        alias = "calories_per_serving",
        deserialize_with = "deserialize_lenient_u32"
    )]
    pub calories: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientsSection {
    #[serde(default, alias = "groups", deserialize_with = "deserialize_lenient_vec")]
    pub ingredient_groups: Vec<IngredientGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientGroup {
    #[serde(default, alias = "name", deserialize_with = "deserialize_lenient_text")]
    pub group_name: String,
    #[serde(default, alias = "items", deserialize_with = "deserialize_lenient_vec")]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, alias = "item", deserialize_with = "deserialize_lenient_text")]
    pub name: String,
    #[serde(default, alias = "amount", deserialize_with = "deserialize_lenient_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub preparation: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub substitutes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookingInstructions {
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub preparation_steps: Vec<String>,
    #[serde(default, alias = "steps", deserialize_with = "deserialize_lenient_vec")]
    pub cooking_steps: Vec<CookingStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookingStep {
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub title: String,
    #[serde(
        default,
        alias = "instruction",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub description: String,
    /// Minutes.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub time: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub techniques: Vec<String>,
    #[serde(default, alias = "tips", deserialize_with = "deserialize_string_list")]
    pub pro_tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinePairing {
    #[serde(
        default,
        rename = "type",
        alias = "wine",
        alias = "name",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub wine_type: String,
    #[serde(
        default,
        alias = "rationale",
        alias = "description",
        deserialize_with = "deserialize_lenient_text"
    )]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChefExpertise {
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub techniques: Vec<String>,
    #[serde(default, alias = "chef_tips", deserialize_with = "deserialize_string_list")]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeRatings {
    /// 0 to 100.
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub overall_score: f64,
    /// 1 to 10, keyed by aspect ("taste", "presentation", ...).
    #[serde(default, deserialize_with = "deserialize_lenient_f64_map")]
    pub sub_ratings: BTreeMap<String, f64>,
}

/// Who produced a document and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Backend model id, or the fallback marker.
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub generated_by: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub fallback: bool,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub document_id: String,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp: Option<DateTime<Utc>> = deserialize_or_default(deserializer)?;
    Ok(timestamp.unwrap_or_else(Utc::now))
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            generated_by: String::new(),
            fallback: false,
            generated_at: Utc::now(),
            document_id: String::new(),
        }
    }
}

impl RecipeDocument {
    /// Stamp id, schema version and provenance onto the document.
    pub fn stamp(&mut self, generated_by: &str, fallback: bool) {
        let id = new_document_id();
        self.metadata.id = id.clone();
        self.metadata.version = SCHEMA_VERSION.to_string();
        self.provenance = Provenance {
            generated_by: generated_by.to_string(),
            fallback,
            generated_at: Utc::now(),
            document_id: id,
        };
    }

    pub fn step_count(&self) -> usize {
        self.cooking_instructions.cooking_steps.len()
    }
}

/// Millisecond timestamp plus a v4 UUID.
pub fn new_document_id() -> String {
    format!(
        "recipe_{}_{}",
        Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}
