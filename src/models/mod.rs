use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use preferences::PreferenceSet;
pub use recipe::{
    BasicInfo, ChefExpertise, CookingInstructions, CookingStep, Ingredient, IngredientGroup,
    IngredientsSection, Provenance, RecipeDocument, RecipeMetadata, RecipeRatings, WinePairing,
};

mod lenient;
mod preferences;
pub mod recipe;

/// Free-form caller context forwarded to the prompt.
pub type ContextSet = Map<String, Value>;

/// Request structure for recipe generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Free-text cooking request, e.g. "spicy chicken curry"
    pub message: String,
    #[serde(default, deserialize_with = "lenient::deserialize_or_default")]
    pub preferences: PreferenceSet,
    #[serde(default, deserialize_with = "lenient::deserialize_or_default")]
    pub context: ContextSet,
}

/// Response structure for recipe generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub recipe: RecipeDocument,
}

/// Configured backends, in the order they are tried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub credential_configured: bool,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
}
