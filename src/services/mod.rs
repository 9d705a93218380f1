pub mod completion;
pub mod fallback_recipe;
pub mod json_extract;
pub mod prompt;
pub mod recipe_generator;
pub mod recipe_service;
pub mod recipe_validation;

// Re-export public types
pub use completion::{CompletionBackend, CompletionRequest, OpenRouterClient};
pub use fallback_recipe::synthesize;
pub use recipe_generator::{GeneratorSettings, RecipeGenerator};
pub use recipe_service::RecipeService;
