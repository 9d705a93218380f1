use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::models::{ContextSet, PreferenceSet, RecipeDocument};
use crate::services::completion::{CompletionBackend, CompletionRequest};
use crate::services::json_extract::extract_first_json_object;
use crate::services::prompt::build_recipe_prompt;
use crate::services::recipe_validation::{repair, validate_structure};

pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Static settings for a [`RecipeGenerator`].
#[derive(Clone)]
pub struct GeneratorSettings {
    pub api_key: Option<String>,
    /// Tried in order; the first usable document wins.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Sequential-fallback client over a prioritized list of backend models.
impl fmt::Debug for GeneratorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("models", &self.models)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Clone)]
pub struct RecipeGenerator {
    backend: Arc<dyn CompletionBackend>,
    api_key: Option<String>,
    models: Arc<[String]>,
    max_tokens: u32,
    temperature: f32,
}

impl RecipeGenerator {
    pub fn new(settings: GeneratorSettings, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            api_key: settings
                .api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            models: settings.models.into(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Try each configured model once, in order, and return the first
    /// structurally valid document.
    ///
    /// Fails with `CredentialMissing` before any network call when no key
    /// is configured, and with `AllBackendsExhausted` when every model
    /// failed. Either way the caller is expected to synthesize a recipe.
    pub async fn generate(
        &self,
        topic: &str,
        preferences: &PreferenceSet,
        context: &ContextSet,
    ) -> Result<RecipeDocument, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(GenerationError::CredentialMissing)?;

        let prompt = build_recipe_prompt(topic, preferences, context);
        info!(
            "Generating recipe for '{}' across {} backends",
            topic,
            self.models.len()
        );

        for (attempt, model) in self.models.iter().enumerate() {
            debug!(
                "Backend attempt {}/{}: {}",
                attempt + 1,
                self.models.len(),
                model
            );

            let request = CompletionRequest {
                model: model.clone(),
                prompt: prompt.clone(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                api_key: api_key.clone(),
            };

            let document = match self.backend.complete(&request).await {
                Ok(text) => parse_recipe_document(model, &text),
                Err(e) => Err(e),
            };

            match document {
                Ok(document) => {
                    let mut document = repair(document, preferences);
                    document.stamp(model, false);
                    info!(
                        "Recipe '{}' generated by {} on attempt {}",
                        document.basic_info.name,
                        model,
                        attempt + 1
                    );
                    return Ok(document);
                }
                Err(e) => warn!("Backend {} failed: {}", model, e),
            }
        }

        Err(GenerationError::AllBackendsExhausted {
            attempted: self.models.len(),
        })
    }
}

/// Extract, parse and structurally validate a document from model text.
pub fn parse_recipe_document(model: &str, text: &str) -> Result<RecipeDocument, GenerationError> {
    let malformed = |reason: String| GenerationError::MalformedPayload {
        model: model.to_string(),
        reason,
    };

    let span = extract_first_json_object(text)
        .ok_or_else(|| malformed("no JSON object in response".to_string()))?;
    let document: RecipeDocument = serde_json::from_str(span)
        .map_err(|e| malformed(format!("invalid recipe JSON: {}", e)))?;
    validate_structure(&document).map_err(malformed)?;

    Ok(document)
}
