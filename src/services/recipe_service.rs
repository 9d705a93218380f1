use tracing::{info, warn};

use crate::error::GenerationError;
use crate::models::{ContextSet, PreferenceSet, RecipeDocument};
use crate::services::fallback_recipe::synthesize;
use crate::services::recipe_generator::RecipeGenerator;

/// Always answers with a recipe: model-generated when possible,
/// synthesized otherwise.
#[derive(Clone)]
pub struct RecipeService {
    generator: RecipeGenerator,
}

impl RecipeService {
    pub fn new(generator: RecipeGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &RecipeGenerator {
        &self.generator
    }

    pub async fn create_recipe(
        &self,
        topic: &str,
        preferences: &PreferenceSet,
        context: &ContextSet,
    ) -> RecipeDocument {
        let preferences = preferences.clone().normalized();

        match self.generator.generate(topic, &preferences, context).await {
            Ok(document) => document,
            Err(GenerationError::CredentialMissing) => {
                warn!("No completion API credential configured, serving fallback recipe");
                synthesize(topic, &preferences)
            }
            Err(e) => {
                warn!("Recipe generation failed ({}), serving fallback recipe", e);
                let document = synthesize(topic, &preferences);
                info!("Fallback recipe '{}' created", document.basic_info.name);
                document
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion::{CompletionBackend, CompletionRequest};
    use crate::services::fallback_recipe::FALLBACK_MARKER;
    use crate::services::recipe_generator::GeneratorSettings;
    use crate::services::recipe_validation::steps_are_sequential;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.model.ends_with("broken-json") {
                Ok("```json\n{\"basic_info\": {\"name\": \"x\"\n```".to_string())
            } else {
                Err(GenerationError::BackendRejected {
                    model: request.model.clone(),
                    status: 500,
                    body: String::new(),
                })
            }
        }
    }

    fn service(api_key: Option<&str>) -> (RecipeService, Arc<FailingBackend>) {
        let backend = Arc::new(FailingBackend {
            calls: AtomicUsize::new(0),
        });
        let generator = RecipeGenerator::new(
            GeneratorSettings {
                api_key: api_key.map(String::from),
                models: vec!["vendor/a".to_string(), "vendor/broken-json".to_string()],
                max_tokens: 4000,
                temperature: 0.7,
            },
            backend.clone(),
        );
        (RecipeService::new(generator), backend)
    }

    fn shape(mut doc: RecipeDocument) -> RecipeDocument {
        doc.metadata.id.clear();
        doc.provenance.document_id.clear();
        doc.provenance.generated_at = chrono::DateTime::<chrono::Utc>::MIN_UTC;
        doc
    }

    #[tokio::test]
    async fn test_exhausted_backends_fall_back_to_synthesized_shape() {
        let (service, backend) = service(Some("sk"));
        let prefs = PreferenceSet::default();

        let doc = service
            .create_recipe("spicy chicken curry", &prefs, &ContextSet::new())
            .await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(doc.provenance.generated_by, FALLBACK_MARKER);
        assert!(doc
            .basic_info
            .name
            .to_lowercase()
            .contains("spicy chicken curry"));
        assert!(!doc.cooking_instructions.cooking_steps.is_empty());
        assert!(steps_are_sequential(&doc));
        assert_eq!(shape(doc), shape(synthesize("spicy chicken curry", &prefs)));
    }

    #[tokio::test]
    async fn test_missing_credential_falls_back_without_calls() {
        let (service, backend) = service(None);

        let doc = service
            .create_recipe("lemon tart", &PreferenceSet::default(), &ContextSet::new())
            .await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(doc.provenance.fallback);
    }

    #[tokio::test]
    async fn test_blank_preferences_are_normalized_before_fallback() {
        let (service, _) = service(None);
        let prefs = PreferenceSet {
            cuisine: " ".to_string(),
            servings: 0,
            ..PreferenceSet::default()
        };

        let doc = service
            .create_recipe("ramen", &prefs, &ContextSet::new())
            .await;

        assert_eq!(doc.basic_info.cuisine, "fusion");
        assert_eq!(doc.basic_info.servings, 4);
    }
}
