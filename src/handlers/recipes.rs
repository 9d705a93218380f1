use crate::{
    error::ApiError,
    models::{RecipeRequest, RecipeResponse},
    services::RecipeService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use log::info;

pub fn recipes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/recipes").route(web::post().to(create_recipe)));
}

/// Generate a structured recipe from a free-text request.
///
/// Only an empty message is rejected; backend failures are answered with
/// the fallback recipe.
pub async fn create_recipe(
    request: Json<RecipeRequest>,
    recipe_service: web::Data<RecipeService>,
) -> Result<HttpResponse, ApiError> {
    let RecipeRequest {
        message,
        preferences,
        context,
    } = request.into_inner();

    let topic = message.trim();
    if topic.is_empty() {
        return Err(ApiError::InvalidInput("Message cannot be empty".to_string()));
    }

    info!("Recipe requested: '{}'", topic);
    let recipe = recipe_service
        .create_recipe(topic, &preferences, &context)
        .await;

    Ok(HttpResponse::Ok().json(RecipeResponse { recipe }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback_recipe::FALLBACK_MARKER;
    use crate::services::{GeneratorSettings, OpenRouterClient, RecipeGenerator};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn offline_service() -> web::Data<RecipeService> {
        let backend = OpenRouterClient::new(
            "http://127.0.0.1:1",
            "http://localhost",
            "Recipe Studio",
            Duration::from_secs(1),
        )
        .unwrap();
        let generator = RecipeGenerator::new(
            GeneratorSettings {
                api_key: None,
                models: vec!["vendor/model".to_string()],
                max_tokens: 4000,
                temperature: 0.7,
            },
            Arc::new(backend),
        );
        web::Data::new(RecipeService::new(generator))
    }

    #[actix_web::test]
    async fn test_empty_message_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .configure(recipes_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recipes")
            .set_json(json!({"message": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[actix_web::test]
    async fn test_recipe_returned_without_credential() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .configure(recipes_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recipes")
            .set_json(json!({
                "message": "spicy chicken curry",
                "preferences": {"diet": "none", "cuisine": "fusion", "difficulty": "medium", "servings": 4},
                "context": {}
            }))
            .to_request();
        let resp: RecipeResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.recipe.provenance.generated_by, FALLBACK_MARKER);
        assert!(resp
            .recipe
            .basic_info
            .name
            .to_lowercase()
            .contains("spicy chicken curry"));
        assert!(resp.recipe.step_count() >= 1);
    }

    #[actix_web::test]
    async fn test_loosely_typed_preferences_are_accepted() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .configure(recipes_config),
        )
        .await;

        let bodies = [
            json!({"message": "dal", "preferences": {"diet": null}}),
            json!({"message": "dal", "preferences": {"servings": 4.0}}),
            json!({"message": "dal", "preferences": {"servings": "4 people"}}),
            json!({"message": "dal", "preferences": null, "context": null}),
        ];
        for body in bodies {
            let req = test::TestRequest::post()
                .uri("/recipes")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "rejected {}", body);

            let resp: RecipeResponse = test::read_body_json(resp).await;
            assert_eq!(resp.recipe.basic_info.servings, 4);
            assert_eq!(resp.recipe.basic_info.diet, "none");
        }
    }
}
