use actix_web::{get, web, HttpResponse};

use crate::{models::ModelsResponse, services::RecipeService};

/// Backend models in priority order. The credential itself is never exposed.
#[get("/models")]
pub async fn list_models(recipe_service: web::Data<RecipeService>) -> HttpResponse {
    let generator = recipe_service.generator();

    HttpResponse::Ok().json(ModelsResponse {
        models: generator.models().to_vec(),
        credential_configured: generator.has_credential(),
    })
}
