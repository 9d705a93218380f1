use actix_web::{web, Scope};

use crate::handlers::{health_check, list_models, recipes_config};

/// Configure all routes for the API
pub fn api_routes() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(list_models)
        .configure(recipes_config)
}
