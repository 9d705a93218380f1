use crate::{
    config::Config,
    error::Result,
    routes::api_routes,
    services::{OpenRouterClient, RecipeGenerator, RecipeService},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::{info, warn};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

pub struct Application {
    port: u16,
    host: String,
    recipe_service: RecipeService,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Result<Self> {
        let backend = OpenRouterClient::new(
            &config.openrouter_base_url,
            &config.referer,
            &config.title,
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to create completion API client")?;

        let settings = config.generator_settings();
        if config.has_credential() {
            info!(
                "Recipe generation enabled with {} backends: {}",
                settings.models.len(),
                settings.models.join(", ")
            );
        } else {
            warn!("APP_OPENROUTER_API_KEY is not set; every request will get the fallback recipe");
        }

        let generator = RecipeGenerator::new(settings, Arc::new(backend));

        Ok(Self {
            port: config.port,
            host: config.host.clone(),
            recipe_service: RecipeService::new(generator),
        })
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let recipe_service = web::Data::new(self.recipe_service.clone());

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(recipe_service.clone())
                .service(api_routes())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
