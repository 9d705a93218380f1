pub mod backends;
pub mod health;
pub mod recipes;

pub use backends::list_models;
pub use health::health_check;
pub use recipes::recipes_config;
