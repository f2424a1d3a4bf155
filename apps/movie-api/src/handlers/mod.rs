//! HTTP handlers and route configuration.

mod health;
mod movies;

use actix_web::web;

use crate::middleware::auth::AuthGate;
use crate::middleware::error::AppError;

pub use health::SERVICE_NAME;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/", web::get().to(health::service_info))
        .route("/health", web::get().to(health::health_check))
        // Movie routes, behind the bearer-token gate
        .service(
            web::scope("/movies")
                .wrap(AuthGate)
                .route("", web::post().to(movies::create_movie))
                .route("", web::get().to(movies::list_movies))
                .route("/{id}", web::patch().to(movies::update_movie))
                .route("/{id}", web::delete().to(movies::delete_movie)),
        );
}

/// JSON body extractor settings: malformed bodies become `BAD_REQUEST`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
