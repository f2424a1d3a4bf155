//! Service identity and health endpoints.

use actix_web::HttpResponse;
use movie_shared::ServiceInfo;
use serde::Serialize;

/// Name reported by the root endpoint.
pub const SERVICE_NAME: &str = "movie-management-svc";

/// GET /
pub async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo::running(SERVICE_NAME))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Liveness check.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
