//! Error translation - the only place domain failures become HTTP responses.

use actix_web::{
    Error, HttpMessage, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::StatusCode,
};
use futures::future::LocalBoxFuture;
use movie_core::DomainError;
use movie_shared::ErrorResponse;
use std::future::{Ready, ready};

use crate::observability::RequestId;

/// Message for any lookup of an unknown movie.
pub const MOVIE_NOT_FOUND: &str = "Movie not found.";

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            // Detail stays in the logs
            tracing::error!("Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl AppError {
    /// Client-facing body; internal details are never included.
    pub fn body(&self) -> ErrorResponse {
        match self {
            AppError::BadRequest(msg) => ErrorResponse::bad_request(msg),
            AppError::Unauthorized(msg) => ErrorResponse::unauthorized(msg),
            AppError::NotFound(msg) => ErrorResponse::not_found(msg),
            AppError::Conflict(msg) => ErrorResponse::conflict(msg),
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found.", entity_type))
            }
            DomainError::Conflict {
                id,
                expected_version,
            } => AppError::Conflict(format!(
                "Movie {} changed since version {}; reload and retry.",
                id, expected_version
            )),
            DomainError::Transient(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Middleware that stamps the request ID onto [`AppError`] bodies.
///
/// Must sit inside [`crate::observability::RequestIdMiddleware`].
pub struct ErrorRequestId;

impl<S, B> Transform<S, ServiceRequest> for ErrorRequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorRequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorRequestIdService { service }))
    }
}

pub struct ErrorRequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorRequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            let body = match res.response().error().and_then(|e| e.as_error::<AppError>()) {
                Some(app_error) => res
                    .request()
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| app_error.body().with_request_id(id.as_str())),
                None => None,
            };

            match body {
                Some(body) => {
                    let status = res.status();
                    let (http_req, _response) = res.into_parts();
                    let response = HttpResponse::build(status).json(body);
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}
