//! Bearer-token gate for the movie routes.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};

use movie_core::ports::{AuthError, TokenClaims};
use movie_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::observability::RequestId;
use crate::state::AppState;

/// Authenticated caller, attached to the request by [`AuthGate`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub roles: Vec<String>,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject: claims.subject,
            roles: claims.roles,
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned();
        ready(identity.ok_or_else(|| AppError::Unauthorized(AuthError::MissingAuth.to_string())))
    }
}

/// Middleware that rejects requests without a valid bearer token.
///
/// Wrap a scope with it; the token service is taken from [`AppState`].
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService { service }))
    }
}

pub struct AuthGateService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(identity) => {
                tracing::debug!(
                    actor = %identity.subject,
                    roles = ?identity.roles,
                    "Authenticated request"
                );
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %req.path(), "Rejected unauthenticated request");

                let mut error = ErrorResponse::unauthorized(e.to_string());
                if let Some(request_id) = req.extensions().get::<RequestId>() {
                    error = error.with_request_id(request_id.as_str());
                }

                let response = HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(error);

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
        }
    }
}

/// Validate the `Authorization: Bearer <token>` header.
fn authenticate(req: &ServiceRequest) -> Result<Identity, AuthError> {
    let tokens = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.tokens.clone(),
        None => {
            tracing::error!("AppState not found in app data");
            return Err(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ));
        }
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    let claims = tokens.validate_token(token)?;
    Ok(Identity::from(claims))
}
