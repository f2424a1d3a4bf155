//! Movie CRUD handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use movie_core::domain::{MoviePatch, NewMovie};
use movie_shared::dto::{CreateMovieRequest, UpdateMovieRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, MOVIE_NOT_FOUND};
use crate::state::AppState;

/// A path segment that is not a UUID cannot name a stored movie.
fn parse_movie_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(MOVIE_NOT_FOUND.to_string()))
}

/// POST /movies
#[tracing::instrument(skip_all, fields(actor = %identity.subject))]
pub async fn create_movie(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateMovieRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let movie = state
        .movies
        .create(NewMovie {
            title: req.title,
            genre: req.genre,
            year: req.year,
        })
        .await?;

    Ok(HttpResponse::Created().json(movie))
}

/// GET /movies
#[tracing::instrument(skip_all, fields(actor = %identity.subject))]
pub async fn list_movies(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let movies = state.movies.list().await?;

    Ok(HttpResponse::Ok().json(movies))
}

/// PATCH /movies/{id}
#[tracing::instrument(skip_all, fields(actor = %identity.subject, movie_id = %path.as_str()))]
pub async fn update_movie(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateMovieRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_movie_id(&path)?;
    let req = body.into_inner();

    let movie = state
        .movies
        .update(
            id,
            MoviePatch {
                title: req.title,
                genre: req.genre,
                year: req.year,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(movie))
}

/// DELETE /movies/{id}
#[tracing::instrument(skip_all, fields(actor = %identity.subject, movie_id = %path.as_str()))]
pub async fn delete_movie(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_movie_id(&path)?;

    let movie = state.movies.delete(id).await?;

    Ok(HttpResponse::Ok().json(movie))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use movie_core::MovieServiceConfig;
    use movie_core::domain::{Movie, MoviePatch};
    use movie_core::error::RepoError;
    use movie_core::ports::{BaseRepository, MovieRepository, TokenService};
    use movie_infra::{InMemoryCache, InMemoryMovieRepository, JwtConfig, JwtTokenService};

    use crate::handlers::{configure_routes, json_config};
    use crate::middleware::error::ErrorRequestId;
    use crate::observability::RequestIdMiddleware;
    use crate::state::AppState;

    struct Fixture {
        state: AppState,
        repo: Arc<InMemoryMovieRepository>,
        bearer: String,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryMovieRepository::new());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..Default::default()
        }));
        let token = tokens.generate_token("dashboard", vec![]).unwrap();

        let state = AppState::from_parts(
            repo.clone(),
            Arc::new(InMemoryCache::new()),
            tokens,
            MovieServiceConfig::default(),
        );

        Fixture {
            state,
            repo,
            bearer: format!("Bearer {}", token),
        }
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(ErrorRequestId)
                    .wrap(RequestIdMiddleware)
                    .app_data(web::Data::new($state.clone()))
                    .app_data(json_config())
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn inception() -> Value {
        json!({ "title": "Inception", "genre": "Sci-Fi", "year": 2010 })
    }

    #[actix_web::test]
    async fn test_root_reports_service_identity() {
        let f = fixture();
        let app = test_app!(f.state);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "service": "movie-management-svc", "status": true }));
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let f = fixture();
        let app = test_app!(f.state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[actix_web::test]
    async fn test_movies_require_bearer_token() {
        let f = fixture();
        let app = test_app!(f.state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/movies").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "UNAUTHORIZED");
        assert!(body["request_id"].is_string());

        let req = test::TestRequest::get()
            .uri("/movies")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_movie() {
        let f = fixture();
        let app = test_app!(f.state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(inception())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Inception");
        assert_eq!(body["genre"], "Sci-Fi");
        assert_eq!(body["year"], 2010);
        assert_eq!(body["version"], 0);
        assert!(body["id"].is_string());
    }

    #[actix_web::test]
    async fn test_create_without_title_or_genre() {
        let f = fixture();
        let app = test_app!(f.state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(json!({ "year": 2010 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "BAD_REQUEST");
        assert_eq!(body["error"], "title or genre is missing!");
        assert!(body["request_id"].is_string());
        assert!(f.repo.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let f = fixture();
        let app = test_app!(f.state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(json!({ "title": "Inception", "genre": "Sci-Fi", "year": "soon" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "BAD_REQUEST");
        assert!(body["request_id"].is_string());
    }

    #[actix_web::test]
    async fn test_list_serves_cache_until_patch_invalidates() {
        let f = fixture();
        let app = test_app!(f.state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(inception())
            .to_request();
        let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let id = created["id"].as_str().unwrap().to_string();

        // Cache miss populates the list
        let req = test::TestRequest::get()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let listed: Value = test::read_body_json(resp).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["year"], 2010);

        // Write behind the service's back: the cached list stays stale
        f.repo
            .update_if_version(
                id.parse().unwrap(),
                0,
                &MoviePatch {
                    year: Some(2021),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let req = test::TestRequest::get()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "Inception");
        assert_eq!(listed[0]["year"], 2010);

        // PATCH through the API invalidates
        let req = test::TestRequest::patch()
            .uri(&format!("/movies/{}", id))
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(json!({ "year": 2021 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(resp).await;
        assert_eq!(updated["title"], "Inception");
        assert_eq!(updated["genre"], "Sci-Fi");
        assert_eq!(updated["year"], 2021);
        assert_eq!(updated["version"], 2);

        let req = test::TestRequest::get()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(listed[0]["year"], 2021);
    }

    #[actix_web::test]
    async fn test_unknown_movie_is_not_found() {
        let f = fixture();
        let app = test_app!(f.state);

        for uri in [
            "/movies/nonexistent-id".to_string(),
            format!("/movies/{}", Uuid::new_v4()),
        ] {
            let req = test::TestRequest::patch()
                .uri(&uri)
                .insert_header((AUTHORIZATION, f.bearer.as_str()))
                .insert_header(("x-request-id", "lookup-1"))
                .set_json(json!({ "year": 2021 }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Movie not found.");
            assert_eq!(body["request_id"], "lookup-1");

            let req = test::TestRequest::delete()
                .uri(&uri)
                .insert_header((AUTHORIZATION, f.bearer.as_str()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Movie not found.");
        }

        assert!(f.repo.find_all().await.unwrap().is_empty());
    }

    /// Store where another writer commits between the read and the
    /// conditional write of every update.
    struct RacingRepository {
        inner: InMemoryMovieRepository,
    }

    #[async_trait]
    impl BaseRepository<Movie, Uuid> for RacingRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepoError> {
            self.inner.find_by_id(id).await
        }

        async fn insert(&self, movie: Movie) -> Result<Movie, RepoError> {
            self.inner.insert(movie).await
        }

        async fn delete(&self, id: Uuid) -> Result<Movie, RepoError> {
            self.inner.delete(id).await
        }
    }

    #[async_trait]
    impl MovieRepository for RacingRepository {
        async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
            self.inner.find_all().await
        }

        async fn update_if_version(
            &self,
            id: Uuid,
            expected_version: i64,
            patch: &MoviePatch,
        ) -> Result<Movie, RepoError> {
            let competing = MoviePatch {
                year: Some(1999),
                ..Default::default()
            };
            self.inner
                .update_if_version(id, expected_version, &competing)
                .await?;
            self.inner.update_if_version(id, expected_version, patch).await
        }
    }

    #[actix_web::test]
    async fn test_patch_that_loses_the_race_is_409() {
        let f = fixture();
        let state = AppState::from_parts(
            Arc::new(RacingRepository {
                inner: InMemoryMovieRepository::new(),
            }),
            Arc::new(InMemoryCache::new()),
            f.state.tokens.clone(),
            MovieServiceConfig::default(),
        );
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(inception())
            .to_request();
        let created: Value = test::read_body_json(test::call_service(&app, req).await).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/movies/{}", created["id"].as_str().unwrap()))
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .insert_header(("x-request-id", "race-1"))
            .set_json(json!({ "year": 2021 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "CONFLICT");
        assert_eq!(body["request_id"], "race-1");
    }

    #[actix_web::test]
    async fn test_delete_movie_then_delete_again() {
        let f = fixture();
        let app = test_app!(f.state);

        let req = test::TestRequest::post()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .set_json(inception())
            .to_request();
        let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let uri = format!("/movies/{}", created["id"].as_str().unwrap());

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted: Value = test::read_body_json(resp).await;
        assert_eq!(deleted["title"], "Inception");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/movies")
            .insert_header((AUTHORIZATION, f.bearer.as_str()))
            .to_request();
        let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(listed, json!([]));
    }
}
