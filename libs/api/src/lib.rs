use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use gemini::{
    models::{text_generation::GEMINI_2_0_FLASH, DEFAULT_BASE_URL},
    Models, TextGeneration,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use util::load_config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod fallback;
pub mod healthz;
mod response;
pub mod summarize;

pub use response::{ApiResponse, ErrorResponse, IntoApiResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No text provided")]
    InputError,
    #[error("{0}")]
    UpstreamError(String),
    #[error("{1}")]
    RequestBody(StatusCode, String),
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

#[derive(Clone, Debug)]
pub struct ApiState<G> {
    generator: G,
    config: Config,
}

impl<G> ApiState<G> {
    pub fn new(generator: G, config: Config) -> Self {
        Self { generator, config }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: Gemini,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub http: Http,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Gemini {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for Gemini {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    GEMINI_2_0_FLASH.to_string()
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

/// Request body cap unless `[http] body_limit` says otherwise.
pub static DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, Deserialize)]
pub struct Http {
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            body_limit: default_body_limit(),
        }
    }
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

#[derive(OpenApi)]
#[openapi(
    paths(summarize::post_summarize, healthz::get_health),
    components(schemas(
        summarize::request::SummarizeRequest,
        summarize::response::SummarizeResponse,
        ErrorResponse
    )),
    tags(
        (name = "summarize", description = "Text summarization API")
    )
)]
struct ApiDoc;

pub fn serve(gemini_api_key: &str, config_name: &str) -> anyhow::Result<Router> {
    info!(task = "start api serving", config = config_name);

    let config: Config = load_config(config_name)?;
    let models = Models::with_base_url(&config.gemini.base_url, gemini_api_key)
        .context("failed to build gemini client")?;

    router(ApiState::new(models, config))
}

pub fn router<G>(state: ApiState<G>) -> anyhow::Result<Router>
where
    G: TextGeneration + Clone + Send + Sync + 'static,
{
    let allow_origins = &state.config.cors.allow_origins;
    let allow_origin = if allow_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = allow_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid cors origin: {}", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let body_limit = DefaultBodyLimit::max(state.config.http.body_limit);

    let router = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .route(
            "/healthz",
            get(healthz::get_health).fallback(fallback::method_not_allowed),
        )
        .route(
            "/summarize",
            post(summarize::post_summarize::<G>)
                .fallback(fallback::method_not_allowed),
        )
        .layer(body_limit)
        .layer(cors)
        .fallback(fallback::get_404)
        .with_state(state);

    Ok(router)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use gemini::Models;
    use serde_json::Value;
    use tower::ServiceExt;
    use util::parse_config;

    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: Config = parse_config("").unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert!(config.cors.allow_origins.is_empty());
        assert_eq!(config.http.body_limit, 16 * 1024 * 1024);
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = parse_config(
            r#"
            [gemini]
            model = "gemini-1.5-pro"

            [cors]
            allow_origins = ["http://localhost:3000"]

            [http]
            body_limit = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.cors.allow_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.http.body_limit, 1024);
    }

    #[test]
    fn test_invalid_cors_origin() {
        let mut config = Config::default();
        config.cors.allow_origins = vec!["http://bad\norigin".to_string()];
        let models = Models::new("test-key").unwrap();

        let error = router(ApiState::new(models, config)).unwrap_err();
        assert!(error.to_string().starts_with("invalid cors origin"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let mut config = Config::default();
        config.cors.allow_origins = vec!["http://localhost:3000".to_string()];
        let models = Models::new("test-key").unwrap();
        let app = router(ApiState::new(models, config)).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/summarize")
                    .header("Origin", "http://localhost:3000")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let models = Models::new("test-key").unwrap();
        let app = router(ApiState::new(models, Config::default())).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Value = serde_json::from_slice(&body).unwrap();
        assert!(document["paths"]["/summarize"]["post"].is_object());
        assert!(document["paths"]["/healthz"]["get"].is_object());
    }
}
