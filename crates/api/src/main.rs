use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pcbuild_core::config::Settings;
use pcbuild_core::domain::recommendation::{RecommendRequest, RecommendResponse};
use pcbuild_core::llm::openai::OpenAiClient;
use pcbuild_core::recommend::RecommendService;
use pcbuild_core::shopping::naver::NaverShoppingClient;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    for key in settings.missing_secrets() {
        tracing::warn!(%key, "required secret is not set; requests depending on it will fail");
    }

    let shopping = NaverShoppingClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;
    let llm = OpenAiClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;

    let state = AppState {
        service: RecommendService::new(Arc::new(shopping), Arc::new(llm)),
    };

    let app = router(state).layer(cors_layer());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    service: RecommendService,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/recommend", post(recommend))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match HeaderValue::from_str(s) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %s, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: rejection.body_text(),
    })?;

    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            detail: "prompt must be non-empty".to_string(),
        });
    }

    match state.service.recommend(prompt).await {
        Ok(res) => {
            tracing::info!(products = res.products.len(), "recommendation generated");
            Ok(Json(res))
        }
        Err(err) => {
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "recommendation generation failed");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: format!("recommendation generation failed: {err}"),
            })
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
