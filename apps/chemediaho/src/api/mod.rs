//! # che media ho? HTTP API Module
//!
//! This module implements the HTTP JSON API server using axum.
//! The API is stateless: every request carries its grades.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /average` - Average of a grade list
//! - `POST /goal` - Grade(s) needed for a target average
//! - `POST /predict` - Average after hypothetical grades
//! - `POST /suggest` - Subjects ranked by ease of reaching a target
//! - `POST /gradebook` - Summary of a ClasseViva grades payload
//! - `POST /gradebook/goal` - Goal over a period, subject or the whole year
//! - `POST /gradebook/trend` - Running-average or period series
//! - `POST /export/csv` - Grades as a CSV attachment
//!
//! ## Security Configuration
//!
//! - `security.cors_origins` / `CHEMEDIAHO_CORS_ORIGINS`: comma-separated
//!   allowed origins, or "*" for all (default: localhost only)
//! - `security.rate_limit` / `CHEMEDIAHO_RATE_LIMIT`: requests per second
//!   (default: 100, 0 to disable)

mod error;
mod handlers;
mod messages;
mod middleware;
mod types;

pub use error::ApiError;
pub use handlers::{
    average_handler, export_csv_handler, goal_handler, gradebook_goal_handler, gradebook_handler,
    gradebook_predict_handler, health_handler, predict_handler, suggest_handler, trend_handler,
};
pub use messages::{goal_message, prediction_message, suggestion_message};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    AverageRequest, AverageResponse, ErrorResponse, GoalRequest, GoalResponse,
    GradebookGoalRequest, GradebookGoalResponse, GradebookPredictRequest, GradebookPredictResponse,
    GradebookRequest, GradebookResponse,
    HealthResponse, NumGrades, PredictRequest, PredictResponse, SuggestRequest, SuggestResponse,
    TrendRequest, TrendResponse, grade_scope, resolve_count,
};

use crate::config::{AppConfig, SecurityConfig};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use chemediaho_core::MediaError;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MiB).
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the read-only configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create app state from a configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the security settings.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: the comma-separated list of origins
fn build_cors_layer(security: &SecurityConfig) -> CorsLayer {
    match security.cors_origins.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. Do not use this in production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.security);

    let rate_limit = state.config.security.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/average", post(handlers::average_handler))
        .route("/goal", post(handlers::goal_handler))
        .route("/predict", post(handlers::predict_handler))
        .route("/suggest", post(handlers::suggest_handler))
        .route("/gradebook", post(handlers::gradebook_handler))
        .route("/gradebook/goal", post(handlers::gradebook_goal_handler))
        .route("/gradebook/predict", post(handlers::gradebook_predict_handler))
        .route("/gradebook/trend", post(handlers::trend_handler))
        .route("/export/csv", post(handlers::export_csv_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server on the configured address.
pub async fn run_server(config: AppConfig) -> Result<(), MediaError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MediaError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("che media ho? HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MediaError::IoError(format!("Server error: {}", e)))
}

/// Resolve on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
