//! # Lectern HTTP API Module
//!
//! REST endpoints for the presentation UI.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /deck` - Slides, current index, last save time, storage source
//! - `PATCH /slides/{index}` - Partial slide update
//! - `POST /slides` - Insert a blank slide after the current one
//! - `POST /slides/{index}/duplicate` - Duplicate a slide
//! - `DELETE /slides/{index}` - Delete a slide (409 for the last one)
//! - `POST /navigate` - Move to a slide
//! - `POST /refresh` - Refresh citations for every slide
//! - `GET /export?citations=bool` - Printable page layout
//! - `GET /quiz` - Quiz questions
//! - `GET /quiz/session` - State of the shared quiz pass
//! - `POST /quiz/answer` - Answer the current question (first answer counts)
//! - `POST /quiz/next` - Move past the answered question
//! - `POST /quiz/restart` - Start the pass over
//! - `PUT /slides/{index}/images/{image}/style` - Per-image display style
//!
//! ## Configuration (Environment Variables)
//!
//! - `LECTERN_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

pub use handlers::{
    add_slide_handler, deck_handler, delete_slide_handler, duplicate_slide_handler,
    export_handler, health_handler, image_style_handler, navigate_handler, quiz_answer_handler,
    quiz_handler, quiz_next_handler, quiz_restart_handler, quiz_session_handler, refresh_handler,
    update_slide_handler,
};
pub use types::{
    DeckResponse, ErrorResponse, ExportQuery, ExportResponse, HealthResponse, ImageStyleRequest,
    ImageStyleResponse, NavigateRequest, NavigateResponse, QuizAnswerRequest, QuizAnswerResponse,
    QuizResponse, QuizSessionResponse, RefreshResponse, SlideRefreshJson,
};

use crate::controller::DeckController;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post, put},
};
use lectern_core::{LecternError, QuizQuestion, QuizSession, default_quiz};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The single owner of the live deck.
    pub controller: Arc<RwLock<DeckController>>,
    pub quiz: Arc<Vec<QuizQuestion>>,
    /// One quiz pass shared by every client of this server.
    pub quiz_session: Arc<Mutex<QuizSession>>,
}

impl AppState {
    #[must_use]
    pub fn new(controller: DeckController) -> Self {
        let questions = default_quiz();
        Self {
            controller: Arc::new(RwLock::new(controller)),
            quiz_session: Arc::new(Mutex::new(QuizSession::new(questions.clone()))),
            quiz: Arc::new(questions),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build CORS layer from `LECTERN_CORS_ORIGINS`.
///
/// - "*": allows all origins
/// - unset or no valid entry: localhost only
/// - otherwise: the comma-separated origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("LECTERN_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (LECTERN_CORS_ORIGINS=*)");
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
                tracing::warn!(
                    "CORS: No valid origins in LECTERN_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No LECTERN_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Localhost origins used by the presentation UI dev servers.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/deck", get(handlers::deck_handler))
        .route("/slides", post(handlers::add_slide_handler))
        .route(
            "/slides/{index}",
            patch(handlers::update_slide_handler).delete(handlers::delete_slide_handler),
        )
        .route(
            "/slides/{index}/duplicate",
            post(handlers::duplicate_slide_handler),
        )
        .route(
            "/slides/{index}/images/{image}/style",
            put(handlers::image_style_handler),
        )
        .route("/navigate", post(handlers::navigate_handler))
        .route("/refresh", post(handlers::refresh_handler))
        .route("/export", get(handlers::export_handler))
        .route("/quiz", get(handlers::quiz_handler))
        .route("/quiz/session", get(handlers::quiz_session_handler))
        .route("/quiz/answer", post(handlers::quiz_answer_handler))
        .route("/quiz/next", post(handlers::quiz_next_handler))
        .route("/quiz/restart", post(handlers::quiz_restart_handler))
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve until Ctrl+C, then write any pending edit before exiting.
pub async fn run_server(addr: &str, controller: DeckController) -> Result<(), LecternError> {
    let state = AppState::new(controller);
    let router = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LecternError::IoError(format!("Bind failed on {}: {}", addr, e)))?;

    tracing::info!("Lectern HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LecternError::IoError(format!("Server error: {}", e)))?;

    tracing::info!("Shutting down, saving deck");
    state.controller.write().await.flush().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
