//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        DeckResponse, ErrorResponse, ExportQuery, ExportResponse, HealthResponse,
        ImageStyleRequest, ImageStyleResponse, NavigateRequest, NavigateResponse,
        QuizAnswerRequest, QuizAnswerResponse, QuizResponse, QuizSessionResponse,
        RefreshResponse, SlideRefreshJson,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use lectern_core::{LecternError, SlidePatch, paginate};

/// Error half of every fallible handler.
type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a core error onto the HTTP status the UI expects.
fn api_error(e: &LecternError) -> ApiError {
    let status = match e {
        LecternError::InvalidIndex { .. } | LecternError::ImageIndexOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        LecternError::LastSlide => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(e)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// DECK HANDLERS
// =============================================================================

/// The live deck.
pub async fn deck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.read().await;
    Json(DeckResponse::from_controller(&controller))
}

/// Partial update of one slide.
pub async fn update_slide_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(patch): Json<SlidePatch>,
) -> Result<Json<DeckResponse>, ApiError> {
    let mut controller = state.controller.write().await;
    controller
        .update_slide(index, &patch)
        .map_err(|e| api_error(&e))?;
    Ok(Json(DeckResponse::from_controller(&controller)))
}

/// Insert a blank slide after the current one.
pub async fn add_slide_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.write().await;
    let index = controller.add_slide();
    tracing::debug!(index, "Slide added");
    (
        StatusCode::CREATED,
        Json(DeckResponse::from_controller(&controller)),
    )
}

pub async fn duplicate_slide_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<(StatusCode, Json<DeckResponse>), ApiError> {
    let mut controller = state.controller.write().await;
    controller.duplicate_slide(index).map_err(|e| api_error(&e))?;
    Ok((
        StatusCode::CREATED,
        Json(DeckResponse::from_controller(&controller)),
    ))
}

/// Delete one slide. The last slide of a deck cannot be deleted (409).
pub async fn delete_slide_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<DeckResponse>, ApiError> {
    let mut controller = state.controller.write().await;
    controller.delete_slide(index).map_err(|e| api_error(&e))?;
    Ok(Json(DeckResponse::from_controller(&controller)))
}

// =============================================================================
// NAVIGATION HANDLER
// =============================================================================

pub async fn navigate_handler(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, ApiError> {
    let mut controller = state.controller.write().await;
    if !controller.go_to(request.index) {
        return Err(api_error(&LecternError::InvalidIndex {
            index: request.index,
            len: controller.slides().len(),
        }));
    }
    Ok(Json(NavigateResponse {
        current_index: controller.current_index(),
        total: controller.slides().len(),
        progress_percent: controller.progress_percent(),
    }))
}

// =============================================================================
// REFRESH HANDLER
// =============================================================================

/// Refresh every slide's citations.
///
/// The lookups run without holding the deck lock, so the UI keeps editing
/// and navigating meanwhile. Results are applied by slide id afterwards.
pub async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (slides, resolver) = {
        let controller = state.controller.read().await;
        (controller.slides().to_vec(), controller.resolver().clone())
    };

    let results = resolver.refresh_deck(&slides).await;

    let mut controller = state.controller.write().await;
    let changed = controller.apply_refresh(&results);
    controller.flush().await;
    tracing::info!(slides = results.len(), changed, "Evidence refreshed");

    Json(RefreshResponse {
        results: results.iter().map(SlideRefreshJson::from).collect(),
        changed,
        last_updated: controller.last_updated(),
    })
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Printable page layout of the deck.
pub async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let controller = state.controller.read().await;
    Json(ExportResponse {
        include_citations: query.citations,
        pages: paginate(controller.slides(), query.citations),
    })
}

// =============================================================================
// QUIZ HANDLER
// =============================================================================

pub async fn quiz_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(QuizResponse {
        questions: state.quiz.as_ref().clone(),
    })
}

/// Current state of the shared quiz pass.
pub async fn quiz_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.quiz_session.lock().await;
    Json(QuizSessionResponse::from_session(&session))
}

/// Answer the current question. Only the first answer counts.
pub async fn quiz_answer_handler(
    State(state): State<AppState>,
    Json(request): Json<QuizAnswerRequest>,
) -> impl IntoResponse {
    let mut session = state.quiz_session.lock().await;
    let outcome = session.answer(request.option);
    tracing::debug!(option = request.option, accepted = outcome.is_some(), "Quiz answer");
    Json(QuizAnswerResponse {
        outcome,
        session: QuizSessionResponse::from_session(&session),
    })
}

/// Move past the answered question. 409 when it has not been answered or
/// the pass is over.
pub async fn quiz_next_handler(
    State(state): State<AppState>,
) -> Result<Json<QuizSessionResponse>, ApiError> {
    let mut session = state.quiz_session.lock().await;
    if !session.advance() {
        let error = if session.is_finished() {
            "Quiz is finished"
        } else {
            "Answer the current question first"
        };
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: error.to_string(),
            }),
        ));
    }
    Ok(Json(QuizSessionResponse::from_session(&session)))
}

pub async fn quiz_restart_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.quiz_session.lock().await;
    session.restart();
    Json(QuizSessionResponse::from_session(&session))
}

// =============================================================================
// IMAGE STYLE HANDLER
// =============================================================================

pub async fn image_style_handler(
    State(state): State<AppState>,
    Path((index, image)): Path<(usize, usize)>,
    Json(request): Json<ImageStyleRequest>,
) -> Result<Json<ImageStyleResponse>, ApiError> {
    let mut controller = state.controller.write().await;
    let style = controller
        .set_image_style(index, image, request.to_style())
        .map_err(|e| api_error(&e))?;
    let slide_id = controller
        .slides()
        .get(index)
        .map(|s| s.id.clone())
        .unwrap_or_default();
    Ok(Json(ImageStyleResponse {
        slide_id,
        image_index: image,
        style,
    }))
}
