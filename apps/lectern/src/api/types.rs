//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use crate::controller::{DeckController, DeckSource};
use crate::resolver::{RefreshStatus, SlideRefresh};
use chrono::{DateTime, Utc};
use lectern_core::{
    AnswerOutcome, ExportPage, ImageFit, ImageStyle, LecternError, QuizQuestion, QuizSession,
    ScoreBand, Slide,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every 4xx/5xx answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&LecternError> for ErrorResponse {
    fn from(e: &LecternError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

// =============================================================================
// DECK RESPONSE
// =============================================================================

/// The whole live deck as the presentation UI renders it.
#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    pub slides: Vec<Slide>,
    pub current_index: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub last_updated: Option<DateTime<Utc>>,
    pub source: DeckSource,
}

impl DeckResponse {
    #[must_use]
    pub fn from_controller(controller: &DeckController) -> Self {
        Self {
            slides: controller.slides().to_vec(),
            current_index: controller.current_index(),
            total: controller.slides().len(),
            progress_percent: controller.progress_percent(),
            last_updated: controller.last_updated(),
            source: controller.source(),
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub current_index: usize,
    pub total: usize,
    pub progress_percent: u8,
}

// =============================================================================
// REFRESH
// =============================================================================

/// Outcome for one slide of a batch refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SlideRefreshJson {
    pub slide_id: String,
    pub citation_count: usize,
    #[serde(flatten)]
    pub status: RefreshStatus,
}

impl From<&SlideRefresh> for SlideRefreshJson {
    fn from(refresh: &SlideRefresh) -> Self {
        Self {
            slide_id: refresh.slide_id.clone(),
            citation_count: refresh.resolution.citations.len(),
            status: refresh.resolution.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub results: Vec<SlideRefreshJson>,
    pub changed: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

// =============================================================================
// EXPORT
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    /// Include the source list on each page. Defaults to true.
    #[serde(default = "default_true")]
    pub citations: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub include_citations: bool,
    pub pages: Vec<ExportPage>,
}

// =============================================================================
// QUIZ
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

/// Where the shared quiz pass stands.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSessionResponse {
    /// Zero-based index of the current question.
    pub position: usize,
    pub total: usize,
    pub score: usize,
    /// The current question; absent once finished.
    pub question: Option<QuizQuestion>,
    /// Option chosen for the current question, if answered.
    pub selected: Option<usize>,
    pub finished: bool,
    pub band: Option<ScoreBand>,
    pub message: Option<String>,
}

impl QuizSessionResponse {
    pub fn from_session(session: &QuizSession) -> Self {
        let band = session.band();
        Self {
            position: session.position(),
            total: session.total(),
            score: session.score(),
            question: session.current_question().cloned(),
            selected: session.selected(),
            finished: session.is_finished(),
            band,
            message: band.map(|b| b.message().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuizAnswerRequest {
    pub option: usize,
}

/// Reply to an answer. `outcome` is absent when the answer was ignored:
/// the question was already answered, the pass is over, or the option does
/// not exist.
#[derive(Debug, Clone, Serialize)]
pub struct QuizAnswerResponse {
    pub outcome: Option<AnswerOutcome>,
    pub session: QuizSessionResponse,
}

// =============================================================================
// IMAGE STYLE
// =============================================================================

/// Request body for a style change. Omitted fields take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageStyleRequest {
    pub fit: Option<ImageFit>,
    pub zoom_percent: Option<u16>,
    pub offset_x: Option<i16>,
    pub offset_y: Option<i16>,
}

impl ImageStyleRequest {
    #[must_use]
    pub fn to_style(&self) -> ImageStyle {
        let defaults = ImageStyle::default();
        ImageStyle {
            fit: self.fit.unwrap_or(defaults.fit),
            zoom_percent: self.zoom_percent.unwrap_or(defaults.zoom_percent),
            offset_x: self.offset_x.unwrap_or(defaults.offset_x),
            offset_y: self.offset_y.unwrap_or(defaults.offset_y),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageStyleResponse {
    pub slide_id: String,
    pub image_index: usize,
    pub style: ImageStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_style_request_fills_defaults() {
        let request = ImageStyleRequest {
            zoom_percent: Some(150),
            ..ImageStyleRequest::default()
        };
        let style = request.to_style();
        assert_eq!(style.zoom_percent, 150);
        assert_eq!(style.fit, ImageFit::Cover);
        assert_eq!(style.offset_x, 0);
    }

    #[test]
    fn finished_session_reports_band_and_message() {
        let question = QuizQuestion {
            id: "q1".to_string(),
            question: "Sugar causes ulcers?".to_string(),
            options: vec!["Yes".to_string(), "No".to_string()],
            correct_index: 1,
            explanation: String::new(),
            empathetic_response: None,
        };
        let mut session = QuizSession::new(vec![question]);
        session.answer(1);
        session.advance();

        let response = QuizSessionResponse::from_session(&session);

        assert!(response.finished);
        assert!(response.question.is_none());
        assert_eq!(response.band, Some(ScoreBand::Perfect));
        assert_eq!(response.message.as_deref(), Some(ScoreBand::Perfect.message()));
    }

    #[test]
    fn refresh_status_is_flattened() {
        let json = serde_json::to_value(SlideRefreshJson {
            slide_id: "cover".to_string(),
            citation_count: 2,
            status: RefreshStatus::Refreshed { added: 1 },
        })
        .unwrap_or_default();
        assert_eq!(json["status"], "refreshed");
        assert_eq!(json["added"], 1);
    }
}
