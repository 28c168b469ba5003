//! # lectern-core
//!
//! The deterministic deck engine for Lectern - THE LOGIC.
//!
//! This crate holds everything about a lecture deck that does not need a
//! network or a runtime:
//! - `types`: slides, citations, metadata, errors
//! - `mutation`: pure edits over an ordered deck
//! - `citations`: merge of curated and fetched citations
//! - `versioning`: cache-vs-defaults decision at startup
//! - `storage`: the `DeckStore` trait with redb and in-memory backends
//! - `styles`, `quiz`, `export`, `content`: per-image styles, quiz scoring,
//!   page layout for printing, shipped default content
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never panics; every fallible path returns `Result<T, LecternError>`
//! - Logs nothing; the app layer decides what to report

// =============================================================================
// MODULES
// =============================================================================

pub mod citations;
pub mod content;
pub mod export;
pub mod formats;
pub mod mutation;
pub mod primitives;
pub mod quiz;
pub mod storage;
pub mod styles;
pub mod types;
pub mod versioning;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Citation, CitationKind, DeckMetadata, EvidenceConfidence, ImageRefKind, LayoutHint,
    LecternError, Slide, SlidePatch,
};

// =============================================================================
// RE-EXPORTS: Deck Engine
// =============================================================================

pub use citations::{abbreviate_authors, merge_citations};
pub use content::{CONTENT_VERSION, default_quiz, default_slides};
pub use export::{Column, ExportPage, paginate, render_text};
pub use mutation::MutationEngine;
pub use quiz::{AnswerOutcome, QuizQuestion, QuizSession, ScoreBand};
pub use storage::{DeckStore, MemoryDeckStore, RedbDeckStore};
pub use styles::{ImageFit, ImageStyle, ImageStyleMap};
pub use versioning::{CacheDecision, LoadOutcome, ResetReason, load_deck, prepare_defaults};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{RecordHeader, decode_record, encode_record};
