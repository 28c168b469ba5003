//! # Core Type Definitions
//!
//! This module contains the data model shared by every Lectern component:
//! - Deck content (`Slide`, `SlidePatch`, `LayoutHint`, `EvidenceConfidence`)
//! - Evidence references (`Citation`, `CitationKind`)
//! - Store bookkeeping (`DeckMetadata`)
//! - Error types (`LecternError`)
//!
//! ## Ordering
//!
//! A slide never records its own position. The order of a deck is the order
//! of the `Vec<Slide>` that holds it, and the store persists that order
//! separately as `slideOrder`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Which side of the slide carries the image panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutHint {
    ImageLeft,
    #[default]
    ImageRight,
}

/// Strength of the evidence behind a slide's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceConfidence {
    High,
    #[default]
    Medium,
    Low,
}

impl EvidenceConfidence {
    /// Upper-case badge text, e.g. `HIGH`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// How a citation identifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CitationKind {
    /// Numeric bibliographic catalog identifier (PubMed PMID).
    CatalogId,
    /// Digital Object Identifier.
    Doi,
}

impl CitationKind {
    /// Display prefix used in exported source lists.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::CatalogId => "PMID: ",
            Self::Doi => "DOI: ",
        }
    }

    /// Canonical URL for an identifier of this kind.
    #[must_use]
    pub fn canonical_url(self, id: &str) -> String {
        match self {
            Self::CatalogId => format!("https://pubmed.ncbi.nlm.nih.gov/{id}/"),
            Self::Doi => format!("https://doi.org/{id}"),
        }
    }
}

// =============================================================================
// CITATION
// =============================================================================

/// One evidence reference attached to a slide.
///
/// `id` is the dedup key: within a single slide's list no two citations
/// share an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub kind: CitationKind,
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub year: String,
    pub url: String,
}

impl Citation {
    /// Build a citation whose URL is derived from its kind and identifier.
    #[must_use]
    pub fn new(
        kind: CitationKind,
        id: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        journal: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let url = kind.canonical_url(&id);
        Self {
            id,
            kind,
            title: title.into(),
            authors: authors.into(),
            journal: journal.into(),
            year: year.into(),
            url,
        }
    }

    /// Shorthand for a catalog-id (PMID) citation.
    #[must_use]
    pub fn catalog(
        id: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        journal: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self::new(CitationKind::CatalogId, id, title, authors, journal, year)
    }

    /// Identifier with its kind prefix, e.g. `PMID: 15111519`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.id)
    }
}

// =============================================================================
// IMAGE REFERENCES
// =============================================================================

/// Classification of an entry in `Slide::image_refs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRefKind {
    /// Upload encoded inline as a `data:` URL.
    Inline,
    /// External `http(s)` URL.
    Remote,
    /// Descriptive text standing in for an image not yet attached.
    Placeholder,
}

impl ImageRefKind {
    /// Classify a stored image reference.
    #[must_use]
    pub fn classify(image_ref: &str) -> Self {
        if image_ref.starts_with("data:") {
            Self::Inline
        } else if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            Self::Remote
        } else {
            Self::Placeholder
        }
    }
}

// =============================================================================
// SLIDE
// =============================================================================

/// One presentation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Stable identifier, unique across the deck and never reused.
    pub id: String,
    pub title: String,
    pub bullets: Vec<String>,
    pub layout_hint: LayoutHint,
    pub image_refs: Vec<String>,
    /// Accessible description of the image panel.
    pub image_alt: String,
    /// Free-text bibliographic query. Empty disables automated lookup.
    pub citations_query: String,
    pub citations: Vec<Citation>,
    pub evidence_confidence: EvidenceConfidence,
    pub speaker_notes: String,
    /// Stamped by the store on every write; callers never set it.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Slide {
    /// Create a slide with the given id and title and empty content.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            bullets: Vec::new(),
            layout_hint: LayoutHint::default(),
            image_refs: Vec::new(),
            image_alt: String::new(),
            citations_query: String::new(),
            citations: Vec::new(),
            evidence_confidence: EvidenceConfidence::default(),
            speaker_notes: String::new(),
            last_updated: None,
        }
    }

    #[must_use]
    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout_hint: LayoutHint) -> Self {
        self.layout_hint = layout_hint;
        self
    }

    #[must_use]
    pub fn with_images<I, S>(mut self, image_refs: I, image_alt: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_refs = image_refs.into_iter().map(Into::into).collect();
        self.image_alt = image_alt.into();
        self
    }

    #[must_use]
    pub fn with_citations(mut self, query: impl Into<String>, citations: Vec<Citation>) -> Self {
        self.citations_query = query.into();
        self.citations = citations;
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: EvidenceConfidence) -> Self {
        self.evidence_confidence = confidence;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.speaker_notes = notes.into();
        self
    }

    /// Compare everything except the store-owned write timestamp.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.last_updated = None;
        b.last_updated = None;
        a == b
    }
}

// =============================================================================
// SLIDE PATCH
// =============================================================================

/// Partial field update for a single slide.
///
/// Only fields that are `Some` are replaced. `id` and `last_updated` are not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidePatch {
    pub title: Option<String>,
    pub bullets: Option<Vec<String>>,
    pub layout_hint: Option<LayoutHint>,
    pub image_refs: Option<Vec<String>>,
    pub image_alt: Option<String>,
    pub citations_query: Option<String>,
    pub citations: Option<Vec<Citation>>,
    pub evidence_confidence: Option<EvidenceConfidence>,
    pub speaker_notes: Option<String>,
}

impl SlidePatch {
    /// True when the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the listed fields to `slide`.
    pub fn apply_to(&self, slide: &mut Slide) {
        if let Some(title) = &self.title {
            slide.title.clone_from(title);
        }
        if let Some(bullets) = &self.bullets {
            slide.bullets.clone_from(bullets);
        }
        if let Some(layout_hint) = self.layout_hint {
            slide.layout_hint = layout_hint;
        }
        if let Some(image_refs) = &self.image_refs {
            slide.image_refs.clone_from(image_refs);
        }
        if let Some(image_alt) = &self.image_alt {
            slide.image_alt.clone_from(image_alt);
        }
        if let Some(query) = &self.citations_query {
            slide.citations_query.clone_from(query);
        }
        if let Some(citations) = &self.citations {
            slide.citations.clone_from(citations);
        }
        if let Some(confidence) = self.evidence_confidence {
            slide.evidence_confidence = confidence;
        }
        if let Some(notes) = &self.speaker_notes {
            slide.speaker_notes.clone_from(notes);
        }
    }
}

// =============================================================================
// DECK METADATA
// =============================================================================

/// Bookkeeping entries held next to the slide records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// Version tag of the shipped default content the cache was built from.
    pub content_version: Option<String>,
    /// Time of the most recent full-deck write.
    pub last_updated: Option<DateTime<Utc>>,
    /// Authoritative ordering of slide ids.
    pub slide_order: Vec<String>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in Lectern.
///
/// - The core never panics; every fallible path returns `Result<T, LecternError>`
/// - Callers decide the fallback (in-memory defaults, unchanged citations)
#[derive(Debug, Error)]
pub enum LecternError {
    /// The local database could not be opened, read or written.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A stored record failed header or size validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A slide index does not address a slide in the deck.
    #[error("Slide index {index} out of range for deck of {len}")]
    InvalidIndex { index: usize, len: usize },

    /// A per-image setting addressed an image the slide does not have.
    #[error("Image index {index} out of range for slide {slide_id} ({count} images)")]
    ImageIndexOutOfRange {
        slide_id: String,
        index: usize,
        count: usize,
    },

    /// Deleting would leave the deck empty.
    #[error("A deck must keep at least one slide")]
    LastSlide,

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A file or socket operation outside the store failed.
    #[error("IO error: {0}")]
    IoError(String),
}

impl LecternError {
    /// True when stored bytes were read but could not be decoded.
    ///
    /// The store itself works; what it holds is from another format version
    /// or damaged.
    #[must_use]
    pub fn is_unreadable_record(&self) -> bool {
        matches!(self, Self::InvalidRecord(_) | Self::SerializationError(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
