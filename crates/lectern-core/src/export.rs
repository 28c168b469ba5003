//! # Document Export Module
//!
//! Lays out an ordered deck as printable pages, one page per slide.
//!
//! This module produces the page model only: a renderer (plain text and
//! JSON in the CLI, a PDF writer in the presentation UI) consumes it. Page
//! geometry is two columns: the image column on the side named by the
//! slide's layout hint and the text column opposite it.

use crate::{ImageRefKind, LayoutHint, Slide};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Label used when a slide has no descriptive image text.
pub const IMAGE_FALLBACK_LABEL: &str = "Image";

/// Footer printed on every page.
pub const PAGE_FOOTER: &str = "UNTH — Burns, Plastic & Reconstructive Surgery";

// =============================================================================
// PAGE MODEL
// =============================================================================

/// A page column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Right,
}

/// One printable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPage {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    pub slide_id: String,
    /// Title with line breaks folded to spaces.
    pub title: String,
    /// `Evidence: HIGH` / `MEDIUM` / `LOW`.
    pub evidence_badge: String,
    pub bullets: Vec<String>,
    pub image_column: Column,
    pub text_column: Column,
    /// Text shown inside the image placeholder region.
    pub image_label: String,
    /// Numbered source lines; empty when citations are excluded.
    pub sources: Vec<String>,
    pub footer: String,
}

impl ExportPage {
    /// `"<n> / <total>"`.
    #[must_use]
    pub fn page_marker(&self) -> String {
        format!("{} / {}", self.number, self.total)
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Lay out `slides` in order, one page each.
#[must_use]
pub fn paginate(slides: &[Slide], include_citations: bool) -> Vec<ExportPage> {
    let total = slides.len();
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| page_for(slide, i + 1, total, include_citations))
        .collect()
}

fn page_for(slide: &Slide, number: usize, total: usize, include_citations: bool) -> ExportPage {
    let (image_column, text_column) = match slide.layout_hint {
        LayoutHint::ImageLeft => (Column::Left, Column::Right),
        LayoutHint::ImageRight => (Column::Right, Column::Left),
    };

    let sources = if include_citations {
        slide
            .citations
            .iter()
            .enumerate()
            .map(|(i, cite)| {
                format!(
                    "{}. {} {} ({}). {}",
                    i + 1,
                    cite.authors,
                    cite.journal,
                    cite.year,
                    cite.label()
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    ExportPage {
        number,
        total,
        slide_id: slide.id.clone(),
        title: fold_lines(&slide.title),
        evidence_badge: format!("Evidence: {}", slide.evidence_confidence.label()),
        bullets: slide.bullets.clone(),
        image_column,
        text_column,
        image_label: image_label(slide),
        sources,
        footer: PAGE_FOOTER.to_string(),
    }
}

/// First image reference if it is descriptive text; uploads and URLs are
/// not printable as a label.
fn image_label(slide: &Slide) -> String {
    match slide.image_refs.first() {
        Some(first) if ImageRefKind::classify(first) == ImageRefKind::Placeholder => first.clone(),
        _ => IMAGE_FALLBACK_LABEL.to_string(),
    }
}

fn fold_lines(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// TEXT RENDERING
// =============================================================================

/// Render pages as plain text, separated by form feeds.
#[must_use]
pub fn render_text(pages: &[ExportPage]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\u{c}');
            out.push('\n');
        }
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", page.title);
        let _ = writeln!(out, "{}", page.evidence_badge);
        let _ = writeln!(out, "{}", "-".repeat(page.title.chars().count().max(12)));
        for bullet in &page.bullets {
            let _ = writeln!(out, "• {bullet}");
        }
        let _ = writeln!(out, "[{}]", page.image_label);
        if !page.sources.is_empty() {
            let _ = writeln!(out, "SOURCES:");
            for line in &page.sources {
                let _ = writeln!(out, "{line}");
            }
        }
        let _ = writeln!(out, "{}    {}", page.footer, page.page_marker());
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
