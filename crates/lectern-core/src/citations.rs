//! # Citation Merge
//!
//! Reconciles a slide's curated citations with freshly fetched ones.
//!
//! Rules:
//! - Existing entries keep their position and content, always.
//! - A fetched entry is appended only when its `id` is not yet present.
//! - The result is capped at `cap` entries by trimming fetched entries from
//!   the tail; existing entries are never dropped, so a curated list longer
//!   than `cap` stays as long as it is.

use crate::Citation;
use crate::primitives::MAX_AUTHORS_SHOWN;
use std::collections::BTreeSet;

/// Merge `fetched` into `existing` without duplicating ids.
#[must_use]
pub fn merge_citations(existing: &[Citation], fetched: &[Citation], cap: usize) -> Vec<Citation> {
    let mut seen: BTreeSet<&str> = existing.iter().map(|c| c.id.as_str()).collect();
    let mut merged = existing.to_vec();

    for cite in fetched {
        if seen.insert(cite.id.as_str()) {
            merged.push(cite.clone());
        }
    }

    merged.truncate(cap.max(existing.len()));
    merged
}

/// Join the first three author names with ", " and mark the rest as
/// "et al.".
#[must_use]
pub fn abbreviate_authors<S: AsRef<str>>(names: &[S]) -> String {
    let shown: Vec<&str> = names
        .iter()
        .take(MAX_AUTHORS_SHOWN)
        .map(AsRef::as_ref)
        .collect();
    let mut joined = shown.join(", ");
    if names.len() > MAX_AUTHORS_SHOWN {
        joined.push_str(" et al.");
    }
    joined
}
