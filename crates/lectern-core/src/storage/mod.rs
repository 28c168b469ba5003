//! # Deck Storage
//!
//! The `DeckStore` trait and its two backends:
//! - `RedbDeckStore`: disk-backed, ACID, survives restarts
//! - `MemoryDeckStore`: volatile, used for tests and storage-less sessions
//!
//! ## Layout
//!
//! Slide records are keyed by slide id. Ordering lives in a separate
//! metadata entry (`slideOrder`) so that the storage position of a record
//! never matters. Metadata entries are keyed by name:
//! `lastUpdated`, `slideOrder`, `contentVersion`, `imageStyles`.

mod memory;
mod redb_store;

pub use memory::MemoryDeckStore;
pub use redb_store::RedbDeckStore;

use crate::styles::ImageStyleMap;
use crate::{DeckMetadata, LecternError, Slide};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Metadata key: time of the last full-deck write.
pub const META_LAST_UPDATED: &str = "lastUpdated";
/// Metadata key: ordered list of slide ids.
pub const META_SLIDE_ORDER: &str = "slideOrder";
/// Metadata key: version tag of the default content the cache holds.
pub const META_CONTENT_VERSION: &str = "contentVersion";
/// Metadata key: per-image style overrides.
pub const META_IMAGE_STYLES: &str = "imageStyles";

// =============================================================================
// DECKSTORE TRAIT
// =============================================================================

/// Durable storage for one ordered deck and its metadata.
///
/// Methods take `&self` so a single handle can be shared between the
/// controller and a scheduled auto-save; backends synchronise internally.
pub trait DeckStore: Send + Sync {
    /// Atomically replace every stored slide with `slides`, stamp each with
    /// the write time, record their order as `slideOrder` and set
    /// `lastUpdated`. Returns the write time.
    fn save_all(&self, slides: &[Slide]) -> Result<DateTime<Utc>, LecternError>;

    /// Same as [`DeckStore::save_all`], also writing `contentVersion`, in a
    /// single atomic step.
    fn replace_deck(
        &self,
        slides: &[Slide],
        content_version: &str,
    ) -> Result<DateTime<Utc>, LecternError>;

    /// Slides in `slideOrder`. Empty when the order and the records
    /// disagree in any way.
    fn load_all(&self) -> Result<Vec<Slide>, LecternError>;

    /// Upsert one slide by id without touching `slideOrder`.
    fn save_one(&self, slide: &Slide) -> Result<DateTime<Utc>, LecternError>;

    /// Remove every slide record and every metadata entry.
    fn clear(&self) -> Result<(), LecternError>;

    /// All metadata entries.
    fn metadata(&self) -> Result<DeckMetadata, LecternError>;

    /// Number of stored slide records.
    fn slide_count(&self) -> Result<usize, LecternError>;

    /// Stored per-image style overrides (empty when none were saved).
    fn image_styles(&self) -> Result<ImageStyleMap, LecternError>;

    /// Replace the stored per-image style overrides.
    fn save_image_styles(&self, styles: &ImageStyleMap) -> Result<(), LecternError>;

    /// Time of the last full-deck write.
    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, LecternError> {
        Ok(self.metadata()?.last_updated)
    }

    /// Version tag of the default content held in the store.
    fn content_version(&self) -> Result<Option<String>, LecternError> {
        Ok(self.metadata()?.content_version)
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Copies of `slides` stamped with `at`.
pub(crate) fn stamped(slides: &[Slide], at: DateTime<Utc>) -> Vec<Slide> {
    slides
        .iter()
        .map(|slide| {
            let mut slide = slide.clone();
            slide.last_updated = Some(at);
            slide
        })
        .collect()
}

/// Rebuild the ordered deck from `order` and the stored records.
///
/// Returns an empty deck when the order length differs from the record
/// count or any ordered id has no record.
pub(crate) fn assemble_ordered(
    order: &[String],
    mut records: BTreeMap<String, Slide>,
) -> Vec<Slide> {
    if order.len() != records.len() {
        return Vec::new();
    }
    let mut deck = Vec::with_capacity(order.len());
    for id in order {
        match records.remove(id) {
            Some(slide) => deck.push(slide),
            None => return Vec::new(),
        }
    }
    deck
}

/// Build a storage error from any displayable backend error.
pub(crate) fn storage_err(e: impl std::fmt::Display) -> LecternError {
    LecternError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> BTreeMap<String, Slide> {
        ids.iter()
            .map(|id| ((*id).to_string(), Slide::new(*id, "T")))
            .collect()
    }

    fn order(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn assemble_follows_recorded_order() {
        let deck = assemble_ordered(&order(&["c", "a", "b"]), records(&["a", "b", "c"]));
        let ids: Vec<&str> = deck.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn assemble_rejects_length_mismatch() {
        assert!(assemble_ordered(&order(&["a"]), records(&["a", "b"])).is_empty());
    }

    #[test]
    fn assemble_rejects_unresolvable_id() {
        assert!(assemble_ordered(&order(&["a", "x"]), records(&["a", "b"])).is_empty());
    }

    #[test]
    fn assemble_rejects_repeated_id() {
        assert!(assemble_ordered(&order(&["a", "a"]), records(&["a", "b"])).is_empty());
    }
}
