//! # redb-backed Deck Storage
//!
//! A disk-backed deck store using the redb embedded database.
//!
//! redb provides what the deck needs from its local medium:
//! - ACID write transactions, so a full-deck replace is clear-then-write
//!   inside one commit and a reader sees either the old or the new deck
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! Values are encoded with the record format (`LECT` header + postcard).

use super::{
    DeckStore, META_CONTENT_VERSION, META_IMAGE_STYLES, META_LAST_UPDATED, META_SLIDE_ORDER,
    assemble_ordered, stamped, storage_err,
};
use crate::formats::{decode_record, encode_record};
use crate::styles::ImageStyleMap;
use crate::{DeckMetadata, LecternError, Slide};
use chrono::{DateTime, Utc};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// Table for slides: slide id -> encoded Slide
const SLIDES: TableDefinition<&str, &[u8]> = TableDefinition::new("slides");

/// Table for metadata: entry name -> encoded value
const METADATA: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// A disk-backed deck store using redb.
pub struct RedbDeckStore {
    db: Database,
}

impl std::fmt::Debug for RedbDeckStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbDeckStore").finish_non_exhaustive()
    }
}

impl RedbDeckStore {
    /// Open or create a deck database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LecternError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(storage_err)?;
            let _ = write_txn.open_table(SLIDES).map_err(storage_err)?;
            let _ = write_txn.open_table(METADATA).map_err(storage_err)?;
            write_txn.commit().map_err(storage_err)?;
        }

        Ok(Self { db })
    }

    /// Replace the slide table and ordering inside `write_txn`.
    fn write_deck(
        write_txn: &WriteTransaction,
        slides: &[Slide],
        at: DateTime<Utc>,
    ) -> Result<(), LecternError> {
        // Drop and recreate so no record from the previous deck survives.
        write_txn.delete_table(SLIDES).map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(SLIDES).map_err(storage_err)?;
            for slide in stamped(slides, at) {
                let bytes = encode_record(&slide)?;
                table
                    .insert(slide.id.as_str(), bytes.as_slice())
                    .map_err(storage_err)?;
            }
        }

        let order: Vec<String> = slides.iter().map(|s| s.id.clone()).collect();
        let mut meta = write_txn.open_table(METADATA).map_err(storage_err)?;
        meta.insert(META_SLIDE_ORDER, encode_record(&order)?.as_slice())
            .map_err(storage_err)?;
        meta.insert(META_LAST_UPDATED, encode_record(&at)?.as_slice())
            .map_err(storage_err)?;
        Ok(())
    }

    /// Read and decode one metadata entry.
    fn read_meta<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LecternError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(METADATA).map_err(storage_err)?;
        match table.get(key).map_err(storage_err)? {
            Some(value) => Ok(Some(decode_record(value.value())?)),
            None => Ok(None),
        }
    }

    /// Encode and write one metadata entry in its own transaction.
    fn write_meta<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), LecternError> {
        let bytes = encode_record(value)?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(METADATA).map_err(storage_err)?;
            table.insert(key, bytes.as_slice()).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)
    }
}

// =============================================================================
// DECKSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl DeckStore for RedbDeckStore {
    fn save_all(&self, slides: &[Slide]) -> Result<DateTime<Utc>, LecternError> {
        let now = Utc::now();
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        Self::write_deck(&write_txn, slides, now)?;
        write_txn.commit().map_err(storage_err)?;
        Ok(now)
    }

    fn replace_deck(
        &self,
        slides: &[Slide],
        content_version: &str,
    ) -> Result<DateTime<Utc>, LecternError> {
        let now = Utc::now();
        let version = encode_record(&content_version.to_string())?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        Self::write_deck(&write_txn, slides, now)?;
        {
            let mut meta = write_txn.open_table(METADATA).map_err(storage_err)?;
            meta.insert(META_CONTENT_VERSION, version.as_slice())
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(now)
    }

    fn load_all(&self) -> Result<Vec<Slide>, LecternError> {
        // One read transaction for order and records: a consistent snapshot.
        let read_txn = self.db.begin_read().map_err(storage_err)?;

        let order: Vec<String> = {
            let meta = read_txn.open_table(METADATA).map_err(storage_err)?;
            match meta.get(META_SLIDE_ORDER).map_err(storage_err)? {
                Some(value) => decode_record(value.value())?,
                None => Vec::new(),
            }
        };

        let mut records = BTreeMap::new();
        let table = read_txn.open_table(SLIDES).map_err(storage_err)?;
        for entry in table.iter().map_err(storage_err)? {
            let (key, value) = entry.map_err(storage_err)?;
            let slide: Slide = decode_record(value.value())?;
            records.insert(key.value().to_string(), slide);
        }

        Ok(assemble_ordered(&order, records))
    }

    fn save_one(&self, slide: &Slide) -> Result<DateTime<Utc>, LecternError> {
        let now = Utc::now();
        let mut slide = slide.clone();
        slide.last_updated = Some(now);
        let bytes = encode_record(&slide)?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(SLIDES).map_err(storage_err)?;
            table
                .insert(slide.id.as_str(), bytes.as_slice())
                .map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(now)
    }

    fn clear(&self) -> Result<(), LecternError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        write_txn.delete_table(SLIDES).map_err(storage_err)?;
        write_txn.delete_table(METADATA).map_err(storage_err)?;
        let _ = write_txn.open_table(SLIDES).map_err(storage_err)?;
        let _ = write_txn.open_table(METADATA).map_err(storage_err)?;
        write_txn.commit().map_err(storage_err)
    }

    fn metadata(&self) -> Result<DeckMetadata, LecternError> {
        Ok(DeckMetadata {
            content_version: self.read_meta(META_CONTENT_VERSION)?,
            last_updated: self.read_meta(META_LAST_UPDATED)?,
            slide_order: self.read_meta(META_SLIDE_ORDER)?.unwrap_or_default(),
        })
    }

    fn slide_count(&self) -> Result<usize, LecternError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(SLIDES).map_err(storage_err)?;
        let count = table.len().map_err(storage_err)?;
        Ok(count as usize)
    }

    fn image_styles(&self) -> Result<ImageStyleMap, LecternError> {
        Ok(self.read_meta(META_IMAGE_STYLES)?.unwrap_or_default())
    }

    fn save_image_styles(&self, styles: &ImageStyleMap) -> Result<(), LecternError> {
        self.write_meta(META_IMAGE_STYLES, styles)
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>, LecternError> {
        self.read_meta(META_LAST_UPDATED)
    }

    fn content_version(&self) -> Result<Option<String>, LecternError> {
        self.read_meta(META_CONTENT_VERSION)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::Citation;
    use crate::styles::ImageStyle;
    use crate::versioning::{CacheDecision, ResetReason, load_deck};
    use tempfile::tempdir;

    fn sample_deck() -> Vec<Slide> {
        vec![
            Slide::new("cover", "Diabetic Foot Ulcer").with_bullets(["UNTH", "Department of Surgery"]),
            Slide::new("pathophysiology", "Pathophysiology")
                .with_bullets(["Neuropathy"])
                .with_citations(
                    "diabetic foot pathophysiology",
                    vec![Citation::catalog("15111519", "Pathogenesis", "Boulton AJM", "N Engl J Med", "2004")],
                ),
            Slide::new("anatomy", "Anatomy"),
        ]
    }

    fn assert_same_deck(loaded: &[Slide], expected: &[Slide]) {
        assert_eq!(loaded.len(), expected.len());
        for (l, e) in loaded.iter().zip(expected) {
            assert!(l.same_content(e), "{} differs from {}", l.id, e.id);
        }
    }

    #[test]
    fn save_all_then_load_all_roundtrip() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");

        let written_at = store.save_all(&sample_deck()).expect("save");
        let loaded = store.load_all().expect("load");

        assert_same_deck(&loaded, &sample_deck());
        assert!(loaded.iter().all(|s| s.last_updated == Some(written_at)));
        assert_eq!(store.last_updated().expect("ts"), Some(written_at));
    }

    #[test]
    fn order_is_independent_of_key_order() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        // Keys sort as a, m, z; the deck order is z, a, m.
        let deck = vec![Slide::new("z", "Z"), Slide::new("a", "A"), Slide::new("m", "M")];

        store.save_all(&deck).expect("save");

        let ids: Vec<String> = store.load_all().expect("load").into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
        assert_eq!(store.metadata().expect("meta").slide_order, ids);
    }

    #[test]
    fn save_all_replaces_previous_deck() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");

        store.save_all(&sample_deck()).expect("first save");
        store.save_all(&[Slide::new("only", "Only")]).expect("second save");

        assert_eq!(store.slide_count().expect("count"), 1);
        let loaded = store.load_all().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "only");
    }

    #[test]
    fn empty_store_loads_empty_deck() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");

        assert!(store.load_all().expect("load").is_empty());
        assert_eq!(store.last_updated().expect("ts"), None);
        assert_eq!(store.content_version().expect("version"), None);
    }

    #[test]
    fn save_one_updates_in_place_without_touching_order() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        store.save_all(&sample_deck()).expect("save");

        let mut edited = sample_deck()[1].clone();
        edited.title = "Edited".to_string();
        store.save_one(&edited).expect("save one");

        let loaded = store.load_all().expect("load");
        assert_eq!(loaded[1].title, "Edited");
        assert_eq!(
            store.metadata().expect("meta").slide_order,
            vec!["cover", "pathophysiology", "anatomy"]
        );
    }

    #[test]
    fn save_one_insert_without_order_update_invalidates_cache() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        store.save_all(&sample_deck()).expect("save");

        store.save_one(&Slide::new("orphan", "Orphan")).expect("save one");

        assert_eq!(store.slide_count().expect("count"), 4);
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn replace_deck_writes_version_atomically() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");

        store.replace_deck(&sample_deck(), "v5").expect("replace");

        let meta = store.metadata().expect("meta");
        assert_eq!(meta.content_version.as_deref(), Some("v5"));
        assert_eq!(meta.slide_order.len(), 3);
        assert!(meta.last_updated.is_some());
    }

    #[test]
    fn clear_removes_slides_and_metadata() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        store.replace_deck(&sample_deck(), "v5").expect("replace");

        store.clear().expect("clear");

        assert_eq!(store.slide_count().expect("count"), 0);
        assert_eq!(store.metadata().expect("meta"), DeckMetadata::default());
        assert!(store.image_styles().expect("styles").is_empty());
    }

    #[test]
    fn image_styles_persist() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        let slide = Slide::new("a", "A").with_images(["foot"], "alt");
        let mut styles = ImageStyleMap::new();
        styles
            .set_style(
                &slide,
                0,
                ImageStyle {
                    zoom_percent: 150,
                    ..ImageStyle::default()
                },
            )
            .expect("set");

        store.save_image_styles(&styles).expect("save styles");

        assert_eq!(store.image_styles().expect("load styles"), styles);
    }

    #[test]
    fn recovery_persistence_after_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("deck.redb");

        // Phase 1: write
        {
            let store = RedbDeckStore::open(&db_path).expect("open db");
            store.replace_deck(&sample_deck(), "v5").expect("replace");
        }
        // Store dropped here, simulating process exit

        // Phase 2: reopen and verify
        {
            let store = RedbDeckStore::open(&db_path).expect("reopen db");
            assert_same_deck(&store.load_all().expect("load"), &sample_deck());
            assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
        }
    }

    /// Overwrite one raw entry, bypassing the record encoder.
    fn write_raw(store: &RedbDeckStore, table: TableDefinition<&str, &[u8]>, key: &str, bytes: &[u8]) {
        let write_txn = store.db.begin_write().expect("begin write");
        {
            let mut table = write_txn.open_table(table).expect("open table");
            table.insert(key, bytes).expect("insert");
        }
        write_txn.commit().expect("commit");
    }

    #[test]
    fn undecodable_slide_record_resets_to_defaults() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("deck.redb");
        {
            let store = RedbDeckStore::open(&db_path).expect("open db");
            load_deck(&store, &sample_deck(), "v5", 3).expect("seed");
            write_raw(&store, SLIDES, "cover", b"LECT\x00garbage");
            assert!(matches!(store.load_all(), Err(LecternError::InvalidRecord(_))));
        }

        let store = RedbDeckStore::open(&db_path).expect("reopen db");
        let outcome = load_deck(&store, &sample_deck(), "v5", 3).expect("load");

        assert!(matches!(
            outcome.decision,
            CacheDecision::ResetToDefaults(ResetReason::UnreadableCache { .. })
        ));
        assert_same_deck(&outcome.slides, &sample_deck());

        // The store is healthy again: the next start uses the cache.
        let again = load_deck(&store, &sample_deck(), "v5", 3).expect("reload");
        assert_eq!(again.decision, CacheDecision::UseCache);
    }

    #[test]
    fn metadata_from_older_record_format_resets_to_defaults() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open db");
        load_deck(&store, &sample_deck(), "v5", 3).expect("seed");
        let mut styles = ImageStyleMap::new();
        styles
            .set_style(&Slide::new("a", "A").with_images(["foot"], "alt"), 0, ImageStyle::default())
            .expect("set");
        store.save_image_styles(&styles).expect("styles");
        for key in [META_CONTENT_VERSION, META_IMAGE_STYLES] {
            write_raw(&store, METADATA, key, b"LECT\x00old");
        }

        let outcome = load_deck(&store, &sample_deck(), "v5", 3).expect("load");

        assert!(!outcome.decision.uses_cache());
        assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
        assert!(store.image_styles().expect("styles").is_empty());
    }
}
