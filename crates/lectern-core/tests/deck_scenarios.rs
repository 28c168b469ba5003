//! # Deck Scenario Tests
//!
//! Concrete end-to-end scenarios run against the redb store in a temporary
//! directory.
//!
//! ## Groups
//! - Split: continuation slides
//! - Merge: curated citations against fetched ones
//! - Versioning: cache reuse and reset across restarts
//! - Store: ordering and atomic replace

use lectern_core::{
    CONTENT_VERSION, CacheDecision, Citation, DeckStore, MutationEngine, RedbDeckStore,
    ResetReason, Slide, default_slides, load_deck, merge_citations,
};
use tempfile::tempdir;

// =============================================================================
// SPLIT
// =============================================================================

mod split {
    use super::*;

    /// Five bullets with a bound of three become two slides.
    #[test]
    fn five_bullets_become_two_slides() {
        let deck = vec![Slide::new("a", "Title").with_bullets(["1", "2", "3", "4", "5"])];

        let split = MutationEngine::split_oversized_slides(&deck, 3);

        assert_eq!(split.len(), 2);
        assert_eq!(split[0].id, "a");
        assert_eq!(split[0].title, "Title");
        assert_eq!(split[0].bullets, vec!["1", "2", "3"]);
        assert_eq!(split[1].id, "a_pt2");
        assert_eq!(split[1].title, "Title (cont'd)");
        assert_eq!(split[1].bullets, vec!["4", "5"]);
    }

    /// Shipped content splits into slides of at most three bullets.
    #[test]
    fn shipped_content_fits_after_split() {
        let split = MutationEngine::split_oversized_slides(&default_slides(), 3);

        assert!(split.len() > default_slides().len());
        assert!(split.iter().all(|s| s.bullets.len() <= 3));
        assert!(split.iter().any(|s| s.id == "pathophysiology_overview_pt2"));
    }
}

// =============================================================================
// MERGE
// =============================================================================

mod merge {
    use super::*;

    /// The curated entry wins; the new one is appended.
    #[test]
    fn curated_wins_new_appended() {
        let existing = vec![Citation::catalog("100", "", "", "", "")];
        let fetched = vec![
            Citation::catalog("100", "X", "", "", ""),
            Citation::catalog("200", "Y", "", "", ""),
        ];

        let merged = merge_citations(&existing, &fetched, 10);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], existing[0]);
        assert_eq!(merged[1].id, "200");
        assert_eq!(merged[1].title, "Y");
    }
}

// =============================================================================
// VERSIONING
// =============================================================================

mod versioning {
    use super::*;

    /// A stale cache is discarded and the new version written.
    #[test]
    fn stale_version_rebuilds_from_defaults() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open");
        store
            .replace_deck(&[Slide::new("stale", "Stale")], "v4")
            .expect("seed");

        let outcome = load_deck(&store, &default_slides(), "v5", 3).expect("load");

        assert_eq!(
            outcome.decision,
            CacheDecision::ResetToDefaults(ResetReason::VersionMismatch {
                stored: "v4".to_string(),
                expected: "v5".to_string(),
            })
        );
        assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
        assert!(store.load_all().expect("load").iter().all(|s| s.id != "stale"));
    }

    /// Edits made after the first run survive a restart.
    #[test]
    fn edits_survive_restart() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("deck.redb");

        {
            let store = RedbDeckStore::open(&path).expect("open");
            let first = load_deck(&store, &default_slides(), CONTENT_VERSION, 3).expect("load");
            let edited = MutationEngine::delete(&first.slides, 0);
            store.save_all(&edited).expect("save");
        }

        let store = RedbDeckStore::open(&path).expect("reopen");
        let second = load_deck(&store, &default_slides(), CONTENT_VERSION, 3).expect("load");

        assert_eq!(second.decision, CacheDecision::UseCache);
        assert_ne!(second.slides[0].id, "cover");
    }

    /// An inconsistent cache counts as empty and triggers a reset.
    #[test]
    fn inconsistent_cache_resets() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open");
        store
            .replace_deck(&[Slide::new("a", "A")], CONTENT_VERSION)
            .expect("seed");
        store.save_one(&Slide::new("orphan", "Orphan")).expect("orphan");

        let outcome = load_deck(&store, &default_slides(), CONTENT_VERSION, 3).expect("load");

        assert_eq!(
            outcome.decision,
            CacheDecision::ResetToDefaults(ResetReason::EmptyCache)
        );
        assert_eq!(outcome.slides[0].id, "cover");
    }
}

// =============================================================================
// STORE
// =============================================================================

mod store {
    use super::*;

    /// Order survives and every slide carries the write stamp.
    #[test]
    fn save_load_preserves_order_and_stamps() {
        let temp = tempdir().expect("temp dir");
        let store = RedbDeckStore::open(temp.path().join("deck.redb")).expect("open");
        let deck = MutationEngine::split_oversized_slides(&default_slides(), 3);

        let at = store.save_all(&deck).expect("save");
        let loaded = store.load_all().expect("load");

        assert_eq!(loaded.len(), deck.len());
        for (l, d) in loaded.iter().zip(&deck) {
            assert!(l.same_content(d));
            assert_eq!(l.last_updated, Some(at));
        }
        assert_eq!(store.last_updated().expect("ts"), Some(at));
    }
}
