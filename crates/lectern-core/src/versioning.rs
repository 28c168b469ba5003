//! # Content Versioning
//!
//! Decides at startup whether the cached deck can be trusted or whether the
//! shipped default content must be reinstalled.
//!
//! The cache is used only when all three hold:
//! 1. A content version tag is stored
//! 2. It equals the version this build ships
//! 3. The cached deck is non-empty (order and records agree)
//!
//! Otherwise the defaults are split into continuation slides, written over
//! the whole store in one step together with the new version tag, and
//! returned. This is the only destructive write outside of an explicit
//! clear.
//!
//! A cache whose records cannot be decoded (written under another record
//! format, or damaged) is unusable, not a storage failure: the store is
//! cleared and the defaults are installed over it.

use crate::mutation::MutationEngine;
use crate::storage::DeckStore;
use crate::{LecternError, Slide};
use chrono::{DateTime, Utc};

/// Why the cache was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    /// No version tag in the store (first run or cleared store).
    NoVersion,
    /// The store holds content from another release.
    VersionMismatch { stored: String, expected: String },
    /// The version matches but no usable slides could be read.
    EmptyCache,
    /// Stored records could not be decoded.
    UnreadableCache { detail: String },
}

/// Outcome of the cache-vs-defaults decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    UseCache,
    ResetToDefaults(ResetReason),
}

impl CacheDecision {
    /// Decide from the stored tag, the expected tag and the number of
    /// slides the cache yielded.
    #[must_use]
    pub fn decide(stored_version: Option<&str>, expected: &str, cached_len: usize) -> Self {
        match stored_version {
            None => Self::ResetToDefaults(ResetReason::NoVersion),
            Some(stored) if stored != expected => {
                Self::ResetToDefaults(ResetReason::VersionMismatch {
                    stored: stored.to_string(),
                    expected: expected.to_string(),
                })
            }
            Some(_) if cached_len == 0 => Self::ResetToDefaults(ResetReason::EmptyCache),
            Some(_) => Self::UseCache,
        }
    }

    #[must_use]
    pub fn uses_cache(&self) -> bool {
        matches!(self, Self::UseCache)
    }
}

/// The deck chosen at startup.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub slides: Vec<Slide>,
    pub decision: CacheDecision,
    /// `lastUpdated` as stored after the load completed.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Shipped defaults after the continuation split.
#[must_use]
pub fn prepare_defaults(defaults: &[Slide], max_bullets: usize) -> Vec<Slide> {
    MutationEngine::split_oversized_slides(defaults, max_bullets)
}

fn read_cache(store: &dyn DeckStore) -> Result<(Vec<Slide>, Option<String>), LecternError> {
    Ok((store.load_all()?, store.content_version()?))
}

/// Run the versioning decision against `store`.
///
/// Errors mean the store itself is unusable; the caller falls back to
/// [`prepare_defaults`] in memory.
pub fn load_deck(
    store: &dyn DeckStore,
    defaults: &[Slide],
    expected_version: &str,
    max_bullets: usize,
) -> Result<LoadOutcome, LecternError> {
    let (cached, decision) = match read_cache(store) {
        Ok((cached, stored_version)) => {
            let decision =
                CacheDecision::decide(stored_version.as_deref(), expected_version, cached.len());
            (cached, decision)
        }
        Err(e) if e.is_unreadable_record() => {
            // Metadata may be unreadable too; start from an empty store.
            store.clear()?;
            let reason = ResetReason::UnreadableCache {
                detail: e.to_string(),
            };
            (Vec::new(), CacheDecision::ResetToDefaults(reason))
        }
        Err(e) => return Err(e),
    };

    let slides = if decision.uses_cache() {
        cached
    } else {
        let rebuilt = prepare_defaults(defaults, max_bullets);
        store.replace_deck(&rebuilt, expected_version)?;
        rebuilt
    };

    Ok(LoadOutcome {
        slides,
        decision,
        last_updated: store.last_updated()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckMetadata;
    use crate::storage::MemoryDeckStore;
    use crate::styles::ImageStyleMap;

    /// A memory store whose `load_all` always fails with `fault()`.
    struct FaultyStore {
        inner: MemoryDeckStore,
        fault: fn() -> LecternError,
    }

    impl DeckStore for FaultyStore {
        fn save_all(&self, slides: &[Slide]) -> Result<DateTime<Utc>, LecternError> {
            self.inner.save_all(slides)
        }
        fn replace_deck(&self, slides: &[Slide], version: &str) -> Result<DateTime<Utc>, LecternError> {
            self.inner.replace_deck(slides, version)
        }
        fn load_all(&self) -> Result<Vec<Slide>, LecternError> {
            Err((self.fault)())
        }
        fn save_one(&self, slide: &Slide) -> Result<DateTime<Utc>, LecternError> {
            self.inner.save_one(slide)
        }
        fn clear(&self) -> Result<(), LecternError> {
            self.inner.clear()
        }
        fn metadata(&self) -> Result<DeckMetadata, LecternError> {
            self.inner.metadata()
        }
        fn slide_count(&self) -> Result<usize, LecternError> {
            self.inner.slide_count()
        }
        fn image_styles(&self) -> Result<ImageStyleMap, LecternError> {
            self.inner.image_styles()
        }
        fn save_image_styles(&self, styles: &ImageStyleMap) -> Result<(), LecternError> {
            self.inner.save_image_styles(styles)
        }
    }

    fn defaults() -> Vec<Slide> {
        vec![
            Slide::new("cover", "Cover"),
            Slide::new("long", "Long").with_bullets(["1", "2", "3", "4", "5"]),
        ]
    }

    #[test]
    fn decide_covers_every_branch() {
        assert_eq!(
            CacheDecision::decide(None, "v5", 3),
            CacheDecision::ResetToDefaults(ResetReason::NoVersion)
        );
        assert_eq!(
            CacheDecision::decide(Some("v4"), "v5", 3),
            CacheDecision::ResetToDefaults(ResetReason::VersionMismatch {
                stored: "v4".to_string(),
                expected: "v5".to_string(),
            })
        );
        assert_eq!(
            CacheDecision::decide(Some("v5"), "v5", 0),
            CacheDecision::ResetToDefaults(ResetReason::EmptyCache)
        );
        assert_eq!(CacheDecision::decide(Some("v5"), "v5", 1), CacheDecision::UseCache);
    }

    #[test]
    fn first_run_installs_split_defaults() {
        let store = MemoryDeckStore::new();

        let outcome = load_deck(&store, &defaults(), "v5", 3).expect("load");

        let ids: Vec<&str> = outcome.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["cover", "long", "long_pt2"]);
        assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
        assert_eq!(store.load_all().expect("reload").len(), 3);
        assert!(outcome.last_updated.is_some());
    }

    #[test]
    fn matching_version_keeps_user_edits() {
        let store = MemoryDeckStore::new();
        let edited = vec![Slide::new("mine", "My slide")];
        store.replace_deck(&edited, "v5").expect("seed");

        let outcome = load_deck(&store, &defaults(), "v5", 3).expect("load");

        assert_eq!(outcome.decision, CacheDecision::UseCache);
        assert_eq!(outcome.slides.len(), 1);
        assert_eq!(outcome.slides[0].id, "mine");
    }

    #[test]
    fn stale_version_discards_cache() {
        let store = MemoryDeckStore::new();
        store
            .replace_deck(&[Slide::new("old", "Old")], "v4")
            .expect("seed");

        let outcome = load_deck(&store, &defaults(), "v5", 3).expect("load");

        assert!(!outcome.decision.uses_cache());
        assert!(outcome.slides.iter().all(|s| s.id != "old"));
        assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
    }

    #[test]
    fn undecodable_cache_is_replaced_by_defaults() {
        let store = FaultyStore {
            inner: MemoryDeckStore::new(),
            fault: || LecternError::InvalidRecord("Unsupported version: 0".into()),
        };
        store
            .inner
            .replace_deck(&[Slide::new("old", "Old")], "v5")
            .expect("seed");

        let outcome = load_deck(&store, &defaults(), "v5", 3).expect("load");

        assert!(matches!(
            outcome.decision,
            CacheDecision::ResetToDefaults(ResetReason::UnreadableCache { .. })
        ));
        assert_eq!(outcome.slides.len(), 3);
        assert_eq!(store.content_version().expect("version").as_deref(), Some("v5"));
        assert!(outcome.last_updated.is_some());
    }

    #[test]
    fn storage_failure_is_still_an_error() {
        let store = FaultyStore {
            inner: MemoryDeckStore::new(),
            fault: || LecternError::StorageError("locked".into()),
        };

        let result = load_deck(&store, &defaults(), "v5", 3);

        assert!(matches!(result, Err(LecternError::StorageError(_))));
        assert_eq!(store.content_version().expect("version"), None);
    }
}
