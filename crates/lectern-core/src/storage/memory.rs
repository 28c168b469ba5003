//! In-memory deck store.

use super::{DeckStore, assemble_ordered, stamped, storage_err};
use crate::styles::ImageStyleMap;
use crate::{DeckMetadata, LecternError, Slide};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    slides: BTreeMap<String, Slide>,
    metadata: DeckMetadata,
    styles: ImageStyleMap,
}

/// Volatile `DeckStore` with the same contract as the redb backend.
#[derive(Debug, Default)]
pub struct MemoryDeckStore {
    state: Mutex<MemoryState>,
}

impl MemoryDeckStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, LecternError> {
        self.state.lock().map_err(storage_err)
    }

    fn write_deck(
        &self,
        slides: &[Slide],
        content_version: Option<&str>,
    ) -> Result<DateTime<Utc>, LecternError> {
        let now = Utc::now();
        let mut state = self.lock()?;
        state.slides = stamped(slides, now)
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        state.metadata.slide_order = slides.iter().map(|s| s.id.clone()).collect();
        state.metadata.last_updated = Some(now);
        if let Some(version) = content_version {
            state.metadata.content_version = Some(version.to_string());
        }
        Ok(now)
    }
}

impl DeckStore for MemoryDeckStore {
    fn save_all(&self, slides: &[Slide]) -> Result<DateTime<Utc>, LecternError> {
        self.write_deck(slides, None)
    }

    fn replace_deck(
        &self,
        slides: &[Slide],
        content_version: &str,
    ) -> Result<DateTime<Utc>, LecternError> {
        self.write_deck(slides, Some(content_version))
    }

    fn load_all(&self) -> Result<Vec<Slide>, LecternError> {
        let state = self.lock()?;
        Ok(assemble_ordered(
            &state.metadata.slide_order,
            state.slides.clone(),
        ))
    }

    fn save_one(&self, slide: &Slide) -> Result<DateTime<Utc>, LecternError> {
        let now = Utc::now();
        let mut slide = slide.clone();
        slide.last_updated = Some(now);
        self.lock()?.slides.insert(slide.id.clone(), slide);
        Ok(now)
    }

    fn clear(&self) -> Result<(), LecternError> {
        *self.lock()? = MemoryState::default();
        Ok(())
    }

    fn metadata(&self) -> Result<DeckMetadata, LecternError> {
        Ok(self.lock()?.metadata.clone())
    }

    fn slide_count(&self) -> Result<usize, LecternError> {
        Ok(self.lock()?.slides.len())
    }

    fn image_styles(&self) -> Result<ImageStyleMap, LecternError> {
        Ok(self.lock()?.styles.clone())
    }

    fn save_image_styles(&self, styles: &ImageStyleMap) -> Result<(), LecternError> {
        self.lock()?.styles = styles.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_preserves_order() {
        let store = MemoryDeckStore::new();
        let deck = vec![Slide::new("b", "B"), Slide::new("a", "A")];

        store.save_all(&deck).expect("save");
        let loaded = store.load_all().expect("load");

        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].same_content(&deck[0]));
        assert!(loaded[1].same_content(&deck[1]));
        assert!(loaded.iter().all(|s| s.last_updated.is_some()));
    }

    #[test]
    fn save_one_new_id_breaks_order_consistency() {
        let store = MemoryDeckStore::new();
        store.save_all(&[Slide::new("a", "A")]).expect("save");

        store.save_one(&Slide::new("b", "B")).expect("save one");

        assert_eq!(store.slide_count().expect("count"), 2);
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemoryDeckStore::new();
        store.replace_deck(&[Slide::new("a", "A")], "v5").expect("save");

        store.clear().expect("clear");

        assert_eq!(store.metadata().expect("meta"), DeckMetadata::default());
        assert_eq!(store.slide_count().expect("count"), 0);
    }
}
