//! # Deck Controller
//!
//! The single owner of the live deck: the slide list, the current slide,
//! the per-image style table, the store handle and the auto-save timer.
//!
//! ## Persistence
//!
//! - Startup runs content versioning and never schedules a save
//! - Every edit that changes the deck (re)starts the debounced auto-save
//! - A citation refresh saves immediately
//! - Writes are serialised and numbered: a snapshot older than one already
//!   committed is dropped, even if its blocking write outlived an abort
//! - When the store is unavailable the controller keeps working in memory
//!   and persists nothing until a reset clears the store

use crate::config::AppConfig;
use crate::resolver::{CitationResolver, RefreshStatus, SlideRefresh};
use crate::scheduler::Debouncer;
use chrono::{DateTime, Utc};
use lectern_core::{
    CONTENT_VERSION, DeckMetadata, DeckStore, ImageStyle, ImageStyleMap, LecternError,
    MutationEngine, RedbDeckStore, Slide, SlidePatch, default_slides, load_deck,
    prepare_defaults,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Where the live deck is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckSource {
    Persistent,
    InMemory,
}

/// Knobs the controller needs from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub max_bullets_per_slide: usize,
}

impl ControllerSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: config.autosave.debounce(),
            max_bullets_per_slide: config.deck.max_bullets_per_slide,
        }
    }
}

pub struct DeckController {
    slides: Vec<Slide>,
    current: usize,
    store: Option<Arc<dyn DeckStore>>,
    /// The store handed in at construction, kept after a load failure so a
    /// reset can clear it and try again.
    backing: Option<Arc<dyn DeckStore>>,
    styles: ImageStyleMap,
    autosave: Debouncer,
    /// Number of the newest snapshot handed to a writer.
    generation: u64,
    /// Number of the newest snapshot committed to the store.
    committed: Arc<Mutex<u64>>,
    settings: ControllerSettings,
    resolver: CitationResolver,
    last_updated: Option<DateTime<Utc>>,
}

impl DeckController {
    /// A controller with no deck loaded yet. Call [`DeckController::load`].
    pub fn new(
        store: Option<Arc<dyn DeckStore>>,
        resolver: CitationResolver,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            slides: Vec::new(),
            current: 0,
            backing: store.clone(),
            store,
            styles: ImageStyleMap::new(),
            autosave: Debouncer::new(),
            generation: 0,
            committed: Arc::new(Mutex::new(0)),
            settings,
            resolver,
            last_updated: None,
        }
    }

    /// Open the configured database and load the deck.
    ///
    /// A database that cannot be opened is not an error: the controller
    /// starts in memory with the shipped content.
    pub fn open(config: &AppConfig) -> Result<Self, LecternError> {
        let resolver = CitationResolver::from_config(&config.citations)
            .map_err(|e| LecternError::ConfigError(e.to_string()))?;

        let store: Option<Arc<dyn DeckStore>> = match RedbDeckStore::open(&config.store.path) {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::warn!(
                    path = %config.store.path.display(),
                    error = %e,
                    "Deck database unavailable, working in memory"
                );
                None
            }
        };

        let mut controller = Self::new(store, resolver, ControllerSettings::from_config(config));
        controller.load();
        Ok(controller)
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Load the deck through content versioning. Does not schedule a save.
    pub fn load(&mut self) {
        self.autosave.cancel();
        self.current = 0;
        let defaults = default_slides();

        if let Some(store) = &self.store {
            match load_deck(
                store.as_ref(),
                &defaults,
                CONTENT_VERSION,
                self.settings.max_bullets_per_slide,
            ) {
                Ok(outcome) => {
                    tracing::info!(
                        count = outcome.slides.len(),
                        decision = ?outcome.decision,
                        "Deck loaded"
                    );
                    self.slides = outcome.slides;
                    self.last_updated = outcome.last_updated;
                    self.styles = store.image_styles().unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "Cannot read image styles, using defaults");
                        ImageStyleMap::new()
                    });
                    self.styles.prune(&self.slides);
                    return;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Deck store failed, working in memory");
                    self.store = None;
                }
            }
        }

        self.slides = prepare_defaults(&defaults, self.settings.max_bullets_per_slide);
        self.styles = ImageStyleMap::new();
        self.last_updated = None;
    }

    /// Clear the store and reinstall the shipped content.
    ///
    /// A store dropped by an earlier failed load is cleared too, and is used
    /// again when clearing succeeds.
    pub fn reset(&mut self) {
        self.autosave.cancel();
        if let Some(store) = self.backing.clone() {
            match store.clear() {
                Ok(()) => self.store = Some(store),
                Err(e) => tracing::warn!(error = %e, "Cannot clear deck store"),
            }
        }
        self.load();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn source(&self) -> DeckSource {
        if self.store.is_some() {
            DeckSource::Persistent
        } else {
            DeckSource::InMemory
        }
    }

    pub fn resolver(&self) -> &CitationResolver {
        &self.resolver
    }

    /// Time of the last full-deck write, as the store reports it now.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match &self.store {
            Some(store) => store.last_updated().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Cannot read lastUpdated");
                self.last_updated
            }),
            None => self.last_updated,
        }
    }

    /// Stored bookkeeping entries, when a store is attached and readable.
    pub fn metadata(&self) -> Option<DeckMetadata> {
        let store = self.store.as_ref()?;
        store
            .metadata()
            .map_err(|e| tracing::warn!(error = %e, "Cannot read deck metadata"))
            .ok()
    }

    pub fn is_autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Style of image `image_index` on slide `slide_index`, if it exists.
    pub fn image_style(&self, slide_index: usize, image_index: usize) -> Option<ImageStyle> {
        let slide = self.slides.get(slide_index)?;
        self.styles.style_for(slide, image_index)
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Apply `patch` to the slide at `index`.
    pub fn update_slide(&mut self, index: usize, patch: &SlidePatch) -> Result<(), LecternError> {
        MutationEngine::check_index(&self.slides, index)?;
        if patch.is_empty() {
            return Ok(());
        }
        self.slides = MutationEngine::update(&self.slides, index, patch);
        if patch.image_refs.is_some() {
            self.styles.prune(&self.slides);
        }
        self.schedule_autosave();
        Ok(())
    }

    /// Insert a blank slide after the current one and move to it.
    pub fn add_slide(&mut self) -> usize {
        let blank = MutationEngine::blank_slide(&self.slides);
        self.slides = MutationEngine::insert_after(&self.slides, self.current, blank);
        self.current += 1;
        self.schedule_autosave();
        self.current
    }

    /// Duplicate the slide at `index` and move to the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> Result<usize, LecternError> {
        MutationEngine::check_index(&self.slides, index)?;
        let original_id = self.slides[index].id.clone();
        self.slides = MutationEngine::duplicate(&self.slides, index);
        self.current = index + 1;
        let copy_id = self.slides[self.current].id.clone();
        self.styles.copy_slide(&original_id, &copy_id);
        self.schedule_autosave();
        Ok(self.current)
    }

    pub fn duplicate_current(&mut self) -> Result<usize, LecternError> {
        self.duplicate_slide(self.current)
    }

    /// Delete the slide at `index`. The last remaining slide is kept.
    pub fn delete_slide(&mut self, index: usize) -> Result<(), LecternError> {
        MutationEngine::check_delete(&self.slides, index)?;
        self.slides = MutationEngine::delete(&self.slides, index);
        self.current = self.current.min(self.slides.len().saturating_sub(1));
        self.styles.prune(&self.slides);
        self.schedule_autosave();
        Ok(())
    }

    pub fn delete_current(&mut self) -> Result<(), LecternError> {
        self.delete_slide(self.current)
    }

    /// Customise one image's display.
    pub fn set_image_style(
        &mut self,
        slide_index: usize,
        image_index: usize,
        style: ImageStyle,
    ) -> Result<ImageStyle, LecternError> {
        MutationEngine::check_index(&self.slides, slide_index)?;
        let applied = self
            .styles
            .set_style(&self.slides[slide_index], image_index, style)?;
        self.schedule_autosave();
        Ok(applied)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Move to `index`. Out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.slides.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn first(&mut self) {
        self.current = 0;
    }

    pub fn last(&mut self) {
        self.current = self.slides.len().saturating_sub(1);
    }

    /// Position through the deck, 0-100.
    pub fn progress_percent(&self) -> u8 {
        if self.slides.is_empty() {
            return 0;
        }
        ((self.current + 1) * 100 / self.slides.len()) as u8
    }

    // =========================================================================
    // CITATIONS
    // =========================================================================

    /// Write refreshed citation lists into the live deck by slide id.
    ///
    /// Slides removed since the refresh started are skipped. Returns how
    /// many slides changed.
    pub fn apply_refresh(&mut self, results: &[SlideRefresh]) -> usize {
        let mut changed = 0;
        for result in results {
            if !matches!(result.resolution.status, RefreshStatus::Refreshed { .. }) {
                continue;
            }
            match self.slides.iter_mut().find(|s| s.id == result.slide_id) {
                Some(slide) if slide.citations != result.resolution.citations => {
                    slide.citations.clone_from(&result.resolution.citations);
                    changed += 1;
                }
                Some(_) => {}
                None => tracing::debug!(slide_id = %result.slide_id, "Refreshed slide no longer in deck"),
            }
        }
        changed
    }

    /// Refresh every slide's citations, then save immediately.
    pub async fn refresh_evidence(&mut self) -> Vec<SlideRefresh> {
        let snapshot = self.slides.clone();
        let results = self.resolver.refresh_deck(&snapshot).await;
        let changed = self.apply_refresh(&results);
        tracing::info!(slides = results.len(), changed, "Evidence refreshed");
        self.persist_now().await;
        results
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Cancel any pending auto-save and write the deck now.
    pub async fn flush(&mut self) {
        self.persist_now().await;
    }

    async fn persist_now(&mut self) {
        self.autosave.cancel();
        let Some(snapshot) = self.snapshot() else {
            return;
        };

        match snapshot.write().await {
            Ok(Some(at)) => {
                self.last_updated = Some(at);
                tracing::debug!(at = %at, "Deck saved");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Deck save failed"),
        }
    }

    fn schedule_autosave(&mut self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };

        self.autosave.schedule(self.settings.debounce, async move {
            let generation = snapshot.generation;
            match snapshot.write().await {
                Ok(Some(at)) => tracing::debug!(at = %at, "Auto-saved deck"),
                Ok(None) => tracing::debug!(generation, "Skipped superseded auto-save"),
                Err(e) => tracing::warn!(error = %e, "Auto-save failed"),
            }
        });
    }

    /// Number and capture the current deck for writing.
    fn snapshot(&mut self) -> Option<Snapshot> {
        let store = self.store.clone()?;
        self.generation += 1;
        Some(Snapshot {
            generation: self.generation,
            committed: Arc::clone(&self.committed),
            store,
            slides: self.slides.clone(),
            styles: self.styles.clone(),
        })
    }
}

/// A numbered copy of the deck on its way to the store.
struct Snapshot {
    generation: u64,
    committed: Arc<Mutex<u64>>,
    store: Arc<dyn DeckStore>,
    slides: Vec<Slide>,
    styles: ImageStyleMap,
}

impl Snapshot {
    /// Write the snapshot unless a newer one is already committed.
    ///
    /// The commit lock moves into the blocking write, so it is held until
    /// the write ends even when the awaiting task is aborted. Returns
    /// `None` for a superseded snapshot.
    async fn write(self) -> Result<Option<DateTime<Utc>>, LecternError> {
        let Self {
            generation,
            committed,
            store,
            slides,
            styles,
        } = self;
        let mut committed = committed.lock_owned().await;

        let joined = tokio::task::spawn_blocking(move || -> Result<_, LecternError> {
            if *committed >= generation {
                return Ok(None);
            }
            let at = write_deck(store.as_ref(), &slides, &styles)?;
            *committed = generation;
            Ok(Some(at))
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(e) => Err(LecternError::StorageError(format!("Save task failed: {e}"))),
        }
    }
}

fn write_deck(
    store: &dyn DeckStore,
    slides: &[Slide],
    styles: &ImageStyleMap,
) -> Result<DateTime<Utc>, LecternError> {
    let at = store.save_all(slides)?;
    store.save_image_styles(styles)?;
    Ok(at)
}

// =============================================================================
// TESTS
// =============================================================================
