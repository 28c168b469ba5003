//! # Image Style Table
//!
//! Per-image display overrides keyed by `(slide id, image index)`.
//!
//! The table is a side mapping, not a parallel array: it can never be longer
//! or shorter than a slide's image list, and every access checks the index
//! against the slide it belongs to. Entries that no longer point at an
//! existing image are removed by [`ImageStyleMap::prune`].

use crate::{LecternError, Slide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest accepted zoom, in percent.
pub const MIN_ZOOM_PERCENT: u16 = 10;
/// Highest accepted zoom, in percent.
pub const MAX_ZOOM_PERCENT: u16 = 400;
/// Offsets are percentages of the panel size in either direction.
pub const MAX_OFFSET_PERCENT: i16 = 100;

/// How an image fills its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
}

/// Display settings for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStyle {
    pub fit: ImageFit,
    pub zoom_percent: u16,
    pub offset_x: i16,
    pub offset_y: i16,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            fit: ImageFit::Cover,
            zoom_percent: 100,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl ImageStyle {
    /// Clamp zoom and offsets into their accepted ranges.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            fit: self.fit,
            zoom_percent: self.zoom_percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT),
            offset_x: self.offset_x.clamp(-MAX_OFFSET_PERCENT, MAX_OFFSET_PERCENT),
            offset_y: self.offset_y.clamp(-MAX_OFFSET_PERCENT, MAX_OFFSET_PERCENT),
        }
    }
}

/// Flat record used to persist the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStyleEntry {
    pub slide_id: String,
    pub image_index: usize,
    pub style: ImageStyle,
}

/// Mapping from `(slide id, image index)` to an [`ImageStyle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ImageStyleEntry>", into = "Vec<ImageStyleEntry>")]
pub struct ImageStyleMap {
    entries: BTreeMap<(String, usize), ImageStyle>,
}

impl ImageStyleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Style for image `index` of `slide`.
    ///
    /// `None` when the slide has no such image; the default style when the
    /// image exists but was never customised.
    #[must_use]
    pub fn style_for(&self, slide: &Slide, index: usize) -> Option<ImageStyle> {
        if index >= slide.image_refs.len() {
            return None;
        }
        Some(
            self.entries
                .get(&(slide.id.clone(), index))
                .copied()
                .unwrap_or_default(),
        )
    }

    /// Set the style for image `index` of `slide`.
    pub fn set_style(
        &mut self,
        slide: &Slide,
        index: usize,
        style: ImageStyle,
    ) -> Result<ImageStyle, LecternError> {
        if index >= slide.image_refs.len() {
            return Err(LecternError::ImageIndexOutOfRange {
                slide_id: slide.id.clone(),
                index,
                count: slide.image_refs.len(),
            });
        }
        let style = style.normalized();
        self.entries.insert((slide.id.clone(), index), style);
        Ok(style)
    }

    /// Drop a customisation, falling back to the default style.
    pub fn reset(&mut self, slide_id: &str, index: usize) -> bool {
        self.entries.remove(&(slide_id.to_string(), index)).is_some()
    }

    /// Give `to` the same customisations as `from`.
    pub fn copy_slide(&mut self, from: &str, to: &str) {
        let copied: Vec<(usize, ImageStyle)> = self
            .entries
            .iter()
            .filter(|((id, _), _)| id == from)
            .map(|((_, index), style)| (*index, *style))
            .collect();
        for (index, style) in copied {
            self.entries.insert((to.to_string(), index), style);
        }
    }

    /// Remove entries whose slide is gone or whose image index is out of
    /// range. Returns the number of entries removed.
    pub fn prune(&mut self, deck: &[Slide]) -> usize {
        let image_counts: BTreeMap<&str, usize> = deck
            .iter()
            .map(|s| (s.id.as_str(), s.image_refs.len()))
            .collect();
        let before = self.entries.len();
        self.entries.retain(|(slide_id, index), _| {
            image_counts
                .get(slide_id.as_str())
                .is_some_and(|count| index < count)
        });
        before - self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ImageStyleEntry>> for ImageStyleMap {
    fn from(entries: Vec<ImageStyleEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| ((e.slide_id, e.image_index), e.style))
                .collect(),
        }
    }
}

impl From<ImageStyleMap> for Vec<ImageStyleEntry> {
    fn from(map: ImageStyleMap) -> Self {
        map.entries
            .into_iter()
            .map(|((slide_id, image_index), style)| ImageStyleEntry {
                slide_id,
                image_index,
                style,
            })
            .collect()
    }
}
