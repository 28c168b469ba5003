//! # Mutation Engine
//!
//! Pure, in-memory transformations of an ordered deck.
//!
//! Every operation borrows the current deck and returns a new `Vec<Slide>`;
//! the input is never modified and nothing here touches the store.
//!
//! Invalid targets (index out of range, deleting the last slide) are
//! no-ops that return an unchanged copy. Callers that want to reject bad
//! input up front use [`MutationEngine::check_index`] and
//! [`MutationEngine::check_delete`].

use crate::primitives::{CONTINUATION_ID_INFIX, CONTINUATION_MARKER};
use crate::{EvidenceConfidence, LayoutHint, LecternError, Slide, SlidePatch};
use chrono::Utc;
use std::collections::BTreeSet;

/// Title given to a freshly added slide.
pub const NEW_SLIDE_TITLE: &str = "New Slide — Click to Edit";

/// Single bullet given to a freshly added slide.
pub const NEW_SLIDE_BULLET: &str = "Click to add your first point";

/// The MutationEngine groups all deck transformations.
pub struct MutationEngine;

impl MutationEngine {
    /// Replace only the fields listed in `patch` on the slide at `index`.
    #[must_use]
    pub fn update(deck: &[Slide], index: usize, patch: &SlidePatch) -> Vec<Slide> {
        let mut next = deck.to_vec();
        if let Some(slide) = next.get_mut(index) {
            patch.apply_to(slide);
        }
        next
    }

    /// Insert `slide` immediately after `index`.
    #[must_use]
    pub fn insert_after(deck: &[Slide], index: usize, slide: Slide) -> Vec<Slide> {
        let mut next = deck.to_vec();
        if index < next.len() {
            next.insert(index + 1, slide);
        }
        next
    }

    /// Insert a copy of the slide at `index` right after it, under a fresh id.
    ///
    /// The copy is field-identical to the original (citations included)
    /// except for its id.
    #[must_use]
    pub fn duplicate(deck: &[Slide], index: usize) -> Vec<Slide> {
        let Some(original) = deck.get(index) else {
            return deck.to_vec();
        };
        let mut copy = original.clone();
        copy.id = Self::fresh_slide_id(deck);
        Self::insert_after(deck, index, copy)
    }

    /// Remove the slide at `index`. A one-slide deck is returned unchanged.
    #[must_use]
    pub fn delete(deck: &[Slide], index: usize) -> Vec<Slide> {
        let mut next = deck.to_vec();
        if next.len() > 1 && index < next.len() {
            next.remove(index);
        }
        next
    }

    /// Replace every slide holding more than `max_bullets` bullets with
    /// consecutive continuation slides.
    ///
    /// The first part keeps the original id and title; part `k` (k ≥ 2) is
    /// `<id>_pt<k>` titled `<title> (cont'd)`. Bullets are cut into
    /// contiguous chunks in original order. Re-running with the same bound
    /// changes nothing, since every part already fits.
    ///
    /// A derived id already present in the deck gets a `_<n>` suffix, so
    /// ids stay unique.
    #[must_use]
    pub fn split_oversized_slides(deck: &[Slide], max_bullets: usize) -> Vec<Slide> {
        let max_bullets = max_bullets.max(1);
        let mut next = Vec::with_capacity(deck.len());
        let mut taken: BTreeSet<String> = deck.iter().map(|s| s.id.clone()).collect();

        for slide in deck {
            if slide.bullets.len() <= max_bullets {
                next.push(slide.clone());
                continue;
            }

            for (part, chunk) in slide.bullets.chunks(max_bullets).enumerate() {
                let mut piece = slide.clone();
                piece.bullets = chunk.to_vec();
                if part > 0 {
                    let derived = format!("{}{}{}", slide.id, CONTINUATION_ID_INFIX, part + 1);
                    piece.id = Self::unused_id(&derived, &taken);
                    taken.insert(piece.id.clone());
                    piece.title = format!("{}{}", slide.title, CONTINUATION_MARKER);
                }
                next.push(piece);
            }
        }

        next
    }

    /// `base`, or `base_<n>` for the smallest n ≥ 2 not in `taken`.
    fn unused_id(base: &str, taken: &BTreeSet<String>) -> String {
        if !taken.contains(base) {
            return base.to_string();
        }
        let mut n: u32 = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken.contains(&candidate) {
                return candidate;
            }
            n = n.saturating_add(1);
        }
    }

    /// A blank slide under an id not used anywhere in `deck`.
    #[must_use]
    pub fn blank_slide(deck: &[Slide]) -> Slide {
        Slide::new(Self::fresh_slide_id(deck), NEW_SLIDE_TITLE)
            .with_bullets([NEW_SLIDE_BULLET])
            .with_layout(LayoutHint::ImageRight)
            .with_confidence(EvidenceConfidence::Medium)
            .with_images(Vec::<String>::new(), "Slide image")
    }

    /// Generate `slide_<unix millis>`, suffixed until unique within `deck`.
    #[must_use]
    pub fn fresh_slide_id(deck: &[Slide]) -> String {
        let base = format!("slide_{}", Utc::now().timestamp_millis());
        let taken: BTreeSet<String> = deck.iter().map(|s| s.id.clone()).collect();
        Self::unused_id(&base, &taken)
    }

    /// Ensure `index` addresses a slide in `deck`.
    pub fn check_index(deck: &[Slide], index: usize) -> Result<(), LecternError> {
        if index < deck.len() {
            Ok(())
        } else {
            Err(LecternError::InvalidIndex {
                index,
                len: deck.len(),
            })
        }
    }

    /// Ensure deleting at `index` is permitted.
    pub fn check_delete(deck: &[Slide], index: usize) -> Result<(), LecternError> {
        Self::check_index(deck, index)?;
        if deck.len() <= 1 {
            return Err(LecternError::LastSlide);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Citation;

    fn deck(ids: &[&str]) -> Vec<Slide> {
        ids.iter()
            .map(|id| Slide::new(*id, format!("Title {id}")).with_bullets(["x"]))
            .collect()
    }

    fn ids(deck: &[Slide]) -> Vec<&str> {
        deck.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn update_replaces_fields_and_leaves_input_untouched() {
        let original = deck(&["a", "b"]);
        let patch = SlidePatch {
            title: Some("Edited".to_string()),
            ..SlidePatch::default()
        };

        let next = MutationEngine::update(&original, 1, &patch);

        assert_eq!(next[1].title, "Edited");
        assert_eq!(original[1].title, "Title b");
        assert_eq!(next[0], original[0]);
    }

    #[test]
    fn update_out_of_range_is_noop() {
        let original = deck(&["a"]);
        let patch = SlidePatch {
            title: Some("Edited".to_string()),
            ..SlidePatch::default()
        };
        assert_eq!(MutationEngine::update(&original, 5, &patch), original);
    }

    #[test]
    fn insert_after_places_slide_next() {
        let original = deck(&["a", "b", "c"]);
        let next = MutationEngine::insert_after(&original, 0, Slide::new("n", "New"));
        assert_eq!(ids(&next), vec!["a", "n", "b", "c"]);

        let at_end = MutationEngine::insert_after(&original, 2, Slide::new("n", "New"));
        assert_eq!(ids(&at_end), vec!["a", "b", "c", "n"]);
    }

    #[test]
    fn insert_after_out_of_range_is_noop() {
        let original = deck(&["a"]);
        let next = MutationEngine::insert_after(&original, 3, Slide::new("n", "New"));
        assert_eq!(ids(&next), vec!["a"]);
    }

    #[test]
    fn duplicate_copies_everything_but_id() {
        let mut original = deck(&["a", "b"]);
        original[0].citations = vec![Citation::catalog("100", "T", "A", "J", "2001")];

        let next = MutationEngine::duplicate(&original, 0);

        assert_eq!(next.len(), 3);
        assert_eq!(next[0].id, "a");
        assert_ne!(next[1].id, "a");
        assert_ne!(next[1].id, "b");
        assert_eq!(next[1].citations, original[0].citations);
        assert_eq!(next[1].title, original[0].title);
        assert_eq!(next[2].id, "b");
    }

    #[test]
    fn delete_refuses_to_empty_the_deck() {
        let single = deck(&["a"]);
        assert_eq!(MutationEngine::delete(&single, 0), single);

        let pair = deck(&["a", "b"]);
        assert_eq!(ids(&MutationEngine::delete(&pair, 0)), vec!["b"]);
        assert_eq!(ids(&MutationEngine::delete(&pair, 9)), vec!["a", "b"]);
    }

    #[test]
    fn split_matches_worked_example() {
        let original = vec![Slide::new("a", "Topic").with_bullets(["1", "2", "3", "4", "5"])];

        let next = MutationEngine::split_oversized_slides(&original, 3);

        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, "a");
        assert_eq!(next[0].title, "Topic");
        assert_eq!(next[0].bullets, vec!["1", "2", "3"]);
        assert_eq!(next[1].id, "a_pt2");
        assert_eq!(next[1].title, "Topic (cont'd)");
        assert_eq!(next[1].bullets, vec!["4", "5"]);
    }

    #[test]
    fn split_keeps_short_slides_and_order() {
        let original = vec![
            Slide::new("a", "A").with_bullets(["1"]),
            Slide::new("b", "B").with_bullets(["1", "2", "3", "4", "5", "6", "7"]),
            Slide::new("c", "C"),
        ];

        let next = MutationEngine::split_oversized_slides(&original, 3);

        assert_eq!(ids(&next), vec!["a", "b", "b_pt2", "b_pt3", "c"]);
        assert_eq!(next[3].bullets, vec!["7"]);
        assert_eq!(next[3].title, "B (cont'd)");
    }

    #[test]
    fn split_is_idempotent() {
        let original = vec![Slide::new("a", "A").with_bullets(["1", "2", "3", "4"])];
        let once = MutationEngine::split_oversized_slides(&original, 2);
        let twice = MutationEngine::split_oversized_slides(&once, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn split_never_reuses_an_existing_id() {
        let original = vec![
            Slide::new("a", "A").with_bullets(["1", "2", "3", "4"]),
            Slide::new("a_pt2", "Already here"),
        ];

        let next = MutationEngine::split_oversized_slides(&original, 3);

        assert_eq!(ids(&next), vec!["a", "a_pt2_2", "a_pt2"]);
        assert_eq!(next[1].bullets, vec!["4"]);
        assert_eq!(next[2].title, "Already here");
    }

    #[test]
    fn split_with_zero_bound_behaves_as_one() {
        let original = vec![Slide::new("a", "A").with_bullets(["1", "2"])];
        let next = MutationEngine::split_oversized_slides(&original, 0);
        assert_eq!(ids(&next), vec!["a", "a_pt2"]);
    }

    #[test]
    fn blank_slide_has_one_bullet_and_unique_id() {
        let existing = deck(&["a"]);
        let blank = MutationEngine::blank_slide(&existing);
        assert_eq!(blank.title, NEW_SLIDE_TITLE);
        assert_eq!(blank.bullets.len(), 1);
        assert!(blank.id.starts_with("slide_"));
    }

    #[test]
    fn fresh_id_avoids_collisions() {
        let first = MutationEngine::fresh_slide_id(&[]);
        let existing = vec![Slide::new(first.clone(), "T")];
        let second = MutationEngine::fresh_slide_id(&existing);
        assert_ne!(first, second);
    }

    #[test]
    fn checks_report_invalid_targets() {
        let single = deck(&["a"]);
        assert!(MutationEngine::check_index(&single, 0).is_ok());
        assert!(matches!(
            MutationEngine::check_index(&single, 1),
            Err(LecternError::InvalidIndex { index: 1, len: 1 })
        ));
        assert!(matches!(
            MutationEngine::check_delete(&single, 0),
            Err(LecternError::LastSlide)
        ));
    }
}
