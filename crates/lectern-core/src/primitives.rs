//! # Primitives
//!
//! Hardcoded constants for the Lectern core.
//!
//! These values are compiled in. The app layer may override the tunable ones
//! (debounce window, lookup limits) from configuration, but the defaults live
//! here so that the core and its tests agree on them.

/// Magic bytes for the record header ("LECT").
///
/// - Record = Magic Bytes + Version (u8) + postcard payload.
pub const MAGIC_BYTES: &[u8; 4] = b"LECT";

/// Current record format version.
///
/// Increment this when making breaking changes to the stored record layout.
pub const FORMAT_VERSION: u8 = 1;

/// Default bullet budget per slide; longer slides are split into
/// continuation slides at content-version-bump time.
pub const MAX_BULLETS_PER_SLIDE: usize = 3;

/// Suffix appended to the title of every continuation part after the first.
pub const CONTINUATION_MARKER: &str = " (cont'd)";

/// Infix between an original slide id and a continuation part number.
pub const CONTINUATION_ID_INFIX: &str = "_pt";

/// Maximum number of candidate identifiers requested from the catalog search.
pub const SEARCH_LIMIT: usize = 5;

/// Maximum number of works requested from the DOI registry search.
pub const DOI_SEARCH_ROWS: usize = 3;

/// Citation list cap applied after a merge. Curated entries are never
/// dropped to honour it.
pub const MAX_CITATIONS: usize = 10;

/// Number of author names kept before appending "et al.".
pub const MAX_AUTHORS_SHOWN: usize = 3;

/// Quiet period before a scheduled auto-save runs.
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 500;

/// Maximum size of a single stored record (16 MB).
///
/// Inline image uploads make slides large, but anything past this is
/// treated as corruption.
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;
