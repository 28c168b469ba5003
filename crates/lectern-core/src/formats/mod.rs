//! # Formats Module
//!
//! On-disk record encoding used by the deck store.

mod persistence;

pub use persistence::*;
