//! # lectern
//!
//! The async shell around `lectern-core`: configuration, bibliographic
//! clients, debounced auto-save, the deck controller, the HTTP API and the
//! CLI. The binary in `main.rs` only initializes logging and dispatches to
//! [`cli::execute`].

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod resolver;
pub mod scheduler;
