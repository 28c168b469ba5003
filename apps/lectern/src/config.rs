//! # Configuration
//!
//! `lectern.toml` plus environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! variables, command-line flags (applied by the CLI).
//!
//! ```toml
//! [store]
//! path = "lectern.redb"
//!
//! [autosave]
//! debounce_ms = 500
//!
//! [citations]
//! crossref_enabled = true
//! search_limit = 5
//! ```
//!
//! ## Environment Variables
//!
//! - `LECTERN_DB`: deck database path
//! - `LECTERN_DEBOUNCE_MS`: auto-save debounce window
//! - `LECTERN_PUBMED_URL`: E-utilities base URL
//! - `LECTERN_CROSSREF_URL`: CrossRef API base URL
//! - `LECTERN_CROSSREF`: `1`/`true` enables the CrossRef source

use lectern_core::LecternError;
use lectern_core::primitives::{
    AUTOSAVE_DEBOUNCE_MS, DOI_SEARCH_ROWS, MAX_BULLETS_PER_SLIDE, MAX_CITATIONS, SEARCH_LIMIT,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lectern.toml";

pub const DEFAULT_PUBMED_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_CROSSREF_URL: &str = "https://api.crossref.org";

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lectern.redb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before the deck is written.
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: AUTOSAVE_DEBOUNCE_MS,
        }
    }
}

impl AutosaveConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CitationsConfig {
    pub pubmed_base_url: String,
    pub crossref_base_url: String,
    /// Identifiers requested from the PubMed search, at most 5.
    pub search_limit: usize,
    /// Works requested from CrossRef.
    pub crossref_rows: usize,
    pub crossref_enabled: bool,
    /// Cap on a merged citation list.
    pub max_citations: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CitationsConfig {
    fn default() -> Self {
        Self {
            pubmed_base_url: DEFAULT_PUBMED_URL.to_string(),
            crossref_base_url: DEFAULT_CROSSREF_URL.to_string(),
            search_limit: SEARCH_LIMIT,
            crossref_rows: DOI_SEARCH_ROWS,
            crossref_enabled: false,
            max_citations: MAX_CITATIONS,
            timeout_secs: 10,
            user_agent: concat!(
                "Lectern/",
                env!("CARGO_PKG_VERSION"),
                " (mailto:dfu@unth.edu.ng)"
            )
            .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Bullet budget used when installing the shipped content.
    pub max_bullets_per_slide: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            max_bullets_per_slide: MAX_BULLETS_PER_SLIDE,
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub autosave: AutosaveConfig,
    pub citations: CitationsConfig,
    pub server: ServerConfig,
    pub deck: DeckConfig,
}

impl AppConfig {
    /// Parse a TOML document. Absent keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, LecternError> {
        toml::from_str(content).map_err(|e| LecternError::ConfigError(e.to_string()))
    }

    /// Read `path`. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, LecternError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml(&content)?;
                tracing::info!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(LecternError::ConfigError(format!(
                "Cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Apply `LECTERN_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), LecternError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), LecternError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("LECTERN_DB") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(ms) = lookup("LECTERN_DEBOUNCE_MS") {
            self.autosave.debounce_ms = ms.trim().parse().map_err(|_| {
                LecternError::ConfigError(format!("LECTERN_DEBOUNCE_MS is not a number: {ms}"))
            })?;
        }
        if let Some(url) = lookup("LECTERN_PUBMED_URL") {
            self.citations.pubmed_base_url = url;
        }
        if let Some(url) = lookup("LECTERN_CROSSREF_URL") {
            self.citations.crossref_base_url = url;
        }
        if let Some(flag) = lookup("LECTERN_CROSSREF") {
            self.citations.crossref_enabled = parse_flag(&flag).ok_or_else(|| {
                LecternError::ConfigError(format!("LECTERN_CROSSREF is not a boolean: {flag}"))
            })?;
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_core_constants() {
        let config = AppConfig::default();
        assert_eq!(config.autosave.debounce_ms, 500);
        assert_eq!(config.citations.search_limit, 5);
        assert_eq!(config.citations.crossref_rows, 3);
        assert_eq!(config.citations.max_citations, 10);
        assert!(!config.citations.crossref_enabled);
        assert_eq!(config.deck.max_bullets_per_slide, 3);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [autosave]
            debounce_ms = 250

            [citations]
            crossref_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.autosave.debounce_ms, 250);
        assert!(config.citations.crossref_enabled);
        assert_eq!(config.citations.pubmed_base_url, DEFAULT_PUBMED_URL);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let result = AppConfig::from_toml("[autosave]\ndebounce_ms = \"soon\"");
        assert!(matches!(result, Err(LecternError::ConfigError(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn file_is_read() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("lectern.toml");
        std::fs::write(&path, "[store]\npath = \"/var/lib/lectern/deck.redb\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.store.path, PathBuf::from("/var/lib/lectern/deck.redb"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(vars(&[
                ("LECTERN_DB", "other.redb"),
                ("LECTERN_DEBOUNCE_MS", "1000"),
                ("LECTERN_CROSSREF", "yes"),
                ("LECTERN_PUBMED_URL", "http://localhost:9000"),
            ]))
            .unwrap();

        assert_eq!(config.store.path, PathBuf::from("other.redb"));
        assert_eq!(config.autosave.debounce(), Duration::from_millis(1000));
        assert!(config.citations.crossref_enabled);
        assert_eq!(config.citations.pubmed_base_url, "http://localhost:9000");
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut config = AppConfig::default();
        assert!(
            config
                .apply_overrides(vars(&[("LECTERN_DEBOUNCE_MS", "fast")]))
                .is_err()
        );
        assert!(
            config
                .apply_overrides(vars(&[("LECTERN_CROSSREF", "maybe")]))
                .is_err()
        );
    }
}
