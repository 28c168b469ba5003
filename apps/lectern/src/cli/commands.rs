//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::ExportFormat;
use crate::api;
use crate::config::AppConfig;
use crate::controller::{DeckController, DeckSource};
use crate::resolver::RefreshStatus;
use lectern_core::{LecternError, default_quiz, paginate, render_text};
use std::path::{Path, PathBuf};

/// Validate output path.
///
/// The parent directory must exist; the returned path is that directory,
/// canonicalized, joined with the original file name.
fn validate_output_path(path: &Path) -> Result<PathBuf, LecternError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        LecternError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(LecternError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| LecternError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: &AppConfig) -> Result<(), LecternError> {
    let controller = DeckController::open(config)?;

    println!("Lectern Deck Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", config.server.host);
    println!("  Port:      {}", config.server.port);
    println!("  Database:  {:?}", config.store.path);
    println!("  Storage:   {:?}", controller.source());
    println!("  Autosave:  {} ms debounce", config.autosave.debounce_ms);
    println!(
        "  CrossRef:  {}",
        if config.citations.crossref_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();
    println!("Endpoints:");
    println!("  GET    /deck                               - Live deck");
    println!("  PATCH  /slides/{{index}}                     - Edit a slide");
    println!("  POST   /slides                             - Add a slide");
    println!("  POST   /slides/{{index}}/duplicate           - Duplicate a slide");
    println!("  DELETE /slides/{{index}}                     - Delete a slide");
    println!("  PUT    /slides/{{index}}/images/{{image}}/style - Image display style");
    println!("  POST   /navigate                           - Move to a slide");
    println!("  POST   /refresh                            - Refresh citations");
    println!("  GET    /export                             - Printable layout");
    println!("  GET    /quiz                               - Quiz questions");
    println!("  GET    /quiz/session                       - Quiz progress and score");
    println!("  POST   /quiz/answer                        - Answer the current question");
    println!("  POST   /quiz/next                          - Next question");
    println!("  POST   /quiz/restart                       - Start the quiz over");
    println!("  GET    /health                             - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    api::run_server(&addr, controller).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show deck and storage status.
pub fn cmd_status(config: &AppConfig, json_mode: bool) -> Result<(), LecternError> {
    let controller = DeckController::open(config)?;
    let metadata = controller.metadata().unwrap_or_default();
    let slides = controller.slides();
    let citation_count: usize = slides.iter().map(|s| s.citations.len()).sum();
    let last_updated = controller.last_updated().map(|t| t.to_rfc3339());

    if json_mode {
        print_json(&serde_json::json!({
            "database": config.store.path.to_string_lossy(),
            "source": controller.source(),
            "content_version": metadata.content_version,
            "slide_count": slides.len(),
            "citation_count": citation_count,
            "last_updated": last_updated,
        }));
        return Ok(());
    }

    println!("Lectern Deck Status");
    println!("===================");
    println!("Database:        {:?}", config.store.path);
    println!("Storage:         {:?}", controller.source());
    println!(
        "Content version: {}",
        metadata.content_version.as_deref().unwrap_or("-")
    );
    println!();
    println!("Slides:          {}", slides.len());
    println!("Citations:       {}", citation_count);
    println!(
        "Last saved:      {}",
        last_updated.as_deref().unwrap_or("never")
    );

    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List slides in deck order.
pub fn cmd_list(config: &AppConfig, json_mode: bool) -> Result<(), LecternError> {
    let controller = DeckController::open(config)?;

    if json_mode {
        let rows: Vec<serde_json::Value> = controller
            .slides()
            .iter()
            .enumerate()
            .map(|(index, slide)| {
                serde_json::json!({
                    "index": index,
                    "id": slide.id,
                    "title": slide.title,
                    "bullets": slide.bullets.len(),
                    "citations": slide.citations.len(),
                    "evidence": slide.evidence_confidence,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    for (index, slide) in controller.slides().iter().enumerate() {
        println!(
            "{:>3}  {:<32} {:<7} {} bullets, {} sources  {}",
            index + 1,
            slide.id,
            slide.evidence_confidence.label(),
            slide.bullets.len(),
            slide.citations.len(),
            slide.title.replace('\n', " ")
        );
    }

    Ok(())
}

// =============================================================================
// REFRESH COMMAND
// =============================================================================

/// Refresh every slide's citations and save the result.
pub async fn cmd_refresh(config: &AppConfig, json_mode: bool) -> Result<(), LecternError> {
    let mut controller = DeckController::open(config)?;
    let results = controller.refresh_evidence().await;

    if json_mode {
        let rows: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "slide_id": r.slide_id,
                    "citations": r.resolution.citations.len(),
                    "result": r.resolution.status,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    for result in &results {
        let outcome = match &result.resolution.status {
            RefreshStatus::Skipped => "skipped (no query)".to_string(),
            RefreshStatus::Refreshed { added } => format!("+{added} new"),
            RefreshStatus::Failed { reason } => format!("kept prior list ({reason})"),
        };
        println!(
            "{:<32} {:>2} sources  {}",
            result.slide_id,
            result.resolution.citations.len(),
            outcome
        );
    }

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the printable layout of the deck.
pub fn cmd_export(
    config: &AppConfig,
    output: &Path,
    format: ExportFormat,
    include_citations: bool,
) -> Result<(), LecternError> {
    let validated_output = validate_output_path(output)?;

    let controller = DeckController::open(config)?;
    let pages = paginate(controller.slides(), include_citations);

    let data = match format {
        ExportFormat::Text => render_text(&pages).into_bytes(),
        ExportFormat::Json => serde_json::to_vec_pretty(&pages)
            .map_err(|e| LecternError::SerializationError(e.to_string()))?,
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| LecternError::IoError(format!("Write file: {}", e)))?;

    println!(
        "Exported {} pages ({} bytes) to {:?}",
        pages.len(),
        data.len(),
        validated_output
    );

    Ok(())
}

// =============================================================================
// RESET COMMAND
// =============================================================================

/// Clear the store and reinstall the shipped content.
pub fn cmd_reset(config: &AppConfig, json_mode: bool) -> Result<(), LecternError> {
    let mut controller = DeckController::open(config)?;
    controller.reset();

    if controller.source() == DeckSource::InMemory {
        return Err(LecternError::StorageError(format!(
            "Cannot reset {}: deck database unavailable",
            config.store.path.display()
        )));
    }

    if json_mode {
        print_json(&serde_json::json!({
            "source": controller.source(),
            "slide_count": controller.slides().len(),
        }));
    } else {
        println!(
            "Deck reset to shipped content: {} slides",
            controller.slides().len()
        );
    }

    Ok(())
}

// =============================================================================
// QUIZ COMMAND
// =============================================================================

/// Print the quiz with answers.
pub fn cmd_quiz(json_mode: bool) -> Result<(), LecternError> {
    let questions = default_quiz();

    if json_mode {
        let value = serde_json::to_value(&questions)
            .map_err(|e| LecternError::SerializationError(e.to_string()))?;
        print_json(&value);
        return Ok(());
    }

    for (n, question) in questions.iter().enumerate() {
        println!("Q{}. {}", n + 1, question.question);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if i == question.correct_index { '*' } else { ' ' };
            println!("   {marker} {}) {option}", char::from(b'a' + (i % 26) as u8));
        }
        println!("   {}", question.explanation);
        if let Some(response) = &question.empathetic_response {
            println!("   With patients: {response}");
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.store.path = dir.join("deck.redb");
        config
    }

    #[test]
    fn output_path_requires_existing_parent() {
        let temp = tempfile::tempdir().unwrap();
        assert!(validate_output_path(&temp.path().join("out.txt")).is_ok());
        assert!(validate_output_path(&temp.path().join("missing/out.txt")).is_err());
    }

    #[test]
    fn bare_file_name_resolves_to_working_directory() {
        let resolved = validate_output_path(Path::new("deck.txt")).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "deck.txt");
    }

    #[test]
    fn export_writes_one_page_per_slide() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        let output = temp.path().join("deck.json");

        cmd_export(&config, &output, ExportFormat::Json, false).unwrap();

        let pages: Vec<serde_json::Value> =
            serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
        let controller = DeckController::open(&config).unwrap();
        assert_eq!(pages.len(), controller.slides().len());
        assert!(pages.iter().all(|p| p["sources"].as_array().unwrap().is_empty()));
    }

    #[test]
    fn reset_recovers_database_with_unreadable_records() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        {
            let store = lectern_core::RedbDeckStore::open(&config.store.path).unwrap();
            let defaults = lectern_core::default_slides();
            lectern_core::load_deck(&store, &defaults, lectern_core::CONTENT_VERSION, 3).unwrap();
        }
        // A record from an older on-disk format.
        {
            let db = redb::Database::create(&config.store.path).unwrap();
            let txn = db.begin_write().unwrap();
            {
                let table: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("slides");
                let mut slides = txn.open_table(table).unwrap();
                slides.insert("cover", b"LECT\x00stale".as_slice()).unwrap();
            }
            txn.commit().unwrap();
        }

        cmd_reset(&config, true).unwrap();

        let controller = DeckController::open(&config).unwrap();
        assert_eq!(controller.source(), DeckSource::Persistent);
        assert!(controller.slides().iter().any(|s| s.id == "cover"));
    }

    #[test]
    fn text_export_carries_footer() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        let output = temp.path().join("deck.txt");

        cmd_export(&config, &output, ExportFormat::Text, true).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains(lectern_core::export::PAGE_FOOTER));
        assert!(text.contains("SOURCES:"));
    }
}
