//! # Citation Resolver
//!
//! Enriches a slide's curated citations with live bibliographic results.
//!
//! - `pubmed`: PubMed E-utilities (search, then summaries). Required stage.
//! - `crossref`: CrossRef works search. Optional, best effort.
//!
//! Lookup failures never reach the caller. A failing slide keeps its prior
//! citation list and the failure is logged; sibling slides in a batch are
//! unaffected.

mod crossref;
mod pubmed;

pub use crossref::{CrossRefClient, parse_works};
pub use pubmed::{PubMedClient, parse_search, parse_summaries};

use crate::config::CitationsConfig;
use lectern_core::{Citation, Slide, merge_citations};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the bibliographic client layer.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service could not be reached (DNS, connect, timeout).
    #[error("Cannot reach {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    /// The body was not the JSON shape expected.
    #[error("Unexpected response: {0}")]
    Parse(String),
}

/// Send `request` and decode a JSON body, mapping every failure.
pub(crate) async fn get_json(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<Value, LookupError> {
    let resp = request
        .send()
        .await
        .map_err(|e| LookupError::Connection(format!("{url}: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LookupError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    resp.json::<Value>()
        .await
        .map_err(|e| LookupError::Parse(e.to_string()))
}

// =============================================================================
// RESOLUTION RESULTS
// =============================================================================

/// What happened to one slide's citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshStatus {
    /// Empty query; no lookup was made.
    Skipped,
    /// Lookup succeeded; `added` new entries were merged in.
    Refreshed { added: usize },
    /// Lookup failed; the prior list was kept.
    Failed { reason: String },
}

/// Citations for one slide after a resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub citations: Vec<Citation>,
    pub status: RefreshStatus,
}

/// Result of refreshing one slide in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRefresh {
    pub slide_id: String,
    pub resolution: Resolution,
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Queries the configured sources and merges results into curated lists.
#[derive(Debug, Clone)]
pub struct CitationResolver {
    pubmed: PubMedClient,
    crossref: Option<CrossRefClient>,
    max_citations: usize,
}

impl CitationResolver {
    /// Build the HTTP client and the enabled sources.
    pub fn from_config(config: &CitationsConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LookupError::Connection(format!("HTTP client setup failed: {e}")))?;

        let pubmed = PubMedClient::new(http.clone(), &config.pubmed_base_url, config.search_limit);
        let crossref = config.crossref_enabled.then(|| {
            CrossRefClient::new(http, &config.crossref_base_url, config.crossref_rows)
        });

        Ok(Self {
            pubmed,
            crossref,
            max_citations: config.max_citations,
        })
    }

    /// Live citations for `query`: PubMed results, then CrossRef results
    /// when enabled. A CrossRef failure only drops its own results.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Citation>, LookupError> {
        let mut found = self.pubmed.lookup(query).await?;

        if let Some(crossref) = &self.crossref {
            match crossref.lookup(query).await {
                Ok(extra) => found.extend(extra),
                Err(e) => tracing::warn!(query, error = %e, "CrossRef lookup failed"),
            }
        }

        Ok(found)
    }

    /// Merge live results for `query` into `existing`.
    ///
    /// Never fails: an empty query or any lookup error returns `existing`.
    pub async fn resolve(&self, query: &str, existing: &[Citation]) -> Resolution {
        if query.trim().is_empty() {
            return Resolution {
                citations: existing.to_vec(),
                status: RefreshStatus::Skipped,
            };
        }

        match self.fetch(query).await {
            Ok(fetched) => {
                let citations = merge_citations(existing, &fetched, self.max_citations);
                let added = citations.len().saturating_sub(existing.len());
                Resolution {
                    citations,
                    status: RefreshStatus::Refreshed { added },
                }
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Citation lookup failed, keeping prior list");
                Resolution {
                    citations: existing.to_vec(),
                    status: RefreshStatus::Failed {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Resolve every slide concurrently. Results come back in deck order.
    pub async fn refresh_deck(&self, slides: &[Slide]) -> Vec<SlideRefresh> {
        let mut tasks = JoinSet::new();

        for (position, slide) in slides.iter().enumerate() {
            let resolver = self.clone();
            let slide_id = slide.id.clone();
            let query = slide.citations_query.clone();
            let existing = slide.citations.clone();
            tasks.spawn(async move {
                let resolution = resolver.resolve(&query, &existing).await;
                (position, SlideRefresh { slide_id, resolution })
            });
        }

        let mut results = Vec::with_capacity(slides.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!(error = %e, "Citation refresh task aborted"),
            }
        }
        results.sort_by_key(|(position, _)| *position);
        results.into_iter().map(|(_, refresh)| refresh).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
