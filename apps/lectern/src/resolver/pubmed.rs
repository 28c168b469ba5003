//! PubMed E-utilities client.
//!
//! Two requests per lookup: `esearch` turns the free-text query into PMIDs,
//! `esummary` turns the PMIDs into article summaries.

use super::{LookupError, get_json};
use lectern_core::primitives::SEARCH_LIMIT;
use lectern_core::{Citation, abbreviate_authors};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PubMedClient {
    http: reqwest::Client,
    base_url: String,
    search_limit: usize,
}

impl PubMedClient {
    /// `search_limit` is clamped to `1..=SEARCH_LIMIT`.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, search_limit: usize) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_limit: search_limit.clamp(1, SEARCH_LIMIT),
        }
    }

    #[must_use]
    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Most relevant PMIDs for `query`, at most `search_limit` of them.
    pub async fn search_ids(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let retmax = self.search_limit.to_string();
        let request = self.http.get(&url).query(&[
            ("db", "pubmed"),
            ("retmode", "json"),
            ("retmax", retmax.as_str()),
            ("sort", "relevance"),
            ("term", query),
        ]);
        let body = get_json(request, &url).await?;
        let mut ids = parse_search(&body)?;
        ids.truncate(self.search_limit);
        Ok(ids)
    }

    /// Summaries for `ids`, in the order given.
    pub async fn fetch_summaries(&self, ids: &[String]) -> Result<Vec<Citation>, LookupError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/esummary.fcgi", self.base_url);
        let joined = ids.join(",");
        let request = self.http.get(&url).query(&[
            ("db", "pubmed"),
            ("retmode", "json"),
            ("id", joined.as_str()),
        ]);
        let body = get_json(request, &url).await?;
        parse_summaries(&body, ids)
    }

    /// Search then summarize. Either step failing fails the lookup.
    pub async fn lookup(&self, query: &str) -> Result<Vec<Citation>, LookupError> {
        let ids = self.search_ids(query).await?;
        tracing::debug!(query, count = ids.len(), "PubMed search returned ids");
        self.fetch_summaries(&ids).await
    }
}

/// Extract `esearchresult.idlist`.
pub fn parse_search(body: &Value) -> Result<Vec<String>, LookupError> {
    let ids = body
        .pointer("/esearchresult/idlist")
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::Parse("esearch response has no idlist".to_string()))?;

    Ok(ids
        .iter()
        .filter_map(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Normalise `result[<id>]` entries into catalog citations.
///
/// Identifiers missing from `result` are skipped.
pub fn parse_summaries(body: &Value, ids: &[String]) -> Result<Vec<Citation>, LookupError> {
    let result = body
        .get("result")
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::Parse("esummary response has no result".to_string()))?;

    Ok(ids
        .iter()
        .filter_map(|id| {
            let article = result.get(id)?.as_object()?;
            let text = |key: &str| {
                article
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let names: Vec<&str> = article
                .get("authors")
                .and_then(Value::as_array)
                .map(|authors| {
                    authors
                        .iter()
                        .filter_map(|a| a.get("name").and_then(Value::as_str))
                        .collect()
                })
                .unwrap_or_default();
            let year = text("pubdate")
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();

            Some(Citation::catalog(
                id.as_str(),
                text("title"),
                abbreviate_authors(&names),
                text("source"),
                year,
            ))
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lectern_core::CitationKind;
    use serde_json::json;

    #[test]
    fn search_ids_are_read_in_order() {
        let body = json!({"esearchresult": {"count": "2", "idlist": ["222", "111"]}});
        assert_eq!(parse_search(&body).unwrap(), vec!["222", "111"]);
    }

    #[test]
    fn search_without_idlist_is_parse_error() {
        let body = json!({"error": "API rate limit exceeded"});
        assert!(matches!(parse_search(&body), Err(LookupError::Parse(_))));
    }

    #[test]
    fn summaries_are_normalised() {
        let body = json!({
            "result": {
                "uids": ["15111519"],
                "15111519": {
                    "title": "Pathogenesis and management of diabetic foot ulcers",
                    "authors": [
                        {"name": "Boulton AJ"}, {"name": "Kirsner RS"},
                        {"name": "Vileikyte L"}, {"name": "Armstrong DG"}
                    ],
                    "source": "N Engl J Med",
                    "pubdate": "2004 Jul 1"
                }
            }
        });

        let ids = vec!["15111519".to_string()];
        let cites = parse_summaries(&body, &ids).unwrap();

        assert_eq!(cites.len(), 1);
        let c = &cites[0];
        assert_eq!(c.kind, CitationKind::CatalogId);
        assert_eq!(c.authors, "Boulton AJ, Kirsner RS, Vileikyte L et al.");
        assert_eq!(c.journal, "N Engl J Med");
        assert_eq!(c.year, "2004");
        assert_eq!(c.url, "https://pubmed.ncbi.nlm.nih.gov/15111519/");
    }

    #[test]
    fn search_limit_is_clamped() {
        let http = reqwest::Client::new();
        assert_eq!(PubMedClient::new(http.clone(), "http://x", 50).search_limit(), SEARCH_LIMIT);
        assert_eq!(PubMedClient::new(http.clone(), "http://x", 0).search_limit(), 1);
        assert_eq!(PubMedClient::new(http, "http://x", 3).search_limit(), 3);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let body = json!({"result": {"1": {"title": "One"}}});
        let ids = vec!["2".to_string(), "1".to_string()];

        let cites = parse_summaries(&body, &ids).unwrap();

        assert_eq!(cites.len(), 1);
        assert_eq!(cites[0].id, "1");
        assert_eq!(cites[0].authors, "");
        assert_eq!(cites[0].year, "");
    }
}
