//! CrossRef works search, the supplementary DOI source.

use super::{LookupError, get_json};
use lectern_core::{Citation, CitationKind, abbreviate_authors};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CrossRefClient {
    http: reqwest::Client,
    base_url: String,
    rows: usize,
}

impl CrossRefClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, rows: usize) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rows,
        }
    }

    pub async fn lookup(&self, query: &str) -> Result<Vec<Citation>, LookupError> {
        let url = format!("{}/works", self.base_url);
        let rows = self.rows.to_string();
        let request = self.http.get(&url).query(&[
            ("query", query),
            ("rows", rows.as_str()),
            ("sort", "relevance"),
        ]);
        let body = get_json(request, &url).await?;
        parse_works(&body)
    }
}

/// Normalise `message.items[]` into DOI citations. Items without a DOI are
/// dropped.
pub fn parse_works(body: &Value) -> Result<Vec<Citation>, LookupError> {
    let items = body
        .pointer("/message/items")
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::Parse("works response has no items".to_string()))?;

    Ok(items.iter().filter_map(work_to_citation).collect())
}

fn work_to_citation(item: &Value) -> Option<Citation> {
    let doi = item.get("DOI").and_then(Value::as_str)?;
    let first = |key: &str| {
        item.get(key)
            .and_then(Value::as_array)
            .and_then(|values| values.first())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let names: Vec<String> = item
        .get("author")
        .and_then(Value::as_array)
        .map(|authors| authors.iter().map(author_name).collect())
        .unwrap_or_default();

    let year = item
        .pointer("/published/date-parts/0/0")
        .and_then(Value::as_i64)
        .map(|y| y.to_string())
        .unwrap_or_default();

    Some(Citation::new(
        CitationKind::Doi,
        doi,
        first("title"),
        abbreviate_authors(&names),
        first("container-title"),
        year,
    ))
}

/// `"<family> <given initial>"`.
fn author_name(author: &Value) -> String {
    let family = author
        .get("family")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let initial: String = author
        .get("given")
        .and_then(Value::as_str)
        .and_then(|g| g.chars().next())
        .map(String::from)
        .unwrap_or_default();
    format!("{family} {initial}").trim().to_string()
}
