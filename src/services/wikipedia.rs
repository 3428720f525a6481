use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{get_json, http_client, Encyclopedia, LookupError};

/// Full-text search for the best-matching article, then its REST page summary.
#[derive(Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    search_url: String,
    summary_url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

impl WikipediaClient {
    pub fn new(search_url: impl Into<String>, summary_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            search_url: search_url.into(),
            summary_url: summary_url.into(),
        }
    }

    fn page_url(&self, title: &str) -> String {
        let title = title.trim().replace(' ', "_");
        format!("{}/{}", self.summary_url.trim_end_matches('/'), urlencoding::encode(&title))
    }

    /// Title of the top search hit for a free-text query.
    async fn best_title(&self, query: &str) -> Result<String, LookupError> {
        let request = self.client.get(&self.search_url).query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", "1"),
            ("format", "json"),
        ]);
        let response: SearchResponse = get_json(request).await?;
        response
            .query
            .and_then(|q| q.search.into_iter().next())
            .map(|hit| hit.title)
            .ok_or(LookupError::NoMatch)
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn summary(&self, topic: &str, sentences: usize) -> Result<String, LookupError> {
        if topic.trim().is_empty() {
            return Err(LookupError::NoMatch);
        }
        let title = self.best_title(topic.trim()).await?;
        debug!("Encyclopedia hit for '{}': {}", topic, title);
        let page: PageSummary = get_json(self.client.get(self.page_url(&title))).await?;

        // A disambiguation page lists candidates rather than answering.
        if page.kind == "disambiguation" {
            return Err(LookupError::NoMatch);
        }
        let summary = first_sentences(&page.extract, sentences);
        if summary.is_empty() {
            return Err(LookupError::NoMatch);
        }
        Ok(summary)
    }
}

/// Keeps the first `count` sentences. A sentence ends at `.`, `!` or `?`
/// followed by whitespace or the end of the text.
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen >= count {
                    return text[..idx + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}
