use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{get_json, http_client, InstantAnswer, LookupError};

#[derive(Clone)]
pub struct DuckDuckGoClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    // Usually a string, occasionally a structured widget we can't speak.
    #[serde(rename = "Answer", default)]
    answer: serde_json::Value,
}

impl InstantAnswerResponse {
    fn usable_text(self) -> Option<String> {
        let abstract_text = self.abstract_text.trim();
        if !abstract_text.is_empty() {
            return Some(abstract_text.to_string());
        }
        match self.answer {
            serde_json::Value::String(answer) if !answer.trim().is_empty() => {
                Some(answer.trim().to_string())
            }
            _ => None,
        }
    }
}

impl DuckDuckGoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl InstantAnswer for DuckDuckGoClient {
    async fn instant_answer(&self, query: &str) -> Result<String, LookupError> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")]);

        let response: InstantAnswerResponse = get_json(request).await?;
        let text = response.usable_text().ok_or(LookupError::NoMatch)?;
        debug!("Instant answer for '{}': {} chars", query, text.len());
        Ok(text)
    }
}
