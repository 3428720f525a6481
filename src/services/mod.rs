//! External collaborators the assistant calls out to.
//! Each is a trait so the kernel can be driven by recording fakes in tests.

pub mod dictionary;
pub mod duckduckgo;
pub mod jokes;
pub mod journal;
pub mod launcher;
pub mod open_meteo;
pub mod wikipedia;

pub use dictionary::{Definitions, Dictionary, DictionaryApiClient};
pub use duckduckgo::DuckDuckGoClient;
pub use jokes::{BuiltinJokes, JokeSource};
pub use journal::{FileJournal, Journal, JournalError, MemoryJournal};
pub use launcher::{AppId, AppLauncher, LaunchError, SystemLauncher};
pub use open_meteo::{CurrentWeather, OpenMeteoClient, WeatherService};
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// Why a lookup produced nothing usable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("lookup timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no match")]
    NoMatch,
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else if e.is_decode() {
            LookupError::Malformed(e.to_string())
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

/// Tier 1: short direct answers.
#[async_trait]
pub trait InstantAnswer: Send + Sync {
    /// `Err(NoMatch)` when the service has neither an abstract nor a direct answer.
    async fn instant_answer(&self, query: &str) -> Result<String, LookupError>;
}

/// Tier 2: encyclopedia summaries.
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    async fn summary(&self, topic: &str, sentences: usize) -> Result<String, LookupError>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    let built = reqwest::Client::builder()
        .timeout(timeout) // Network-level cap; the resolver adds its own per tier.
        .user_agent(concat!("aria/", env!("CARGO_PKG_VERSION")))
        .build();
    client_or_default(built)
}

/// Falls back to reqwest defaults, which carry no network timeout; the per-tier bound still applies.
fn client_or_default(built: reqwest::Result<reqwest::Client>) -> reqwest::Client {
    match built {
        Ok(client) => client,
        Err(e) => {
            warn!("HTTP client setup failed, continuing without a network timeout: {}", e);
            reqwest::Client::new()
        }
    }
}

pub(crate) async fn get_json<T>(request: reqwest::RequestBuilder) -> Result<T, LookupError>
where
    T: serde::de::DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LookupError::NoMatch);
    }
    if !status.is_success() {
        return Err(LookupError::Network(format!("status {}", status)));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
}
