use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::services::{AppLauncher, Encyclopedia, InstantAnswer, LookupError};

pub const WEB_FALLBACK: &str = "I couldn't find an answer. Let me search it online.";

/// Which tier answered a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    InstantAnswer(String),
    Encyclopedia(String),
    /// Terminal tier: the browser was pointed at a web search.
    WebSearch { url: String },
}

impl Resolution {
    /// What the user heard.
    pub fn spoken(&self) -> &str {
        match self {
            Resolution::InstantAnswer(text) | Resolution::Encyclopedia(text) => text,
            Resolution::WebSearch { .. } => WEB_FALLBACK,
        }
    }
}

/// Answers open-ended questions through a fixed fallback chain:
/// instant answer -> encyclopedia summary -> browser web search.
/// Never fails from the caller's point of view.
pub struct InformationResolver {
    instant: Arc<dyn InstantAnswer>,
    encyclopedia: Arc<dyn Encyclopedia>,
    launcher: Arc<dyn AppLauncher>,
    gateway: Arc<dyn Gateway>,
    web_search_url: String,
    summary_sentences: usize,
    tier_timeout: Duration,
}

async fn within<T>(
    limit: Duration,
    lookup: impl Future<Output = Result<T, LookupError>>,
) -> Result<T, LookupError> {
    tokio::time::timeout(limit, lookup)
        .await
        .unwrap_or(Err(LookupError::Timeout))
}

impl InformationResolver {
    pub fn new(
        instant: Arc<dyn InstantAnswer>,
        encyclopedia: Arc<dyn Encyclopedia>,
        launcher: Arc<dyn AppLauncher>,
        gateway: Arc<dyn Gateway>,
        web_search_url: impl Into<String>,
    ) -> Self {
        Self {
            instant,
            encyclopedia,
            launcher,
            gateway,
            web_search_url: web_search_url.into(),
            summary_sentences: 2,
            tier_timeout: Duration::from_secs(8),
        }
    }

    pub fn with_tier_timeout(mut self, tier_timeout: Duration) -> Self {
        self.tier_timeout = tier_timeout;
        self
    }

    pub fn with_summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences;
        self
    }

    pub fn search_url(&self, query: &str) -> String {
        format!("{}?q={}", self.web_search_url, urlencoding::encode(query))
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        let resolution = match within(self.tier_timeout, self.instant.instant_answer(query)).await {
            Ok(answer) => Resolution::InstantAnswer(answer),
            Err(e) => {
                debug!("Instant answer tier missed for '{}': {}", query, e);
                match within(
                    self.tier_timeout,
                    self.encyclopedia.summary(query, self.summary_sentences),
                )
                .await
                {
                    Ok(summary) => Resolution::Encyclopedia(summary),
                    Err(e) => {
                        debug!("Encyclopedia tier missed for '{}': {}", query, e);
                        Resolution::WebSearch { url: self.search_url(query) }
                    }
                }
            }
        };

        self.gateway.speak(resolution.spoken()).await;

        if let Resolution::WebSearch { url } = &resolution {
            info!("Falling back to web search: {}", url);
            if let Err(e) = self.launcher.open_url(url).await {
                warn!("Web search fallback could not open a browser: {}", e);
            }
        }
        resolution
    }
}
