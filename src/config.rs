use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "aria.toml";
pub const ENV_PREFIX: &str = "ARIA_";

/// Runtime configuration for the assistant.
/// Defaults are usable as-is; `aria.toml` and `ARIA_*` env vars override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// How long a single listen may wait for speech.
    pub listen_timeout_secs: u64,
    /// Upper bound for each resolver tier and each service call.
    pub tier_timeout_secs: u64,
    /// Reminder scheduler cadence.
    pub poll_interval_ms: u64,
    pub default_city: String,
    pub notes_path: PathBuf,
    pub reminders_path: PathBuf,
    /// Sentences kept from an encyclopedia summary.
    pub summary_sentences: usize,
    /// External text-to-speech program (e.g. `say`, `espeak`). Console only when unset.
    pub tts_command: Option<String>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub instant_answer: String,
    pub encyclopedia_search: String,
    pub encyclopedia: String,
    pub geocoding: String,
    pub forecast: String,
    pub dictionary: String,
    pub web_search: String,
    pub video_site: String,
    pub video_search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            instant_answer: "https://api.duckduckgo.com/".to_string(),
            encyclopedia_search: "https://en.wikipedia.org/w/api.php".to_string(),
            encyclopedia: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            dictionary: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            web_search: "https://www.google.com/search".to_string(),
            video_site: "https://www.youtube.com".to_string(),
            video_search: "https://www.youtube.com/results".to_string(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 5,
            tier_timeout_secs: 8,
            poll_interval_ms: 1000,
            default_city: "Delhi".to_string(),
            notes_path: PathBuf::from("notes.txt"),
            reminders_path: PathBuf::from("reminders.txt"),
            summary_sentences: 2,
            tts_command: None,
            endpoints: Endpoints::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("default city must not be empty")]
    EmptyCity,
}

impl AssistantConfig {
    /// Defaults, then `aria.toml` in the working directory, then `ARIA_*` env vars.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(AssistantConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("listen_timeout_secs"));
        }
        if self.tier_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("tier_timeout_secs"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroValue("poll_interval_ms"));
        }
        if self.summary_sentences == 0 {
            return Err(ConfigError::ZeroValue("summary_sentences"));
        }
        if self.default_city.trim().is_empty() {
            return Err(ConfigError::EmptyCity);
        }
        Ok(())
    }

    pub fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_secs(self.tier_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
