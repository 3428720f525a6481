use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::intent::{rules, Classifier, ControlSignal, Intent};
use super::resolver::InformationResolver;
use super::scheduler::{ScheduleError, SchedulerHandle};
use super::time::{twelve_hour, Clock};
use crate::config::AssistantConfig;
use crate::gateway::Gateway;
use crate::services::{
    AppId, AppLauncher, Dictionary, Encyclopedia, InstantAnswer, JokeSource, Journal, LookupError,
    WeatherService,
};

pub const APP_NOT_RECOGNIZED: &str = "App not recognized.";
pub const NOTE_PROMPT: &str = "What should I note down?";
pub const REMINDER_PROMPT: &str = "What should I remind you about?";
pub const TIME_PROMPT: &str = "At what time? Please say in HH:MM format.";
pub const MEANING_NOT_FOUND: &str = "I couldn't find the meaning.";
pub const WEATHER_UNAVAILABLE: &str = "Unable to get weather data.";

/// Every external collaborator the dispatcher talks to.
#[derive(Clone)]
pub struct Services {
    pub gateway: Arc<dyn Gateway>,
    pub instant: Arc<dyn InstantAnswer>,
    pub encyclopedia: Arc<dyn Encyclopedia>,
    pub launcher: Arc<dyn AppLauncher>,
    pub notes: Arc<dyn Journal>,
    pub reminders: Arc<dyn Journal>,
    pub weather: Arc<dyn WeatherService>,
    pub dictionary: Arc<dyn Dictionary>,
    pub jokes: Arc<dyn JokeSource>,
    pub clock: Arc<dyn Clock>,
}

/// Classifies an utterance and runs the matching handler.
/// Handler failures are spoken to the user; nothing here ends the session except `Exit`.
pub struct Assistant {
    classifier: Classifier,
    services: Services,
    resolver: InformationResolver,
    scheduler: SchedulerHandle,
    listen_timeout: Duration,
    service_timeout: Duration,
    default_city: String,
    video_search_url: String,
}

impl Assistant {
    pub fn new(services: Services, scheduler: SchedulerHandle, config: &AssistantConfig) -> Self {
        let resolver = InformationResolver::new(
            services.instant.clone(),
            services.encyclopedia.clone(),
            services.launcher.clone(),
            services.gateway.clone(),
            config.endpoints.web_search.clone(),
        )
        .with_tier_timeout(config.tier_timeout())
        .with_summary_sentences(config.summary_sentences);

        Self {
            classifier: Classifier::default(),
            services,
            resolver,
            scheduler,
            listen_timeout: config.listen_timeout(),
            service_timeout: config.tier_timeout(),
            default_city: config.default_city.clone(),
            video_search_url: config.endpoints.video_search.clone(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.services.gateway
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.services.clock
    }

    pub fn listen_timeout(&self) -> Duration {
        self.listen_timeout
    }

    async fn speak(&self, text: &str) {
        self.services.gateway.speak(text).await;
    }

    pub async fn classify_and_dispatch(&self, utterance: &str) -> ControlSignal {
        let intent = self.classifier.classify_text(utterance);
        info!("Intent {:?} for '{}'", intent, utterance);

        match intent {
            Intent::Chitchat | Intent::Exit => return self.chitchat(utterance).await,
            Intent::OpenApp => self.open_app(utterance).await,
            Intent::TakeNote => self.take_note().await,
            Intent::ReadNotes => self.read_journal(&self.services.notes, "No notes found.").await,
            Intent::AddReminder => self.add_reminder().await,
            Intent::ReadReminders => {
                self.read_journal(&self.services.reminders, "No reminders found.").await
            }
            Intent::TellTime => self.tell_time().await,
            Intent::Joke => self.speak(&self.services.jokes.joke()).await,
            Intent::Weather => self.weather().await,
            Intent::DefineWord => self.define_word(rules::word_to_define(utterance)).await,
            Intent::SearchVideo => self.search_video(utterance).await,
            Intent::GenericQuery => {
                self.resolver.resolve(utterance).await;
            }
            Intent::Silence => {}
        }
        ControlSignal::Continue
    }

    async fn chitchat(&self, utterance: &str) -> ControlSignal {
        match self.classifier.chitchat.lookup(utterance) {
            Some(rule) => {
                self.speak(rule.response).await;
                rule.signal
            }
            None => ControlSignal::Continue,
        }
    }

    async fn open_app(&self, utterance: &str) {
        let Some(app) = AppId::recognize(rules::app_name(utterance)) else {
            self.speak(APP_NOT_RECOGNIZED).await;
            return;
        };
        if let Err(e) = self.services.launcher.launch(app).await {
            warn!("Launching {:?} failed: {}", app, e);
            self.speak("Sorry, I couldn't open that.").await;
        }
    }

    /// Speaks `prompt` and waits for one follow-up answer.
    async fn ask(&self, prompt: &str) -> Option<String> {
        self.speak(prompt).await;
        let answer = self.services.gateway.listen(self.listen_timeout).await;
        answer.text().map(str::to_string)
    }

    async fn take_note(&self) {
        let Some(content) = self.ask(NOTE_PROMPT).await else {
            return;
        };
        match self.services.notes.append(&content).await {
            Ok(()) => self.speak("Note saved.").await,
            Err(e) => {
                warn!("Saving note failed: {}", e);
                self.speak("Sorry, I couldn't save that note.").await;
            }
        }
    }

    async fn read_journal(&self, journal: &Arc<dyn Journal>, empty: &str) {
        match journal.read_all().await {
            Ok(Some(content)) if !content.trim().is_empty() => self.speak(&content).await,
            Ok(_) => self.speak(empty).await,
            Err(e) => {
                warn!("Reading journal failed: {}", e);
                self.speak("Sorry, I couldn't read that right now.").await;
            }
        }
    }

    async fn add_reminder(&self) {
        let Some(message) = self.ask(REMINDER_PROMPT).await else {
            return;
        };
        let Some(time_str) = self.ask(TIME_PROMPT).await else {
            return;
        };

        match self.scheduler.schedule(&message, &time_str).await {
            Ok(scheduled) => {
                let at = scheduled.at.format("%H:%M");
                if let Err(e) = self.services.reminders.append(&format!("{} at {}", message, at)).await {
                    warn!("Recording reminder failed: {}", e);
                }
                self.speak(&format!("Reminder scheduled at {}.", at)).await;
            }
            Err(ScheduleError::InvalidTime(text)) => {
                self.speak(&format!("Sorry, {} is not a valid time. Please use HH:MM.", text)).await;
            }
            Err(e) => {
                warn!("Scheduling reminder failed: {}", e);
                self.speak("Sorry, I couldn't schedule that reminder.").await;
            }
        }
    }

    async fn tell_time(&self) {
        let now = self.services.clock.now();
        self.speak(&format!("The time is {}", twelve_hour(now))).await;
    }

    async fn weather(&self) {
        let city = &self.default_city;
        let lookup = tokio::time::timeout(self.service_timeout, self.services.weather.current(city))
            .await
            .unwrap_or(Err(LookupError::Timeout));

        match lookup {
            Ok(weather) => {
                self.speak(&format!(
                    "The current temperature in {} is {}°C with wind speed {} km/h.",
                    city, weather.temperature, weather.windspeed
                ))
                .await
            }
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", city, e);
                self.speak(WEATHER_UNAVAILABLE).await;
            }
        }
    }

    async fn define_word(&self, word: &str) {
        if word.is_empty() {
            self.speak(MEANING_NOT_FOUND).await;
            return;
        }
        let lookup = tokio::time::timeout(self.service_timeout, self.services.dictionary.define(word))
            .await
            .unwrap_or(Err(LookupError::Timeout));

        match lookup {
            Ok(definitions) if !definitions.is_empty() => {
                for (part_of_speech, meanings) in &definitions {
                    if let Some(first) = meanings.first() {
                        self.speak(&format!("As a {}, {} means: {}", part_of_speech, word, first)).await;
                    }
                }
            }
            Ok(_) => self.speak(MEANING_NOT_FOUND).await,
            Err(e) => {
                info!("No definition for '{}': {}", word, e);
                self.speak(MEANING_NOT_FOUND).await;
            }
        }
    }

    async fn search_video(&self, utterance: &str) {
        self.speak("Searching on YouTube...").await;
        let term = rules::video_search_term(utterance);
        let url = format!("{}?search_query={}", self.video_search_url, urlencoding::encode(&term));
        if let Err(e) = self.services.launcher.open_url(&url).await {
            warn!("Opening video search failed: {}", e);
        }
    }
}
