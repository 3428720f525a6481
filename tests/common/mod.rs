#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use aria::gateway::{Gateway, Utterance};
use aria::kernel::scheduler::{ReminderScheduler, SchedulerEvent};
use aria::kernel::time::ManualClock;
use aria::services::{
    AppId, AppLauncher, CurrentWeather, Definitions, Dictionary, Encyclopedia, InstantAnswer,
    JokeSource, LaunchError, LookupError, MemoryJournal, WeatherService,
};
use aria::{Assistant, AssistantConfig, Services};

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
}

/// Replays a fixed transcript and records everything spoken.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Utterance>>,
    spoken: Mutex<Vec<String>>,
    listens: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(lines: &[&str]) -> Self {
        let gateway = Self::default();
        gateway.push(lines);
        gateway
    }

    /// `""` stands for the no-input sentinel.
    pub fn push(&self, lines: &[&str]) {
        let mut script = self.script.lock().unwrap();
        for line in lines {
            script.push_back(Utterance::heard(line));
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn said(&self, text: &str) -> bool {
        self.spoken().iter().any(|s| s == text)
    }

    pub fn listens(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn listen(&self, _timeout: Duration) -> Utterance {
        self.listens.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(utterance) => utterance,
            None => {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Utterance::NoInput
            }
        }
    }

    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

pub struct StubInstant {
    pub answer: Result<String, LookupError>,
    pub calls: AtomicUsize,
}

impl StubInstant {
    pub fn new(answer: Result<String, LookupError>) -> Self {
        Self { answer, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstantAnswer for StubInstant {
    async fn instant_answer(&self, _query: &str) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub struct StubEncyclopedia {
    pub summary: Result<String, LookupError>,
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
}

impl StubEncyclopedia {
    pub fn new(summary: Result<String, LookupError>) -> Self {
        Self { summary, calls: AtomicUsize::new(0), delay: None }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encyclopedia for StubEncyclopedia {
    async fn summary(&self, _topic: &str, _sentences: usize) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.summary.clone()
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<AppId>>,
    pub urls: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn launched(&self) -> Vec<AppId> {
        self.launched.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AppLauncher for RecordingLauncher {
    async fn launch(&self, app: AppId) -> Result<(), LaunchError> {
        self.launched.lock().unwrap().push(app);
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct StubWeather(pub Result<CurrentWeather, LookupError>);

#[async_trait]
impl WeatherService for StubWeather {
    async fn current(&self, _city: &str) -> Result<CurrentWeather, LookupError> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct StubDictionary {
    pub definitions: Definitions,
    pub asked: Mutex<Vec<String>>,
}

#[async_trait]
impl Dictionary for StubDictionary {
    async fn define(&self, word: &str) -> Result<Definitions, LookupError> {
        self.asked.lock().unwrap().push(word.to_string());
        if self.definitions.is_empty() {
            Err(LookupError::NoMatch)
        } else {
            Ok(self.definitions.clone())
        }
    }
}

pub struct FixedJoke;

impl JokeSource for FixedJoke {
    fn joke(&self) -> String {
        "A fixed joke.".to_string()
    }
}

/// All collaborators as concrete fakes so tests can inspect them afterwards.
pub struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub instant: Arc<StubInstant>,
    pub encyclopedia: Arc<StubEncyclopedia>,
    pub launcher: Arc<RecordingLauncher>,
    pub notes: Arc<MemoryJournal>,
    pub reminders: Arc<MemoryJournal>,
    pub weather: Arc<StubWeather>,
    pub dictionary: Arc<StubDictionary>,
    pub clock: Arc<ManualClock>,
    pub config: AssistantConfig,
    pub shutdown: CancellationToken,
}

impl Harness {
    pub fn new(script: &[&str]) -> Self {
        let config = AssistantConfig {
            poll_interval_ms: 10,
            tier_timeout_secs: 1,
            ..AssistantConfig::default()
        };
        Self {
            gateway: Arc::new(ScriptedGateway::new(script)),
            instant: Arc::new(StubInstant::new(Err(LookupError::NoMatch))),
            encyclopedia: Arc::new(StubEncyclopedia::new(Err(LookupError::NoMatch))),
            launcher: Arc::new(RecordingLauncher::default()),
            notes: Arc::new(MemoryJournal::new()),
            reminders: Arc::new(MemoryJournal::new()),
            weather: Arc::new(StubWeather(Err(LookupError::NoMatch))),
            dictionary: Arc::new(StubDictionary::default()),
            clock: Arc::new(ManualClock::new(at(7, 0))),
            config,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn services(&self) -> Services {
        Services {
            gateway: self.gateway.clone(),
            instant: self.instant.clone(),
            encyclopedia: self.encyclopedia.clone(),
            launcher: self.launcher.clone(),
            notes: self.notes.clone(),
            reminders: self.reminders.clone(),
            weather: self.weather.clone(),
            dictionary: self.dictionary.clone(),
            jokes: Arc::new(FixedJoke),
            clock: self.clock.clone(),
        }
    }

    /// Assistant plus its not-yet-started scheduler.
    pub fn build(&self) -> (Assistant, ReminderScheduler, mpsc::Receiver<SchedulerEvent>) {
        let (scheduler, handle, events) = ReminderScheduler::new(
            self.gateway.clone(),
            self.clock.clone(),
            self.config.poll_interval(),
            self.shutdown.clone(),
        );
        let assistant = Assistant::new(self.services(), handle, &self.config);
        (assistant, scheduler, events)
    }
}
