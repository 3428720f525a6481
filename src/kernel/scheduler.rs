use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::time::Clock;
use crate::gateway::Gateway;

pub type JobId = Uuid;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("'{0}' is not a valid HH:MM time")]
    InvalidTime(String),
    #[error("reminder message is empty")]
    EmptyMessage,
    #[error("reminder scheduler is not running")]
    Stopped,
}

/// Strict 24-hour `H:MM` / `HH:MM`.
pub fn parse_reminder_time(text: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(text.to_string());
    let (hours, minutes) = text.trim().split_once(':').ok_or_else(invalid)?;

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || !digits(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// First instant strictly after `after` whose time-of-day is `at`.
fn next_occurrence(at: NaiveTime, after: NaiveDateTime) -> NaiveDateTime {
    let candidate = after.date().and_time(at);
    if candidate > after {
        candidate
    } else {
        candidate + ChronoDuration::days(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Not yet fired today.
    Pending,
    /// Already fired today; implicitly pending again tomorrow.
    Fired,
}

/// A daily reminder. Owned by the registry for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderJob {
    pub id: JobId,
    pub message: String,
    pub at: NaiveTime,
    next_run: NaiveDateTime,
    last_fired: Option<NaiveDateTime>,
}

impl ReminderJob {
    pub fn new(message: impl Into<String>, at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            at,
            next_run: next_occurrence(at, now),
            last_fired: None,
        }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    pub fn status(&self, now: NaiveDateTime) -> JobStatus {
        match self.last_fired {
            Some(fired) if fired.date() == now.date() => JobStatus::Fired,
            _ => JobStatus::Pending,
        }
    }

    fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredReminder {
    pub job_id: JobId,
    pub message: String,
    pub fired_at: NaiveDateTime,
}

impl FiredReminder {
    pub fn speech(&self) -> String {
        format!("Reminder: {}", self.message)
    }
}

/// Clock-agnostic job table. Time only moves when the caller passes a new `now`.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<ReminderJob>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, job: ReminderJob) -> JobId {
        let id = job.id;
        self.jobs.push(job);
        id
    }

    pub fn jobs(&self) -> &[ReminderJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Fires every due job once and rolls it to its next daily occurrence.
    pub fn run_pending(&mut self, now: NaiveDateTime) -> Vec<FiredReminder> {
        let mut fired = Vec::new();
        for job in self.jobs.iter_mut().filter(|job| job.is_due(now)) {
            job.last_fired = Some(now);
            job.next_run = next_occurrence(job.at, now);
            fired.push(FiredReminder {
                job_id: job.id,
                message: job.message.clone(),
                fired_at: now,
            });
        }
        fired
    }
}

/// What the scheduler task reports back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    Registered { job_id: JobId, at: NaiveTime },
    Fired(FiredReminder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub job_id: JobId,
    pub at: NaiveTime,
}

/// Cheap, cloneable front door to the scheduler task. Validates before anything is queued.
#[derive(Clone)]
pub struct SchedulerHandle {
    jobs: mpsc::Sender<ReminderJob>,
    clock: Arc<dyn Clock>,
}

impl SchedulerHandle {
    pub async fn schedule(&self, message: &str, time_str: &str) -> Result<ScheduledReminder, ScheduleError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ScheduleError::EmptyMessage);
        }
        let at = parse_reminder_time(time_str)?;
        let job = ReminderJob::new(message, at, self.clock.now());
        let scheduled = ScheduledReminder { job_id: job.id, at };

        self.jobs.send(job).await.map_err(|_| ScheduleError::Stopped)?;
        Ok(scheduled)
    }
}

/// Background task owning the job registry. Polls the clock on a fixed cadence.
pub struct ReminderScheduler {
    registry: JobRegistry,
    jobs_rx: mpsc::Receiver<ReminderJob>,
    events_tx: mpsc::Sender<SchedulerEvent>,
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl ReminderScheduler {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> (Self, SchedulerHandle, mpsc::Receiver<SchedulerEvent>) {
        let (jobs_tx, jobs_rx) = mpsc::channel(32);
        let (events_tx, events_rx) = mpsc::channel(100);
        let handle = SchedulerHandle {
            jobs: jobs_tx,
            clock: clock.clone(),
        };
        let scheduler = Self {
            registry: JobRegistry::new(),
            jobs_rx,
            events_tx,
            gateway,
            clock,
            poll_interval,
            shutdown,
        };
        (scheduler, handle, events_rx)
    }

    /// Convenience: build and `tokio::spawn` the polling loop.
    pub fn spawn(
        gateway: Arc<dyn Gateway>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> (SchedulerHandle, mpsc::Receiver<SchedulerEvent>, JoinHandle<()>) {
        let (scheduler, handle, events) = Self::new(gateway, clock, poll_interval, shutdown);
        let task = tokio::spawn(scheduler.run_forever());
        (handle, events, task)
    }

    /// Runs until the shutdown token is cancelled.
    pub async fn run_forever(mut self) {
        info!("Reminder scheduler started. Poll: {:?}", self.poll_interval);

        let mut cadence = tokio::time::interval(self.poll_interval);
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                Some(job) = self.jobs_rx.recv() => {
                    debug!("Registered reminder {} at {}", job.id, job.at);
                    self.emit(SchedulerEvent::Registered { job_id: job.id, at: job.at });
                    self.registry.register(job);
                }
                _ = cadence.tick() => {
                    for fired in self.registry.run_pending(self.clock.now()) {
                        info!("Reminder {} fired", fired.job_id);
                        self.gateway.speak(&fired.speech()).await;
                        self.emit(SchedulerEvent::Fired(fired));
                    }
                }
            }
        }

        info!("Reminder scheduler stopped with {} job(s)", self.registry.len());
    }

    fn emit(&self, event: SchedulerEvent) {
        // Nobody draining events must never stall the reminders themselves.
        if let Err(mpsc::error::TrySendError::Full(event)) = self.events_tx.try_send(event) {
            warn!("Scheduler event dropped, channel full: {:?}", event);
        }
    }
}
