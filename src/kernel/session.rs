use chrono::{NaiveDateTime, Timelike};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::intent::ControlSignal;
use super::router::Assistant;
use super::scheduler::{ReminderScheduler, SchedulerEvent};
use crate::gateway::{Gateway, Utterance};

pub const WELCOME: &str = "Nice to see you! How can I help today?";

pub fn greeting_for(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning!"
    } else if hour < 18 {
        "Good Afternoon!"
    } else {
        "Good Evening!"
    }
}

/// Per-session state. `greeted` flips false -> true once and never back.
#[derive(Debug, Default)]
pub struct Session {
    greeted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greeted(&self) -> bool {
        self.greeted
    }

    /// Returns whether a greeting was actually spoken.
    pub async fn greet(&mut self, gateway: &dyn Gateway, now: NaiveDateTime) -> bool {
        if self.greeted {
            return false;
        }
        gateway.speak(greeting_for(now.hour())).await;
        gateway.speak(WELCOME).await;
        self.greeted = true;
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub utterances: usize,
    pub reminders_registered: usize,
    pub reminders_fired: usize,
}

/// greet -> start the scheduler -> listen/dispatch until `Exit`.
pub struct SessionLoop {
    session: Session,
    assistant: Assistant,
    scheduler: ReminderScheduler,
    events: mpsc::Receiver<SchedulerEvent>,
    shutdown: CancellationToken,
    summary: SessionSummary,
}

impl SessionLoop {
    pub fn new(
        assistant: Assistant,
        scheduler: ReminderScheduler,
        events: mpsc::Receiver<SchedulerEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            session: Session::new(),
            assistant,
            scheduler,
            events,
            shutdown,
            summary: SessionSummary::default(),
        }
    }

    pub async fn run(self) -> SessionSummary {
        let Self {
            mut session,
            assistant,
            scheduler,
            mut events,
            shutdown,
            mut summary,
        } = self;
        let gateway = assistant.gateway().clone();

        session.greet(gateway.as_ref(), assistant.clock().now()).await;

        let scheduler_task = tokio::spawn(scheduler.run_forever());
        info!("Session started");

        loop {
            drain_events(&mut events, &mut summary);

            let text = match gateway.listen(assistant.listen_timeout()).await {
                Utterance::Heard(text) => text,
                Utterance::NoInput => continue,
            };
            summary.utterances += 1;

            if assistant.classify_and_dispatch(&text).await == ControlSignal::Exit {
                break;
            }
        }

        shutdown.cancel();
        if let Err(e) = scheduler_task.await {
            debug!("Scheduler task ended abnormally: {}", e);
        }
        drain_events(&mut events, &mut summary);

        info!("Session ended: {:?}", summary);
        summary
    }
}

fn drain_events(events: &mut mpsc::Receiver<SchedulerEvent>, summary: &mut SessionSummary) {
    while let Ok(event) = events.try_recv() {
        match event {
            SchedulerEvent::Registered { job_id, at } => {
                debug!("Reminder {} registered for {}", job_id, at);
                summary.reminders_registered += 1;
            }
            SchedulerEvent::Fired(fired) => {
                info!("Reminder delivered: {}", fired.message);
                summary.reminders_fired += 1;
            }
        }
    }
}
