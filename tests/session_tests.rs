mod common;

use aria::kernel::session::{greeting_for, Session, SessionLoop, WELCOME};
use common::{at, Harness, ScriptedGateway};
use std::time::Duration;

#[tokio::test]
async fn greeting_happens_once() {
    let gateway = ScriptedGateway::default();
    let mut session = Session::new();

    assert!(session.greet(&gateway, at(9, 0)).await);
    assert!(!session.greet(&gateway, at(9, 5)).await);

    assert!(session.greeted());
    assert_eq!(gateway.spoken(), vec!["Good Morning!".to_string(), WELCOME.to_string()]);
}

#[test]
fn greeting_tracks_time_of_day() {
    assert_eq!(greeting_for(0), "Good Morning!");
    assert_eq!(greeting_for(11), "Good Morning!");
    assert_eq!(greeting_for(12), "Good Afternoon!");
    assert_eq!(greeting_for(17), "Good Afternoon!");
    assert_eq!(greeting_for(18), "Good Evening!");
}

#[tokio::test]
async fn loop_skips_silence_and_ends_on_bye() {
    let harness = Harness::new(&["", "tell me a joke", "", "bye", "open calculator"]);
    let (assistant, scheduler, events) = harness.build();

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        SessionLoop::new(assistant, scheduler, events, harness.shutdown.clone()).run(),
    )
    .await
    .expect("session should end on bye");

    assert_eq!(summary.utterances, 2);
    assert_eq!(
        harness.gateway.spoken(),
        vec![
            "Good Morning!".to_string(),
            WELCOME.to_string(),
            "A fixed joke.".to_string(),
            "Goodbye! Talk soon.".to_string(),
        ]
    );
    assert!(harness.launcher.launched().is_empty(), "Nothing after bye is handled");
    assert!(harness.shutdown.is_cancelled(), "Scheduler is shut down with the session");
}

#[tokio::test]
async fn stop_does_not_end_the_session() {
    let harness = Harness::new(&["stop", "bye"]);
    let (assistant, scheduler, events) = harness.build();

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        SessionLoop::new(assistant, scheduler, events, harness.shutdown.clone()).run(),
    )
    .await
    .unwrap();

    assert_eq!(summary.utterances, 2);
    assert!(harness.gateway.said("Okay, I'm going silent."));
    assert!(harness.gateway.said("Goodbye! Talk soon."));
}

#[tokio::test]
async fn reminder_added_mid_session_is_logged() {
    let harness = Harness::new(&["add a reminder", "stretch", "07:30", "bye"]);
    let (assistant, scheduler, events) = harness.build();

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        SessionLoop::new(assistant, scheduler, events, harness.shutdown.clone()).run(),
    )
    .await
    .unwrap();

    assert_eq!(summary.utterances, 2, "Prompt replies are not counted as commands");
    assert!(harness.gateway.said("Reminder scheduled at 07:30."));
    assert_eq!(harness.reminders.entries().await.len(), 1);
    assert_eq!(summary.reminders_fired, 0);
}
