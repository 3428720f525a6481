use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use aria::gateway::ConsoleGateway;
use aria::kernel::scheduler::ReminderScheduler;
use aria::kernel::time::SystemClock;
use aria::services::{
    BuiltinJokes, DictionaryApiClient, DuckDuckGoClient, FileJournal, OpenMeteoClient,
    SystemLauncher, WikipediaClient,
};
use aria::{Assistant, AssistantConfig, Services, SessionLoop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    tracing::info!("Aria booting...");

    let config = AssistantConfig::load().context("loading configuration")?;
    config.validate()?;

    let timeout = config.tier_timeout();
    let endpoints = &config.endpoints;
    let gateway = Arc::new(ConsoleGateway::stdin(config.tts_command.clone()));
    let clock = Arc::new(SystemClock);

    let services = Services {
        gateway: gateway.clone(),
        instant: Arc::new(DuckDuckGoClient::new(&endpoints.instant_answer, timeout)),
        encyclopedia: Arc::new(WikipediaClient::new(
            &endpoints.encyclopedia_search,
            &endpoints.encyclopedia,
            timeout,
        )),
        launcher: Arc::new(SystemLauncher::new(&endpoints.video_site)),
        notes: Arc::new(FileJournal::new(&config.notes_path)),
        reminders: Arc::new(FileJournal::new(&config.reminders_path)),
        weather: Arc::new(OpenMeteoClient::new(&endpoints.geocoding, &endpoints.forecast, timeout)),
        dictionary: Arc::new(DictionaryApiClient::new(&endpoints.dictionary, timeout)),
        jokes: Arc::new(BuiltinJokes::new()),
        clock: clock.clone(),
    };

    let shutdown = CancellationToken::new();
    let (scheduler, handle, events) =
        ReminderScheduler::new(gateway, clock, config.poll_interval(), shutdown.clone());
    let assistant = Assistant::new(services, handle, &config);

    let summary = SessionLoop::new(assistant, scheduler, events, shutdown).run().await;
    tracing::info!(
        "Goodbye. {} utterance(s), {} reminder(s) fired",
        summary.utterances,
        summary.reminders_fired
    );
    Ok(())
}
