mod common;

use aria::kernel::resolver::{InformationResolver, Resolution, WEB_FALLBACK};
use aria::services::LookupError;
use common::{RecordingLauncher, ScriptedGateway, StubEncyclopedia, StubInstant};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    gateway: Arc<ScriptedGateway>,
    instant: Arc<StubInstant>,
    encyclopedia: Arc<StubEncyclopedia>,
    launcher: Arc<RecordingLauncher>,
}

impl Fixture {
    fn new(instant: Result<String, LookupError>, encyclopedia: StubEncyclopedia) -> Self {
        Self {
            gateway: Arc::new(ScriptedGateway::default()),
            instant: Arc::new(StubInstant::new(instant)),
            encyclopedia: Arc::new(encyclopedia),
            launcher: Arc::new(RecordingLauncher::default()),
        }
    }

    fn resolver(&self) -> InformationResolver {
        InformationResolver::new(
            self.instant.clone(),
            self.encyclopedia.clone(),
            self.launcher.clone(),
            self.gateway.clone(),
            "http://search.local/search",
        )
        .with_tier_timeout(Duration::from_millis(100))
    }
}

#[tokio::test]
async fn instant_answer_short_circuits_later_tiers() {
    let fx = Fixture::new(
        Ok("Rust is a systems programming language.".into()),
        StubEncyclopedia::new(Ok("unused".into())),
    );

    let resolution = fx.resolver().resolve("what is rust").await;

    assert_eq!(resolution, Resolution::InstantAnswer("Rust is a systems programming language.".into()));
    assert_eq!(fx.gateway.spoken(), vec!["Rust is a systems programming language.".to_string()]);
    assert_eq!(fx.encyclopedia.calls(), 0, "Tier 2 must not run");
    assert!(fx.launcher.urls().is_empty(), "Tier 3 must not run");
}

#[tokio::test]
async fn encyclopedia_answers_when_instant_is_empty() {
    let fx = Fixture::new(
        Err(LookupError::NoMatch),
        StubEncyclopedia::new(Ok("Ada Lovelace was a mathematician.".into())),
    );

    let resolution = fx.resolver().resolve("ada lovelace").await;

    assert_eq!(resolution, Resolution::Encyclopedia("Ada Lovelace was a mathematician.".into()));
    assert_eq!(fx.instant.calls(), 1);
    assert_eq!(fx.encyclopedia.calls(), 1);
    assert!(fx.launcher.urls().is_empty());
}

#[tokio::test]
async fn falls_through_to_web_search_exactly_once() {
    let fx = Fixture::new(Err(LookupError::NoMatch), StubEncyclopedia::new(Err(LookupError::NoMatch)));

    let resolution = fx.resolver().resolve("obscure thing").await;

    assert_eq!(
        resolution,
        Resolution::WebSearch { url: "http://search.local/search?q=obscure%20thing".into() }
    );
    assert_eq!(fx.launcher.urls().len(), 1);
    assert_eq!(fx.gateway.spoken(), vec![WEB_FALLBACK.to_string()]);
}

#[tokio::test]
async fn network_errors_are_treated_as_misses() {
    let fx = Fixture::new(
        Err(LookupError::Network("connection refused".into())),
        StubEncyclopedia::new(Err(LookupError::Malformed("bad json".into()))),
    );

    let resolution = fx.resolver().resolve("anything").await;

    assert!(matches!(resolution, Resolution::WebSearch { .. }));
    assert_eq!(fx.encyclopedia.calls(), 1);
}

#[tokio::test]
async fn slow_tier_is_cut_off_by_timeout() {
    let mut slow = StubEncyclopedia::new(Ok("too late".into()));
    slow.delay = Some(Duration::from_secs(5));
    let fx = Fixture::new(Err(LookupError::NoMatch), slow);

    let started = std::time::Instant::now();
    let resolution = fx.resolver().resolve("slow topic").await;

    assert!(matches!(resolution, Resolution::WebSearch { .. }));
    assert!(started.elapsed() < Duration::from_secs(2), "Tier timeout must bound the query");
}
