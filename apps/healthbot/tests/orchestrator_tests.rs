mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingNotifier, ScriptedSource, TableChecker, text};
use healthbot::monitoring::{JobTag, Prober};
use healthbot::{Config, Intervals, Orchestrator};

fn config(domains: &[&str]) -> Config {
    let mut config = Config::default();
    config.telegram.token = "TEST_TOKEN".into();
    config.telegram.chat_id = "4242".into();
    config.monitor.domains = domains.iter().map(|d| d.to_string()).collect();
    config.monitor.check_interval_seconds = 30;
    config.monitor.report_interval_seconds = 600;
    config
}

fn prober(checker: TableChecker) -> Arc<Prober> {
    Arc::new(Prober::new(Arc::new(checker), Duration::from_secs(5)))
}

#[tokio::test(start_paused = true)]
async fn test_new_registers_both_jobs() {
    let notifier = Arc::new(RecordingNotifier::default());
    let source = Arc::new(ScriptedSource::default());
    let orchestrator = Orchestrator::new(
        &config(&["https://a.example", "https://a.example", "https://b.example"]),
        prober(TableChecker::default()),
        notifier,
        source,
    )
    .await
    .unwrap();

    assert_eq!(orchestrator.store().domains().await, ["https://a.example", "https://b.example"]);
    assert_eq!(
        orchestrator.store().intervals().await,
        Intervals { check_seconds: 30, report_seconds: 600 }
    );

    let scheduler = orchestrator.scheduler();
    assert_eq!(scheduler.interval_of(JobTag::Check).await, Some(Duration::from_secs(30)));
    assert_eq!(scheduler.interval_of(JobTag::Report).await, Some(Duration::from_secs(600)));
}

#[tokio::test(start_paused = true)]
async fn test_run_welcomes_and_serves_commands() {
    let notifier = Arc::new(RecordingNotifier::default());
    let source = Arc::new(ScriptedSource::default());
    source.push(vec![text(1, "/set_check_interval 5"), text(2, "/add_domain https://c.example")]);

    let checker = TableChecker::default().with("https://c.example", Ok(500));
    let orchestrator = Orchestrator::new(
        &config(&["https://a.example"]),
        prober(checker),
        notifier.clone(),
        source.clone(),
    )
    .await
    .unwrap();
    let store = orchestrator.store();
    let scheduler = orchestrator.scheduler();

    let running = tokio::spawn(orchestrator.run());
    tokio::time::sleep(Duration::from_millis(5500)).await;
    running.abort();

    assert_eq!(scheduler.interval_of(JobTag::Check).await, Some(Duration::from_secs(5)));
    assert_eq!(store.domains().await, ["https://a.example", "https://c.example"]);

    let sent = notifier.sent();
    assert!(sent[0].contains("https://a.example"), "welcome should list domains: {}", sent[0]);
    assert_eq!(sent[1], "🕒 Health check interval set to 5 seconds.");
    assert_eq!(sent[2], "✅ Domain added: https://c.example");
    // The 5s check round fired once and alerted on the new failing domain only
    assert_eq!(sent[3..], ["❌ https://c.example failed with status: 500".to_string()]);
}
