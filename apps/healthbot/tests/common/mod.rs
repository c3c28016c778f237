//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use healthbot::channel::{CommandSource, InboundMessage, Notifier};
use healthbot::commands::CommandInterpreter;
use healthbot::monitoring::checker::Checker;
use healthbot::monitoring::{HealthCheckJob, JobTag, Prober, Scheduler, StatusReportJob};
use healthbot::{ConfigStore, Intervals, TransportError};

/// Notifier that keeps every message it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> String {
        self.sent().last().cloned().unwrap_or_default()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail { Err(TransportError::Connect("notifier offline".into())) } else { Ok(()) }
    }
}

/// Checker answering from a fixed table, 200 for unknown targets
#[derive(Default)]
pub struct TableChecker {
    answers: HashMap<String, Result<u16, TransportError>>,
    delay: Option<Duration>,
}

impl TableChecker {
    pub fn with(mut self, target: &str, answer: Result<u16, TransportError>) -> Self {
        self.answers.insert(target.to_string(), answer);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Checker for TableChecker {
    async fn check(&self, target: &str, _timeout: Duration) -> Result<u16, TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers.get(target).cloned().unwrap_or(Ok(200))
    }
}

/// Command source replaying scripted batches and recording each requested
/// checkpoint
#[derive(Default)]
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Result<Vec<InboundMessage>, TransportError>>>,
    requested: Mutex<Vec<Option<i64>>>,
}

impl ScriptedSource {
    pub fn push(&self, batch: Vec<InboundMessage>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, error: TransportError) {
        self.batches.lock().unwrap().push_back(Err(error));
    }

    pub fn requested(&self) -> Vec<Option<i64>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandSource for ScriptedSource {
    async fn fetch_since(
        &self,
        checkpoint: Option<i64>,
        wait: Duration,
    ) -> Result<Vec<InboundMessage>, TransportError> {
        self.requested.lock().unwrap().push(checkpoint);
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => batch,
            None => {
                // Nothing scripted: behave like a long poll that times out empty
                tokio::time::sleep(wait).await;
                Ok(Vec::new())
            }
        }
    }
}

pub fn text(id: i64, body: &str) -> InboundMessage {
    InboundMessage { id, sender: "1001".into(), text: Some(body.into()) }
}

/// Fully wired core over in-memory collaborators
pub struct Harness {
    pub store: Arc<ConfigStore>,
    pub scheduler: Arc<Scheduler>,
    pub notifier: Arc<RecordingNotifier>,
    pub health_check: Arc<HealthCheckJob>,
    pub reporter: Arc<StatusReportJob>,
    pub interpreter: Arc<CommandInterpreter>,
}

impl Harness {
    pub async fn new(domains: &[&str]) -> Self {
        Self::with_checker(domains, TableChecker::default()).await
    }

    pub async fn with_checker(domains: &[&str], checker: TableChecker) -> Self {
        let store = Arc::new(ConfigStore::new(
            domains.iter().map(|d| d.to_string()),
            Intervals { check_seconds: 60, report_seconds: 3600 },
        ));
        let prober = Arc::new(Prober::new(Arc::new(checker), Duration::from_secs(5)));
        let notifier = Arc::new(RecordingNotifier::default());

        let health_check =
            Arc::new(HealthCheckJob::new(store.clone(), prober.clone(), notifier.clone()));
        let reporter = Arc::new(StatusReportJob::new(store.clone(), prober, notifier.clone()));

        let scheduler = Arc::new(Scheduler::new());
        let check_every = Duration::from_secs(60);
        let report_every = Duration::from_secs(3600);
        scheduler.every(JobTag::Check, check_every, health_check.clone()).await.unwrap();
        scheduler.every(JobTag::Report, report_every, reporter.clone()).await.unwrap();

        let interpreter = Arc::new(CommandInterpreter::new(
            store.clone(),
            scheduler.clone(),
            reporter.clone(),
            notifier.clone(),
        ));

        Self { store, scheduler, notifier, health_check, reporter, interpreter }
    }

    pub async fn say(&self, line: &str) -> String {
        self.interpreter.respond(line).await
    }
}
