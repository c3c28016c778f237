//! The two periodic jobs: failure alerts and the composite status report.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prober::Prober;
use super::report::{failure_alert, status_report};
use super::scheduler::ScheduledJob;
use crate::channel::{Notifier, notify};
use crate::store::ConfigStore;

/// Probes every domain and alerts once per failing domain.
///
/// Alerts are not deduplicated: a domain that stays down is reported on
/// every round.
pub struct HealthCheckJob {
    store: Arc<ConfigStore>,
    prober: Arc<Prober>,
    notifier: Arc<dyn Notifier>,
}

impl HealthCheckJob {
    pub fn new(store: Arc<ConfigStore>, prober: Arc<Prober>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, prober, notifier }
    }
}

#[async_trait]
impl ScheduledJob for HealthCheckJob {
    async fn run(&self) {
        let domains = self.store.domains().await;
        if domains.is_empty() {
            debug!("Health check skipped, no domains configured");
            return;
        }

        let results = self.prober.check_all(&domains).await;
        let mut failures = 0;
        for result in &results {
            if let Some(alert) = failure_alert(result) {
                failures += 1;
                warn!(domain = %result.target, outcome = %result.outcome, "Domain check failed");
                notify(self.notifier.as_ref(), &alert).await;
            }
        }
        info!(checked = results.len(), failures, "Health check finished");
    }
}

/// Probes every domain and sends a single message covering all of them
pub struct StatusReportJob {
    store: Arc<ConfigStore>,
    prober: Arc<Prober>,
    notifier: Arc<dyn Notifier>,
}

impl StatusReportJob {
    pub fn new(store: Arc<ConfigStore>, prober: Arc<Prober>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, prober, notifier }
    }

    /// Probe the current set and build the report text
    pub async fn build_report(&self) -> String {
        let domains = self.store.domains().await;
        let results = self.prober.check_all(&domains).await;
        status_report(&results, Utc::now())
    }

    /// Build the report and send it right away
    pub async fn send_report(&self) {
        let report = self.build_report().await;
        notify(self.notifier.as_ref(), &report).await;
    }
}

#[async_trait]
impl ScheduledJob for StatusReportJob {
    async fn run(&self) {
        info!("Sending scheduled status report");
        self.send_report().await;
    }
}
