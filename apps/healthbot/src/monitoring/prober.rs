use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::checker::{Checker, HttpChecker};
use super::types::{CheckResult, ProbeOutcome};
use crate::error::TransportError;

/// Extra time granted to the transport before the prober abandons the call
const TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Issues single bounded probes and classifies their outcome.
///
/// There are no retries here: a failed probe is reported as-is and the next
/// scheduled round is the retry.
pub struct Prober {
    checker: Arc<dyn Checker>,
    timeout: Duration,
}

impl Prober {
    pub fn new(checker: Arc<dyn Checker>, timeout: Duration) -> Self {
        Self { checker, timeout }
    }

    /// Prober backed by the reqwest HTTP checker
    pub fn http(timeout_seconds: u64, accept_invalid_certs: bool) -> Result<Self> {
        let checker = HttpChecker::new(accept_invalid_certs)?;
        Ok(Self::new(Arc::new(checker), Duration::from_secs(timeout_seconds)))
    }

    /// Probe one domain and classify the answer
    pub async fn probe(&self, domain: &str) -> ProbeOutcome {
        self.check(domain).await.outcome
    }

    /// Probe one domain, recording latency alongside the outcome
    pub async fn check(&self, domain: &str) -> CheckResult {
        debug!(domain, "Probing domain");
        let start = Instant::now();

        let bound = self.timeout + TIMEOUT_GRACE;
        let attempt = self.checker.check(domain, self.timeout);
        let outcome = match tokio::time::timeout(bound, attempt).await {
            Ok(Ok(200)) => ProbeOutcome::Up,
            Ok(Ok(code)) => ProbeOutcome::Down(code),
            Ok(Err(TransportError::Timeout)) | Err(_) => self.timed_out(),
            Ok(Err(e)) => unreachable_with(e.to_string()),
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(domain, %outcome, latency_ms, "Probe finished");
        CheckResult::new(domain, outcome, latency_ms)
    }

    /// Probe every domain concurrently. Results keep the order of `domains`.
    pub async fn check_all(&self, domains: &[String]) -> Vec<CheckResult> {
        join_all(domains.iter().map(|domain| self.check(domain))).await
    }

    fn timed_out(&self) -> ProbeOutcome {
        let secs = self.timeout.as_secs_f32();
        ProbeOutcome::Unreachable(format!("request timed out after {secs}s"))
    }
}

fn unreachable_with(detail: String) -> ProbeOutcome {
    if detail.trim().is_empty() {
        ProbeOutcome::Unreachable("unknown transport error".to_string())
    } else {
        ProbeOutcome::Unreachable(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedChecker(Result<u16, TransportError>);

    #[async_trait::async_trait]
    impl Checker for FixedChecker {
        async fn check(&self, _target: &str, _timeout: Duration) -> Result<u16, TransportError> {
            self.0.clone()
        }
    }

    struct HangingChecker;

    #[async_trait::async_trait]
    impl Checker for HangingChecker {
        async fn check(&self, _target: &str, _timeout: Duration) -> Result<u16, TransportError> {
            std::future::pending().await
        }
    }

    fn prober(result: Result<u16, TransportError>) -> Prober {
        Prober::new(Arc::new(FixedChecker(result)), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_status_200_is_up() {
        assert_eq!(prober(Ok(200)).probe("https://example.com").await, ProbeOutcome::Up);
    }

    #[tokio::test]
    async fn test_other_status_is_down() {
        assert_eq!(prober(Ok(404)).probe("https://example.com").await, ProbeOutcome::Down(404));
        assert_eq!(prober(Ok(204)).probe("https://example.com").await, ProbeOutcome::Down(204));
        assert_eq!(prober(Ok(503)).probe("https://example.com").await, ProbeOutcome::Down(503));
    }

    #[tokio::test]
    async fn test_transport_error_is_unreachable() {
        let outcome = prober(Err(TransportError::Connect("connection refused".into())))
            .probe("https://example.com")
            .await;
        assert_eq!(
            outcome,
            ProbeOutcome::Unreachable("connection failed: connection refused".into())
        );

        let outcome = prober(Err(TransportError::Timeout)).probe("https://example.com").await;
        match outcome {
            ProbeOutcome::Unreachable(detail) => assert!(detail.contains("timed out")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_transport_is_bounded() {
        let prober = Prober::new(Arc::new(HangingChecker), Duration::from_secs(2));
        let outcome = prober.probe("https://example.com").await;
        match outcome {
            ProbeOutcome::Unreachable(detail) => assert!(!detail.is_empty()),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_all_keeps_order() {
        let domains = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let results = prober(Ok(200)).check_all(&domains).await;
        let targets: Vec<_> = results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["https://a.example", "https://b.example"]);
        assert!(results.iter().all(CheckResult::is_up));
    }
}
