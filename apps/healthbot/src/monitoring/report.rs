//! Operator-facing texts built from check results.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::types::{CheckResult, ProbeOutcome};

/// Alert for a single failed check, `None` when the domain is up
pub fn failure_alert(result: &CheckResult) -> Option<String> {
    match &result.outcome {
        ProbeOutcome::Up => None,
        ProbeOutcome::Down(code) => {
            Some(format!("❌ {} failed with status: {code}", result.target))
        }
        ProbeOutcome::Unreachable(detail) => {
            Some(format!("❌ Error: could not connect to {}.\n{detail}", result.target))
        }
    }
}

/// One composite report covering every result, successes and failures alike
pub fn status_report(results: &[CheckResult], generated_at: DateTime<Utc>) -> String {
    let mut report =
        format!("📊 Domain status ({} UTC):\n", generated_at.format("%Y-%m-%d %H:%M:%S"));

    if results.is_empty() {
        report.push_str("⚠️ No domains are configured. Use /add_domain to add one.");
        return report;
    }

    for result in results {
        // Writing into a String cannot fail
        let _ = match &result.outcome {
            ProbeOutcome::Up => {
                writeln!(report, "✅ {} is up ({} ms)", result.target, result.latency_ms)
            }
            ProbeOutcome::Down(code) => {
                writeln!(report, "❌ {} failed with status: {code}", result.target)
            }
            ProbeOutcome::Unreachable(detail) => {
                writeln!(report, "❌ {} failed: {detail}", result.target)
            }
        };
    }

    let up = results.iter().filter(|r| r.is_up()).count();
    let _ = write!(report, "\n{up}/{} up", results.len());
    report
}
