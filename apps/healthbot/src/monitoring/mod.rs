//! Monitoring engine - probes domains on a schedule
//!
//! This module is responsible for:
//! - Issuing bounded HTTP probes and classifying their outcome
//! - Driving the tag-keyed periodic jobs
//! - Building failure alerts and status reports

pub mod checker;
pub mod jobs;
pub mod prober;
pub mod report;
pub mod scheduler;
pub mod types;

pub use jobs::{HealthCheckJob, StatusReportJob};
pub use prober::Prober;
pub use scheduler::{JobTag, ScheduledJob, Scheduler};
pub use types::{CheckResult, ProbeOutcome};
