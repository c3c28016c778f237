//! HealthBot - domain availability monitor driven over a chat command channel
//!
//! Two loops share one [`store::ConfigStore`]: the scheduler tick loop, which
//! probes the monitored domains and reports failures, and the command
//! listener, which long-polls Telegram and lets the operator change the
//! domain set and both intervals at runtime.

pub mod channel;
pub mod commands;
pub mod config;
pub mod error;
pub mod monitoring;
pub mod orchestrator;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{CommandError, SchedulerError, TransportError};
pub use orchestrator::Orchestrator;
pub use store::{ConfigStore, Intervals};
