//! Tracing subscriber setup shared by the healthbot binaries.
//!
//! The output format is picked from `RUST_LOG_FORMAT` (`json`, `pretty`,
//! anything else means compact) and the filter from `RUST_LOG`, falling back
//! to the level passed by the caller.

use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{
    Layer, Registry,
    filter::EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    /// Parse a `RUST_LOG_FORMAT` value, unknown values fall back to compact
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }

    fn from_env() -> Self {
        var("RUST_LOG_FORMAT")
            .inspect_err(|error| {
                warn!("Failed to read RUST_LOG_FORMAT, falling back to default: {error}")
            })
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }
}

/// Install the global subscriber, panicking if one is already set.
pub fn init(level: LevelFilter) {
    build(level).init();
}

/// Install the global subscriber unless one is already set.
pub fn try_init(level: LevelFilter) -> Result<(), TryInitError> {
    build(level).try_init()
}

fn build(level: LevelFilter) -> impl SubscriberInitExt + Into<tracing::Dispatch> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_layer: Box<dyn Layer<Registry> + Send + Sync> = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Pretty => {
            tracing_subscriber::fmt::layer().pretty().with_filter(env_filter).boxed()
        }
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(log_layer)
}
