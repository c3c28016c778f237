use std::fmt;
use std::time::SystemTime;

/// Classified outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target answered with exactly 200
    Up,
    /// The target answered, but with another status code
    Down(u16),
    /// No HTTP answer at all (timeout, DNS, TLS, refused connection)
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Up => write!(f, "up"),
            ProbeOutcome::Down(code) => write!(f, "down ({code})"),
            ProbeOutcome::Unreachable(detail) => write!(f, "unreachable ({detail})"),
        }
    }
}

/// Result of probing one domain
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// URL that was probed
    pub target: String,

    /// When the probe started
    pub timestamp: SystemTime,

    /// Time until the response (or the failure) in milliseconds
    pub latency_ms: u64,

    pub outcome: ProbeOutcome,
}

impl CheckResult {
    pub fn new(target: impl Into<String>, outcome: ProbeOutcome, latency_ms: u64) -> Self {
        Self { target: target.into(), timestamp: SystemTime::now(), latency_ms, outcome }
    }

    pub fn is_up(&self) -> bool {
        self.outcome.is_up()
    }
}
