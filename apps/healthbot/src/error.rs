use thiserror::Error;

/// Network failure of a probe, a notification or a command poll
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display hides the cause chain, which is where the useful
        // part ("dns error", "connection refused") lives
        let detail = error_chain(&err);
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(detail)
        } else if err.is_decode() {
            TransportError::Decode(detail)
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(detail)
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

/// User-visible failure of a chat command. The display text is what the
/// operator receives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Bad command argument, nothing was mutated
    #[error("⚠️ {0}")]
    Validation(String),

    /// Command not applicable to the current state, nothing was mutated
    #[error("⚠️ {0}")]
    State(String),
}

impl CommandError {
    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::Validation(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        CommandError::State(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no job registered under tag '{0}'")]
    UnknownJob(String),

    #[error("job '{0}' needs a positive interval")]
    ZeroInterval(String),
}
