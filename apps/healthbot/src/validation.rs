//! Argument validation for chat commands.
//!
//! Everything here runs before any state is touched, so a rejected argument
//! never reaches the config store or the scheduler.

use reqwest::Url;

use crate::error::CommandError;

/// Parse a positive number of seconds from a command argument.
///
/// `what` names the interval in the operator-facing message ("check",
/// "report").
pub fn validate_interval(raw: Option<&str>, what: &str) -> Result<u64, CommandError> {
    let Some(raw) = raw else {
        return Err(CommandError::validation(format!(
            "Please provide a valid number of seconds for the {what} interval."
        )));
    };

    let seconds: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CommandError::validation("Please provide a valid number for the interval."))?;

    if seconds <= 0 {
        return Err(CommandError::validation(format!(
            "The {what} interval must be a positive number of seconds, got {seconds}."
        )));
    }

    Ok(seconds as u64)
}

/// Validate and normalize a domain given to `/add_domain`.
///
/// The value must be an absolute http(s) URL with a host, since it is used
/// verbatim as the probe target.
pub fn normalize_domain(raw: Option<&str>) -> Result<String, CommandError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(CommandError::validation("Please provide a domain to add."));
    }

    // A bare host used verbatim as a probe target never comes back up
    if !raw.contains("://") {
        return Err(CommandError::validation(format!(
            "'{raw}' has no scheme. Probes need the full address, e.g. https://{raw}"
        )));
    }

    let url = Url::parse(raw).map_err(|e| {
        CommandError::validation(format!(
            "'{raw}' is not a valid URL ({e}). Use the full address, e.g. https://example.com"
        ))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CommandError::validation(format!(
                "Unsupported scheme '{other}', only http and https can be monitored."
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(CommandError::validation(format!("'{raw}' has no host to monitor.")));
    }

    Ok(raw.to_string())
}
