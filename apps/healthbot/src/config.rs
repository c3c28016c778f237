use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::channel::telegram::DEFAULT_API_BASE;
use crate::store::Intervals;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: path::PathBuf, source: io::Error },

    #[error("failed to write config file {}: {source}", path.display())]
    Write { path: path::PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse { path: path::PathBuf, source: toml::de::Error },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config directory unavailable, set XDG_CONFIG_HOME or HOME")]
    ConfigPathUnavailable,

    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramSettings,
    pub monitor: MonitorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    /// Bot API token
    pub token: String,
    /// Chat that receives alerts, reports and replies
    pub chat_id: String,
    pub api_base: String,
    /// Long-poll wait of `getUpdates`
    pub poll_timeout_seconds: u64,
    /// Pause after a failed poll
    pub retry_delay_seconds: u64,
    /// Timeout of `sendMessage`
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Initial monitored set
    pub domains: Vec<String>,
    pub check_interval_seconds: u64,
    pub report_interval_seconds: u64,
    pub probe_timeout_seconds: u64,
    /// Skip TLS certificate verification on probes
    pub accept_invalid_certs: bool,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: String::new(),
            api_base: DEFAULT_API_BASE.into(),
            poll_timeout_seconds: 100,
            retry_delay_seconds: 1,
            request_timeout_seconds: 10,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            check_interval_seconds: 60,
            report_interval_seconds: 3600,
            probe_timeout_seconds: 5,
            accept_invalid_certs: false,
        }
    }
}

impl MonitorSettings {
    pub fn intervals(&self) -> Intervals {
        Intervals {
            check_seconds: self.check_interval_seconds,
            report_seconds: self.report_interval_seconds,
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/healthbot/config.toml or
/// $HOME/.config/...)
pub fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("healthbot/config.toml"))
}

/// Split a comma-separated domain list, dropping blanks and duplicates
fn split_domains(raw: &str) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for domain in raw.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        if !domains.iter().any(|d| d == domain) {
            domains.push(domain.to_string());
        }
    }
    domains
}

fn parse_seconds(name: &'static str, raw: &str) -> Result<u64, Error> {
    raw.trim().parse().map_err(|e| Error::InvalidSetting { name, reason: format!("'{raw}': {e}") })
}

fn redact(secret: &str) -> String {
    match secret.chars().count() {
        0 => "(unset)".into(),
        n if n <= 8 => "********".into(),
        _ => format!("{}********", secret.chars().take(4).collect::<String>()),
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current HealthBot Configuration:")?;
        write_title_1(f, "Telegram")?;
        write_1(f, "Token", &redact(&self.telegram.token))?;
        write_1(f, "Chat ID", &self.telegram.chat_id)?;
        write_1(f, "API Base", &self.telegram.api_base)?;
        write_1(f, "Poll Timeout (s)", &self.telegram.poll_timeout_seconds)?;
        write_1(f, "Retry Delay (s)", &self.telegram.retry_delay_seconds)?;
        write_1(f, "Request Timeout (s)", &self.telegram.request_timeout_seconds)?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Check Interval (s)", &self.monitor.check_interval_seconds)?;
        write_1(f, "Report Interval (s)", &self.monitor.report_interval_seconds)?;
        write_1(f, "Probe Timeout (s)", &self.monitor.probe_timeout_seconds)?;
        write_1(f, "Accept Invalid Certs", &self.monitor.accept_invalid_certs)?;
        write_1(f, "Domains", &self.monitor.domains.len())?;
        for domain in &self.monitor.domains {
            writeln!(f, "      - {domain}")?;
        }

        Ok(())
    }
}

impl Config {
    /// Load the config file, falling back to defaults.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present.
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::load(None)?;
    /// println!("{}", cfg);
    /// ```
    pub fn load(optional_path: Option<&path::Path>) -> Result<Self, Error> {
        match optional_path {
            Some(path) => Self::from_file(&normalize_toml_path(path)),
            None => match default_config_path() {
                Ok(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &path::Path) -> Result<Self, Error> {
        let raw_string = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&raw_string)
            .map_err(|source| Error::Parse { path: path.to_path_buf(), source })
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) -> Result<(), Error> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Override settings from a variable lookup, using the names of the
    /// process environment
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), Error> {
        if let Some(raw) = lookup("HEALTH_CHECK_DOMAINS") {
            self.monitor.domains = split_domains(&raw);
        }
        if let Some(token) = lookup("TELEGRAM_TOKEN") {
            self.telegram.token = token.trim().to_string();
        }
        if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = chat_id.trim().to_string();
        }
        if let Some(api_base) = lookup("TELEGRAM_API_BASE") {
            self.telegram.api_base = api_base.trim().to_string();
        }
        if let Some(raw) = lookup("CHECK_INTERVAL") {
            self.monitor.check_interval_seconds = parse_seconds("CHECK_INTERVAL", &raw)?;
        }
        if let Some(raw) = lookup("STATUS_REPORT_INTERVAL") {
            self.monitor.report_interval_seconds = parse_seconds("STATUS_REPORT_INTERVAL", &raw)?;
        }
        if let Some(raw) = lookup("PROBE_TIMEOUT") {
            self.monitor.probe_timeout_seconds = parse_seconds("PROBE_TIMEOUT", &raw)?;
        }
        Ok(())
    }

    /// Check that the bot can start with these settings
    pub fn validate(&self) -> Result<(), Error> {
        if self.telegram.token.is_empty() {
            return Err(Error::MissingSetting("telegram.token (TELEGRAM_TOKEN)"));
        }
        if self.telegram.chat_id.is_empty() {
            return Err(Error::MissingSetting("telegram.chat_id (TELEGRAM_CHAT_ID)"));
        }

        let positive = [
            ("monitor.check_interval_seconds", self.monitor.check_interval_seconds),
            ("monitor.report_interval_seconds", self.monitor.report_interval_seconds),
            ("monitor.probe_timeout_seconds", self.monitor.probe_timeout_seconds),
            ("telegram.poll_timeout_seconds", self.telegram.poll_timeout_seconds),
            ("telegram.request_timeout_seconds", self.telegram.request_timeout_seconds),
        ];
        for (name, value) in positive {
            if value == 0 {
                let reason = "must be greater than zero".into();
                return Err(Error::InvalidSetting { name, reason });
            }
        }

        Ok(())
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let path = normalize_toml_path(path);
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::Write { path: path.clone(), source })?;
        }

        fs::write(&path, config_str).map_err(|source| Error::Write { path, source })
    }
}
