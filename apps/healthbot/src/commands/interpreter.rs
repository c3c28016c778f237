use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::messages;
use super::parser::{Command, parse};
use crate::channel::{Dispatcher, Notifier, notify};
use crate::error::CommandError;
use crate::monitoring::{JobTag, Scheduler, StatusReportJob};
use crate::store::{ConfigStore, RemovalError};
use crate::validation::{normalize_domain, validate_interval};

/// Turns chat messages into store and scheduler mutations and answers them.
///
/// While a removal is pending, the next message is read as the removal
/// reply instead of as a command.
pub struct CommandInterpreter {
    store: Arc<ConfigStore>,
    scheduler: Arc<Scheduler>,
    reporter: Arc<StatusReportJob>,
    notifier: Arc<dyn Notifier>,
}

impl CommandInterpreter {
    pub fn new(
        store: Arc<ConfigStore>,
        scheduler: Arc<Scheduler>,
        reporter: Arc<StatusReportJob>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { store, scheduler, reporter, notifier }
    }

    /// Handle one inbound message and return the reply text
    pub async fn respond(&self, text: &str) -> String {
        let outcome = match self.removal_reply(text).await {
            Some(outcome) => outcome,
            None => self.execute(parse(text)).await,
        };
        outcome.unwrap_or_else(|e| e.to_string())
    }

    /// Resolve a pending removal, `None` when no removal is pending
    async fn removal_reply(&self, text: &str) -> Option<Result<String, CommandError>> {
        if !self.store.is_removal_pending().await {
            return None;
        }

        if parse(text) == Command::Cancel {
            self.store.cancel_removal().await;
            return Some(Ok("🚫 Removal cancelled.".to_string()));
        }

        let outcome = match self.store.resolve_removal(text).await {
            Ok(removed) => Ok(format!("✅ Domain removed: {removed}")),
            Err(RemovalError::InvalidSelection) => Err(CommandError::state(
                "Invalid selection. Please reply with a number from the list, or /cancel.",
            )),
            Err(RemovalError::Changed(domains)) => Err(CommandError::state(format!(
                "The domain list changed, please choose again:\n{}",
                messages::numbered(&domains)
            ))),
            Err(RemovalError::NothingLeft) => {
                Err(CommandError::state("There are no domains left to remove."))
            }
            // Cancelled between the check and the resolve
            Err(RemovalError::NotPending) => return None,
        };
        Some(outcome)
    }

    /// Execute a parsed command
    pub async fn execute(&self, command: Command<'_>) -> Result<String, CommandError> {
        match command {
            Command::SetCheckInterval(arg) => self.set_interval(JobTag::Check, arg).await,
            Command::SetReportInterval(arg) => self.set_interval(JobTag::Report, arg).await,
            Command::AddDomain(arg) => {
                let domain = normalize_domain(arg)?;
                if self.store.add_domain(&domain).await {
                    Ok(format!("✅ Domain added: {domain}"))
                } else {
                    Ok(format!("ℹ️ {domain} is already being monitored."))
                }
            }
            Command::RemoveDomain => match self.store.begin_removal().await {
                Some(domains) => Ok(messages::removal_prompt(&domains)),
                None => Err(CommandError::state("There are no domains to remove.")),
            },
            Command::Cancel => Err(CommandError::state("There is nothing to cancel.")),
            Command::Status => {
                notify(self.notifier.as_ref(), messages::GENERATING_REPORT).await;
                Ok(self.reporter.build_report().await)
            }
            Command::Config => {
                let intervals = self.store.intervals().await;
                let domains = self.store.domains().await;
                Ok(messages::configuration(intervals, &domains))
            }
            Command::Help => Ok(messages::HELP.to_string()),
            Command::Unknown => Ok(messages::NOT_UNDERSTOOD.to_string()),
        }
    }

    async fn set_interval(&self, tag: JobTag, arg: Option<&str>) -> Result<String, CommandError> {
        let seconds = validate_interval(arg, &tag.to_string())?;

        self.scheduler.replace_interval(tag, Duration::from_secs(seconds)).await.map_err(|e| {
            error!(%tag, "Failed to reschedule job: {e}");
            CommandError::state(format!("Could not reschedule the {tag} job."))
        })?;
        self.store.set_interval(tag, seconds).await;

        let label = match tag {
            JobTag::Check => "Health check interval",
            JobTag::Report => "Report interval",
        };
        Ok(format!("🕒 {label} set to {seconds} seconds."))
    }
}

#[async_trait]
impl Dispatcher for CommandInterpreter {
    async fn dispatch(&self, text: &str, sender: &str) {
        debug!(sender, "Handling command");
        let reply = self.respond(text).await;
        if !notify(self.notifier.as_ref(), &reply).await {
            info!(sender, "Reply could not be delivered");
        }
    }
}
