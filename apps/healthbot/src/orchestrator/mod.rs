//! Orchestrator module - wires the components together
//!
//! The orchestrator:
//! - Builds the shared config store from the startup configuration
//! - Registers the `check` and `report` jobs on the scheduler
//! - Runs the scheduler tick loop and the command listener side by side

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::channel::{CommandListener, CommandSource, Notifier, TelegramChannel, notify};
use crate::commands::{CommandInterpreter, messages};
use crate::config::Config;
use crate::monitoring::scheduler::TICK_PERIOD;
use crate::monitoring::{HealthCheckJob, JobTag, Prober, Scheduler, StatusReportJob};
use crate::store::ConfigStore;

/// Main orchestrator for the HealthBot service
pub struct Orchestrator {
    store: Arc<ConfigStore>,
    scheduler: Arc<Scheduler>,
    notifier: Arc<dyn Notifier>,
    listener: CommandListener,
}

impl Orchestrator {
    /// Create and run an orchestrator talking to Telegram.
    /// Returns on Ctrl-C or when one of the loops stops.
    pub async fn start(config: Config) -> Result<()> {
        let telegram = Arc::new(
            TelegramChannel::new(&config.telegram.token, &config.telegram.chat_id)
                .with_api_base(&config.telegram.api_base)
                .with_request_timeout(Duration::from_secs(config.telegram.request_timeout_seconds)),
        );
        let prober = Arc::new(Prober::http(
            config.monitor.probe_timeout_seconds,
            config.monitor.accept_invalid_certs,
        )?);

        let orchestrator = Self::new(&config, prober, telegram.clone(), telegram).await?;
        orchestrator.run().await
    }

    /// Build the component graph over the given collaborators
    pub async fn new(
        config: &Config,
        prober: Arc<Prober>,
        notifier: Arc<dyn Notifier>,
        source: Arc<dyn CommandSource>,
    ) -> Result<Self> {
        let intervals = config.monitor.intervals();
        let store = Arc::new(ConfigStore::new(config.monitor.domains.clone(), intervals));
        info!(
            domains = config.monitor.domains.len(),
            check_secs = intervals.check_seconds,
            report_secs = intervals.report_seconds,
            "Initializing HealthBot"
        );

        let health_check =
            Arc::new(HealthCheckJob::new(store.clone(), prober.clone(), notifier.clone()));
        let reporter = Arc::new(StatusReportJob::new(store.clone(), prober, notifier.clone()));

        let scheduler = Arc::new(Scheduler::new());
        scheduler
            .every(JobTag::Check, Duration::from_secs(intervals.check_seconds), health_check)
            .await?;
        scheduler
            .every(JobTag::Report, Duration::from_secs(intervals.report_seconds), reporter.clone())
            .await?;

        let interpreter = Arc::new(CommandInterpreter::new(
            store.clone(),
            scheduler.clone(),
            reporter,
            notifier.clone(),
        ));
        let listener = CommandListener::new(
            source,
            interpreter,
            Duration::from_secs(config.telegram.poll_timeout_seconds),
            Duration::from_secs(config.telegram.retry_delay_seconds),
        );

        Ok(Self { store, scheduler, notifier, listener })
    }

    pub fn store(&self) -> Arc<ConfigStore> {
        self.store.clone()
    }

    pub fn scheduler(&self) -> Arc<Scheduler> {
        self.scheduler.clone()
    }

    /// Send the welcome message, then run both loops until shutdown
    pub async fn run(self) -> Result<()> {
        let welcome = messages::welcome(self.store.intervals().await, &self.store.domains().await);
        notify(self.notifier.as_ref(), &welcome).await;

        let mut scheduler_handle = self.scheduler.spawn(TICK_PERIOD);
        let mut listener_handle = self.listener.spawn();
        info!("HealthBot running");

        tokio::select! {
            result = &mut scheduler_handle => error!("Scheduler loop stopped: {result:?}"),
            result = &mut listener_handle => error!("Command listener stopped: {result:?}"),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => info!("Shutdown requested"),
                Err(e) => error!("Failed to listen for shutdown signal: {e}"),
            },
        }

        scheduler_handle.abort();
        listener_handle.abort();
        info!("HealthBot stopped");
        Ok(())
    }
}
