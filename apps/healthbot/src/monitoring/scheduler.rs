use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::error::SchedulerError;

/// Wake period of the tick loop
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Jobs slower than this get a warning, since they hold up the rest of the tick
const SLOW_JOB_THRESHOLD: Duration = Duration::from_secs(10);

/// Tags of the periodic jobs. There is at most one job per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobTag {
    Check,
    Report,
}

impl fmt::Display for JobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobTag::Check => write!(f, "check"),
            JobTag::Report => write!(f, "report"),
        }
    }
}

/// Work driven by the scheduler
#[async_trait::async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self);
}

struct Entry {
    tag: JobTag,
    interval: Duration,
    last_fire: Instant,
    job: Arc<dyn ScheduledJob>,
}

/// Tag-keyed periodic jobs with runtime-replaceable intervals.
///
/// Due jobs are picked and stamped under the lock in one step, then run back
/// to back in registration order once the lock is released. A slow job
/// therefore delays the jobs after it in the same tick, and the tick loop
/// itself, but a replacement can never make one tick run both the old and
/// the new job for a tag.
pub struct Scheduler {
    jobs: Mutex<Vec<Entry>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self { jobs: Mutex::new(Vec::new()) }
    }

    /// Register the job under `tag`, replacing any job already there.
    ///
    /// The first run happens one full interval from now.
    pub async fn every(
        &self,
        tag: JobTag,
        interval: Duration,
        job: Arc<dyn ScheduledJob>,
    ) -> Result<(), SchedulerError> {
        ensure_positive(tag, interval)?;
        let entry = Entry { tag, interval, last_fire: Instant::now(), job };

        let mut jobs = self.jobs.lock().await;
        match jobs.iter_mut().find(|e| e.tag == tag) {
            Some(existing) => *existing = entry,
            None => jobs.push(entry),
        }
        info!(%tag, interval_secs = interval.as_secs(), "Job scheduled");
        Ok(())
    }

    /// Keep the job under `tag` but change its period, counting from now.
    pub async fn replace_interval(
        &self,
        tag: JobTag,
        interval: Duration,
    ) -> Result<(), SchedulerError> {
        ensure_positive(tag, interval)?;

        let mut jobs = self.jobs.lock().await;
        let entry = jobs
            .iter_mut()
            .find(|e| e.tag == tag)
            .ok_or_else(|| SchedulerError::UnknownJob(tag.to_string()))?;
        entry.interval = interval;
        entry.last_fire = Instant::now();
        info!(%tag, interval_secs = interval.as_secs(), "Job rescheduled");
        Ok(())
    }

    pub async fn interval_of(&self, tag: JobTag) -> Option<Duration> {
        self.jobs.lock().await.iter().find(|e| e.tag == tag).map(|e| e.interval)
    }

    /// Run every job whose interval has elapsed at `now`, and return the tags
    /// that fired.
    ///
    /// A fired job's timestamp is reset to `now` itself, not to its previous
    /// deadline plus the interval, so a late tick shifts the schedule instead
    /// of making it fire twice in a row.
    pub async fn tick(&self, now: Instant) -> Vec<JobTag> {
        let due: Vec<(JobTag, Arc<dyn ScheduledJob>)> = {
            let mut jobs = self.jobs.lock().await;
            jobs.iter_mut()
                .filter(|e| now.saturating_duration_since(e.last_fire) >= e.interval)
                .map(|e| {
                    e.last_fire = now;
                    (e.tag, Arc::clone(&e.job))
                })
                .collect()
        };

        for (tag, job) in &due {
            debug!(%tag, "Running scheduled job");
            let started = Instant::now();
            job.run().await;

            let took = started.elapsed();
            if took > SLOW_JOB_THRESHOLD {
                warn!(
                    %tag,
                    took_ms = took.as_millis() as u64,
                    "Scheduled job was slow, later jobs were delayed"
                );;
            }
        }

        due.into_iter().map(|(tag, _)| tag).collect()
    }

    /// Drive the scheduler forever from a background task
    pub fn spawn(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;
                self.tick(Instant::now()).await;
            }
        })
    }
}

fn ensure_positive(tag: JobTag, interval: Duration) -> Result<(), SchedulerError> {
    if interval.is_zero() {
        return Err(SchedulerError::ZeroInterval(tag.to_string()));
    }
    Ok(())
}
