//! Runtime configuration shared by the scheduler and the command listener.
//!
//! Each field group sits behind its own lock. When both the pending removal
//! and the domain set are needed, the pending lock is always taken first.

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::monitoring::scheduler::JobTag;

/// Current check and report periods, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub check_seconds: u64,
    pub report_seconds: u64,
}

/// Armed two-step removal: the list the operator was shown
#[derive(Debug, Clone)]
struct PendingRemoval {
    snapshot: Vec<String>,
}

/// Why a removal reply did not remove anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalError {
    /// No removal is armed
    NotPending,
    /// Not a number, or outside the list. Removal stays armed.
    InvalidSelection,
    /// The chosen entry no longer matches the live set. Removal stays armed
    /// with the fresh list carried here.
    Changed(Vec<String>),
    /// The set was emptied meanwhile. Removal is disarmed.
    NothingLeft,
}

/// Single authority for the monitored set, the intervals and the pending
/// removal
#[derive(Debug)]
pub struct ConfigStore {
    domains: RwLock<Vec<String>>,
    intervals: RwLock<Intervals>,
    pending: Mutex<Option<PendingRemoval>>,
}

impl ConfigStore {
    /// Create a store. Duplicate and blank domains are dropped, first
    /// occurrence wins.
    pub fn new(domains: impl IntoIterator<Item = String>, intervals: Intervals) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for domain in domains {
            let domain = domain.trim().to_string();
            if !domain.is_empty() && !unique.contains(&domain) {
                unique.push(domain);
            }
        }

        Self {
            domains: RwLock::new(unique),
            intervals: RwLock::new(intervals),
            pending: Mutex::new(None),
        }
    }

    /// Snapshot of the monitored set in its stable enumeration order
    pub async fn domains(&self) -> Vec<String> {
        self.domains.read().await.clone()
    }

    /// Insert a domain. Returns false when it was already monitored.
    pub async fn add_domain(&self, domain: &str) -> bool {
        let mut domains = self.domains.write().await;
        if domains.iter().any(|d| d == domain) {
            debug!(domain, "Domain already monitored");
            return false;
        }
        domains.push(domain.to_string());
        info!(domain, total = domains.len(), "Domain added");
        true
    }

    pub async fn intervals(&self) -> Intervals {
        *self.intervals.read().await
    }

    pub async fn set_interval(&self, tag: JobTag, seconds: u64) {
        let mut intervals = self.intervals.write().await;
        match tag {
            JobTag::Check => intervals.check_seconds = seconds,
            JobTag::Report => intervals.report_seconds = seconds,
        }
        info!(%tag, seconds, "Interval updated");
    }

    /// Arm a removal and return the enumeration the operator will pick from.
    /// Returns `None` when there is nothing to remove.
    pub async fn begin_removal(&self) -> Option<Vec<String>> {
        let mut pending = self.pending.lock().await;
        let domains = self.domains.read().await;
        if domains.is_empty() {
            return None;
        }

        let snapshot = domains.clone();
        *pending = Some(PendingRemoval { snapshot: snapshot.clone() });
        debug!(count = snapshot.len(), "Removal armed");
        Some(snapshot)
    }

    pub async fn is_removal_pending(&self) -> bool {
        self.pending.lock().await.is_some()
    }

    /// Disarm a pending removal. Returns false when none was armed.
    pub async fn cancel_removal(&self) -> bool {
        self.pending.lock().await.take().is_some()
    }

    /// Resolve an armed removal with the operator's 1-based reply.
    ///
    /// The index is checked against the live set: the entry at that position
    /// must still be the one the operator was shown.
    pub async fn resolve_removal(&self, reply: &str) -> Result<String, RemovalError> {
        let mut pending = self.pending.lock().await;
        let Some(armed) = pending.as_mut() else {
            return Err(RemovalError::NotPending);
        };

        let mut domains = self.domains.write().await;
        if domains.is_empty() {
            *pending = None;
            return Err(RemovalError::NothingLeft);
        }

        let index = match reply.trim().parse::<usize>() {
            Ok(n) if (1..=armed.snapshot.len()).contains(&n) => n - 1,
            _ => return Err(RemovalError::InvalidSelection),
        };

        let shown = &armed.snapshot[index];
        if domains.get(index) != Some(shown) {
            debug!(index, shown = %shown, "Domain set changed since removal was armed");
            armed.snapshot = domains.clone();
            return Err(RemovalError::Changed(armed.snapshot.clone()));
        }

        let removed = domains.remove(index);
        *pending = None;
        info!(domain = %removed, remaining = domains.len(), "Domain removed");
        Ok(removed)
    }
}
