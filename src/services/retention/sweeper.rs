use super::schedule::{next_run_after, retention_cutoff};
use crate::config::RetentionConfig;
use crate::storage::StorageBackend;
use crate::utils::error::Result;
use crate::utils::time::{format_in, parse_time_of_day, parse_timezone};
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    /// Waiting for the next scheduled run
    Idle,
    /// Deleting expired rows
    Running,
}

/// Daily deletion of resolved alerts past their retention period
pub struct RetentionSweeper {
    storage: Arc<dyn StorageBackend>,
    retention_days: u32,
    cleanup_time: NaiveTime,
    timezone: Tz,
    error_backoff: Duration,
    state: RwLock<SweeperState>,
    last_run: RwLock<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for RetentionSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetentionSweeper")
            .field("retention_days", &self.retention_days)
            .field("cleanup_time", &self.cleanup_time)
            .field("timezone", &self.timezone)
            .field("state", &self.state())
            .finish()
    }
}

impl RetentionSweeper {
    pub fn new(storage: Arc<dyn StorageBackend>, config: &RetentionConfig) -> Result<Self> {
        Ok(Self {
            storage,
            retention_days: config.retention_days,
            cleanup_time: parse_time_of_day(&config.cleanup_time)?,
            timezone: parse_timezone(&config.timezone)?,
            error_backoff: Duration::from_secs(config.error_backoff_seconds),
            state: RwLock::new(SweeperState::Idle),
            last_run: RwLock::new(None),
        })
    }

    pub fn state(&self) -> SweeperState {
        *self.state.read()
    }

    /// Completion time of the last successful run
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        *self.last_run.read()
    }

    /// Next scheduled run strictly after `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        next_run_after(now, self.cleanup_time, self.timezone)
    }

    /// Delete expired rows now. Returns the number deleted.
    pub async fn run_once(&self) -> Result<u64> {
        let now = Utc::now();
        let cutoff = retention_cutoff(now, self.retention_days);
        match cutoff {
            Some(cutoff) => info!(
                "Retention run: deleting alerts resolved before {}",
                format_in(cutoff, self.timezone)
            ),
            None => info!("Retention run: retention is 0 days, deleting all resolved alerts"),
        }

        *self.state.write() = SweeperState::Running;
        let result = self.storage.delete_expired(cutoff).await;
        *self.state.write() = SweeperState::Idle;

        let deleted = result?;
        *self.last_run.write() = Some(Utc::now());
        info!("Retention run finished, {} alerts deleted", deleted);
        Ok(deleted)
    }

    /// Run on schedule until `token` is cancelled
    pub fn spawn(self: Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(token).await })
    }

    async fn run(&self, token: CancellationToken) {
        info!(
            "Retention sweeper started: keep {} days, daily at {} {}",
            self.retention_days,
            self.cleanup_time.format("%H:%M"),
            self.timezone
        );

        let mut after = Utc::now();
        loop {
            let next = self.next_run_after(after);
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            info!(
                "Next retention run at {} ({:?} from now)",
                format_in(next, self.timezone),
                wait
            );

            tokio::select! {
                () = token.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }

            // A started run completes even if cancellation arrives meanwhile
            if let Err(e) = self.run_once().await {
                error!(
                    "Retention run failed: {}; retrying after {:?}",
                    e, self.error_backoff
                );
                tokio::select! {
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(self.error_backoff) => {}
                }
            }

            if token.is_cancelled() {
                break;
            }
            after = next.max(Utc::now());
            debug!("Retention sweeper idle");
        }

        info!("Retention sweeper stopped");
    }
}
