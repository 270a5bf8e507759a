//! Periodic deprecation summaries.
//!
//! Collects per-identifier summaries from the occurrence table and hands them
//! to a callback, either on demand or from a background tokio task.

use crate::application::{ports::Storage, registry::OccurrenceRegistry};
use crate::domain::{occurrence::OccurrenceState, summary::DeprecationSummary};
use std::time::Duration;

#[cfg(feature = "async")]
use tokio::{sync::watch, task::JoinHandle, time::interval};

/// Error returned when reporter configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterConfigError {
    /// Report interval duration must be greater than zero
    ZeroInterval,
}

impl std::fmt::Display for ReporterConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReporterConfigError::ZeroInterval => {
                write!(f, "report interval must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ReporterConfigError {}

/// Error returned when the background reporter fails to stop cleanly.
#[derive(Debug)]
pub enum ShutdownError {
    /// The reporter task panicked
    TaskPanicked,
    /// The reporter task was cancelled before it could finish
    TaskCancelled,
}

impl std::fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownError::TaskPanicked => write!(f, "reporter task panicked"),
            ShutdownError::TaskCancelled => write!(f, "reporter task was cancelled"),
        }
    }
}

impl std::error::Error for ShutdownError {}

/// Configuration for summary reporting.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// How often to report
    pub interval: Duration,
    /// Minimum occurrence count to include in a report
    pub min_count: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            min_count: 1,
        }
    }
}

impl ReporterConfig {
    /// Create a reporter config with the specified interval.
    ///
    /// # Errors
    /// Returns `ReporterConfigError::ZeroInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, ReporterConfigError> {
        if interval.is_zero() {
            return Err(ReporterConfigError::ZeroInterval);
        }
        Ok(Self {
            interval,
            min_count: 1,
        })
    }

    /// Set the minimum occurrence count threshold.
    pub fn with_min_count(mut self, min_count: u64) -> Self {
        self.min_count = min_count;
        self
    }
}

/// Reports summaries of triggered deprecations.
pub struct SummaryReporter<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    registry: OccurrenceRegistry<S>,
    config: ReporterConfig,
}

impl<S> SummaryReporter<S>
where
    S: Storage<String, OccurrenceState> + Clone,
{
    /// Create a new summary reporter.
    pub fn new(registry: OccurrenceRegistry<S>, config: ReporterConfig) -> Self {
        Self { registry, config }
    }

    /// Collect summaries for identifiers triggered at least `min_count` times,
    /// most frequent first.
    pub fn collect_summaries(&self) -> Vec<DeprecationSummary> {
        self.registry.summaries(self.config.min_count)
    }

    /// Start reporting periodically on a background task.
    ///
    /// The task runs until [`ReporterHandle::shutdown`] is called. Dropping
    /// the handle leaves it running. With `report_on_shutdown` set, one last
    /// report is delivered while shutting down.
    #[cfg(feature = "async")]
    pub fn start<F>(self, mut emit_fn: F, report_on_shutdown: bool) -> ReporterHandle
    where
        F: FnMut(Vec<DeprecationSummary>) + Send + 'static,
        S: Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.config.interval);
            // The first tick completes immediately
            ticker.tick().await;
            let mut detached = false;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let summaries = self.collect_summaries();
                        if !summaries.is_empty() {
                            emit_fn(summaries);
                        }
                    }
                    changed = shutdown_rx.changed(), if !detached => {
                        // Handle dropped without shutdown, keep reporting
                        if changed.is_err() {
                            detached = true;
                            continue;
                        }
                        if report_on_shutdown {
                            let summaries = self.collect_summaries();
                            if !summaries.is_empty() {
                                emit_fn(summaries);
                            }
                        }
                        tracing::debug!(target: "tracing_deprecations", "summary reporter stopped");
                        break;
                    }
                }
            }
        });

        ReporterHandle { shutdown_tx, task }
    }
}

/// Handle to a running background reporter.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct ReporterHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

#[cfg(feature = "async")]
impl ReporterHandle {
    /// Whether the background task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the background task and wait for it to finish.
    ///
    /// # Errors
    /// Returns `ShutdownError` if the task panicked or was cancelled.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        // The receiver is gone if the task already exited
        let _ = self.shutdown_tx.send(true);

        match self.task.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_panic() => Err(ShutdownError::TaskPanicked),
            Err(_) => Err(ShutdownError::TaskCancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::storage::ShardedStorage;
    use std::sync::Arc;

    fn registry() -> OccurrenceRegistry<Arc<ShardedStorage<String, OccurrenceState>>> {
        OccurrenceRegistry::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()))
    }

    fn trigger(
        registry: &OccurrenceRegistry<Arc<ShardedStorage<String, OccurrenceState>>>,
        identifier: &str,
        times: usize,
    ) {
        for _ in 0..times {
            registry.with_state(identifier, |state, now| {
                state.register_trigger("acme", now);
            });
        }
    }

    #[test]
    fn test_collect_summaries_empty() {
        let reporter = SummaryReporter::new(registry(), ReporterConfig::default());
        assert!(reporter.collect_summaries().is_empty());
    }

    #[test]
    fn test_collect_summaries_ordering() {
        let registry = registry();
        trigger(&registry, "A", 1);
        trigger(&registry, "B", 3);
        trigger(&registry, "C", 2);

        let reporter = SummaryReporter::new(registry, ReporterConfig::default());
        let order: Vec<_> = reporter
            .collect_summaries()
            .into_iter()
            .map(|s| (s.identifier, s.count))
            .collect();

        assert_eq!(
            order,
            vec![
                ("B".to_string(), 3),
                ("C".to_string(), 2),
                ("A".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_min_count_filtering() {
        let registry = registry();
        trigger(&registry, "rare", 2);
        trigger(&registry, "hot", 12);

        let config = ReporterConfig::default().with_min_count(10);
        let reporter = SummaryReporter::new(registry, config);
        let summaries = reporter.collect_summaries();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].identifier, "hot");
        assert_eq!(summaries[0].count, 12);
    }

    #[test]
    fn test_seeded_identifiers_not_reported() {
        let registry = registry();
        registry.with_state("quiet", |state, _| state.seed());

        let reporter = SummaryReporter::new(registry, ReporterConfig::default());
        assert!(reporter.collect_summaries().is_empty());
    }

    #[test]
    fn test_reporter_config_zero_interval() {
        let result = ReporterConfig::new(Duration::from_secs(0));
        assert!(matches!(result, Err(ReporterConfigError::ZeroInterval)));
    }

    #[test]
    fn test_reporter_config_valid_interval() {
        let config = ReporterConfig::new(Duration::from_secs(30)).unwrap();
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.min_count, 1);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_reporting() {
        use std::sync::Mutex;

        let registry = registry();
        trigger(&registry, "A", 1);

        let config = ReporterConfig::new(Duration::from_millis(50)).unwrap();
        let reporter = SummaryReporter::new(registry, config);

        let reports = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);

        let handle = reporter.start(
            move |summaries| {
                reports_clone.lock().unwrap().push(summaries.len());
            },
            false,
        );

        tokio::time::sleep(Duration::from_millis(180)).await;
        assert!(handle.is_running());
        handle.shutdown().await.expect("shutdown failed");

        let reports = reports.lock().unwrap();
        assert!(reports.len() >= 2);
        assert!(reports.iter().all(|&n| n == 1));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_final_report_on_shutdown() {
        use std::sync::Mutex;

        let registry = registry();
        let config = ReporterConfig::new(Duration::from_secs(3600)).unwrap();
        let reporter = SummaryReporter::new(registry.clone(), config);

        let reports = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = Arc::clone(&reports);
        let handle = reporter.start(
            move |summaries| {
                reports_clone.lock().unwrap().extend(summaries);
            },
            true,
        );

        trigger(&registry, "late", 4);
        handle.shutdown().await.expect("shutdown failed");

        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].identifier, "late");
        assert_eq!(reports[0].count, 4);
    }

    #[test]
    fn test_shutdown_error_display() {
        assert_eq!(
            ShutdownError::TaskPanicked.to_string(),
            "reporter task panicked"
        );
    }
}
