//! Outer runner: per-engine execution, retries, screenshots, recording.
//!
//! The runner is the only component that knows about reruns and failure
//! artifacts. It executes the journey up to `1 + retry_attempts` times,
//! captures a screenshot when the final attempt still fails, and hands
//! exactly one outcome per run to the configured sink. Sink failures are
//! logged and swallowed.

use crate::config::SuiteConfig;
use crate::report::{LogSink, ResultSink, TestOutcome};
use crate::scenario::CareerJourney;
use crate::session::Session;
use std::time::Instant;
use tracing::{info, warn};

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Engine-parameterized scenario runner.
pub struct Runner {
    config: SuiteConfig,
    sink: Box<dyn ResultSink>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Create a runner that records outcomes to the log
    #[must_use]
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config,
            sink: Box::new(LogSink),
        }
    }

    /// Replace the result sink
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The configuration in force
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run the journey against an existing session, with reruns on
    /// failure, and record the outcome. Never panics; the outcome carries
    /// the verdict.
    pub async fn run_scenario(&self, session: &Session, engine_label: &str) -> TestOutcome {
        let test_name = format!("career_journey[{engine_label}]");
        let started = Instant::now();
        let attempts = self.config.retry_attempts + 1;

        let mut last_error: Option<String> = None;
        for attempt in 1..=attempts {
            match CareerJourney::new(session, &self.config).run().await {
                Ok(()) => {
                    last_error = None;
                    break;
                }
                Err(err) => {
                    warn!(attempt, attempts, %err, "journey attempt failed");
                    last_error = Some(err.to_string());
                }
            }
        }

        let duration = started.elapsed();
        let outcome = if let Some(reason) = last_error {
            warn!(test = %test_name, %reason, "test failed");
            self.capture_failure_screenshot(session, &test_name).await;
            TestOutcome::failed(&test_name, duration)
        } else {
            info!(test = %test_name, "test passed");
            TestOutcome::passed(&test_name, duration)
        };
        self.record(&outcome).await;
        outcome
    }

    async fn record(&self, outcome: &TestOutcome) {
        if let Err(err) = self.sink.record(outcome).await {
            warn!(%err, "could not record test outcome");
        }
    }

    async fn capture_failure_screenshot(&self, session: &Session, test_name: &str) {
        if let Err(err) = self.try_capture_screenshot(session, test_name).await {
            warn!(%err, "could not capture failure screenshot");
        }
    }

    async fn try_capture_screenshot(
        &self,
        session: &Session,
        test_name: &str,
    ) -> crate::result::CarreraResult<()> {
        let Some(png) = session.screenshot().await else {
            return Ok(());
        };
        tokio::fs::create_dir_all(&self.config.screenshots_dir).await?;
        let path = self.config.screenshots_dir.join(format!("{test_name}.png"));
        tokio::fs::write(&path, &png).await?;
        info!(path = %path.display(), "screenshot captured");
        Ok(())
    }

    /// Launch a browser per engine and run the journey in each, as
    /// independent isolated sessions. Engines without a CDP driver are
    /// skipped with a logged reason.
    #[cfg(feature = "browser")]
    pub async fn run_all(
        &self,
        engines: &[crate::config::BrowserEngine],
    ) -> Vec<TestOutcome> {
        use crate::driver::CdpDriver;
        use crate::wait::WaitPolicy;

        let mut outcomes = Vec::new();
        for &engine in engines {
            if !engine.speaks_cdp() {
                warn!(%engine, "no CDP driver for engine, skipping");
                continue;
            }
            let driver = match CdpDriver::launch(&self.config, engine).await {
                Ok(driver) => driver,
                Err(err) => {
                    warn!(%engine, %err, "browser launch failed");
                    let outcome = TestOutcome::failed(
                        format!("career_journey[{engine}]"),
                        std::time::Duration::ZERO,
                    );
                    self.record(&outcome).await;
                    outcomes.push(outcome);
                    continue;
                }
            };
            let session = Session::new(
                Box::new(driver),
                WaitPolicy::new().with_timeout(self.config.default_timeout_ms),
            );
            let outcome = self.run_scenario(&session, engine.as_str()).await;
            session.close().await;
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::report::TestStatus;
    use crate::result::CarreraResult;
    use crate::wait::WaitPolicy;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct CapturingSink {
        records: Arc<Mutex<Vec<TestOutcome>>>,
    }

    #[async_trait]
    impl ResultSink for CapturingSink {
        async fn record(&self, outcome: &TestOutcome) -> CarreraResult<()> {
            self.records.lock().unwrap().push(outcome.clone());
            Ok(())
        }
    }

    fn fast_session(mock: &MockDriver) -> Session {
        Session::new(
            Box::new(mock.clone()),
            WaitPolicy::new().with_timeout(50).with_poll_interval(10),
        )
    }

    #[tokio::test]
    async fn test_failed_journey_records_failure_and_screenshot() {
        let screenshots = tempfile::tempdir().unwrap();
        let config = SuiteConfig::default()
            .with_retry_attempts(0)
            .with_pause(1)
            .with_settle(1)
            .with_screenshots_dir(screenshots.path());
        let sink = CapturingSink::default();
        let runner = Runner::new(config).with_sink(Box::new(sink.clone()));

        // blank mock page: the home accessibility gate fails immediately
        let mock = MockDriver::new();
        let session = fast_session(&mock);
        let outcome = runner.run_scenario(&session, "chrome").await;

        assert_eq!(outcome.status, TestStatus::Failed);
        assert_eq!(outcome.test_name, "career_journey[chrome]");
        assert!(screenshots
            .path()
            .join("career_journey[chrome].png")
            .exists());

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, TestStatus::Failed);
    }

    #[tokio::test]
    async fn test_runner_reruns_failed_journeys() {
        let screenshots = tempfile::tempdir().unwrap();
        let config = SuiteConfig::default()
            .with_retry_attempts(2)
            .with_pause(1)
            .with_settle(1)
            .with_screenshots_dir(screenshots.path());
        let sink = CapturingSink::default();
        let runner = Runner::new(config).with_sink(Box::new(sink.clone()));

        let mock = MockDriver::new();
        let session = fast_session(&mock);
        let _outcome = runner.run_scenario(&session, "chrome").await;

        // three navigations: the initial attempt plus two reruns
        let navigations = mock
            .journal()
            .iter()
            .filter(|event| matches!(event, crate::mock::MockEvent::Navigated(_)))
            .count();
        assert_eq!(navigations, 3);
    }
}
