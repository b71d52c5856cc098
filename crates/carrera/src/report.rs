//! Test outcomes and the result sink.
//!
//! The suite produces one `(test_name, status, duration, timestamp)`
//! record per run and hands it to a [`ResultSink`]. Sink write failures
//! are never fatal: the runner logs and swallows them.

use crate::config::DbConfig;
use crate::result::{CarreraError, CarreraResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Terminal status of a test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Every gate held
    Passed,
    /// A gate failed or the run errored
    Failed,
}

impl TestStatus {
    /// Status string as stored in the results table
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Check if the run passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded run of one test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test identifier, e.g. `career_journey[chrome]`
    pub test_name: String,
    /// Pass/fail status
    pub status: TestStatus,
    /// Wall-clock duration in seconds
    pub duration_secs: f64,
    /// UTC completion time
    pub timestamp: DateTime<Utc>,
    /// Unique identifier of this run
    pub run_id: Uuid,
}

impl TestOutcome {
    /// Record a passing run
    #[must_use]
    pub fn passed(test_name: impl Into<String>, duration: Duration) -> Self {
        Self::record(test_name, TestStatus::Passed, duration)
    }

    /// Record a failing run
    #[must_use]
    pub fn failed(test_name: impl Into<String>, duration: Duration) -> Self {
        Self::record(test_name, TestStatus::Failed, duration)
    }

    fn record(test_name: impl Into<String>, status: TestStatus, duration: Duration) -> Self {
        Self {
            test_name: test_name.into(),
            status,
            duration_secs: duration.as_secs_f64(),
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
        }
    }
}

/// Destination for outcome records.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist one outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CarreraError::SinkWrite`] when the record could not be
    /// stored; callers treat this as non-fatal.
    async fn record(&self, outcome: &TestOutcome) -> CarreraResult<()>;
}

/// Sink that only emits a structured log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl ResultSink for LogSink {
    async fn record(&self, outcome: &TestOutcome) -> CarreraResult<()> {
        info!(
            test = %outcome.test_name,
            status = %outcome.status,
            duration_secs = outcome.duration_secs,
            "test outcome"
        );
        Ok(())
    }
}

/// Sink writing into a MySQL results table inside a Docker container.
///
/// Shells `docker exec <container> mysql … -e "INSERT …"` rather than
/// speaking the wire protocol; the database and table are assumed to
/// exist in the environment.
#[derive(Debug, Clone)]
pub struct MySqlContainerSink {
    db: DbConfig,
}

impl MySqlContainerSink {
    /// Create a sink for the given database coordinates
    #[must_use]
    pub const fn new(db: DbConfig) -> Self {
        Self { db }
    }

    /// The INSERT statement for one outcome, with string fields escaped
    #[must_use]
    pub fn insert_statement(&self, outcome: &TestOutcome) -> String {
        let safe_name = outcome.test_name.replace('\'', "''");
        let safe_status = outcome.status.as_str().replace('\'', "''");
        let formatted_timestamp = outcome.timestamp.format("%Y-%m-%d %H:%M:%S");
        format!(
            "INSERT INTO {} (test_name, status, duration, timestamp) VALUES ('{}', '{}', {}, '{}');",
            self.db.table, safe_name, safe_status, outcome.duration_secs, formatted_timestamp
        )
    }
}

#[async_trait]
impl ResultSink for MySqlContainerSink {
    async fn record(&self, outcome: &TestOutcome) -> CarreraResult<()> {
        let statement = self.insert_statement(outcome);
        let output = tokio::process::Command::new("docker")
            .args([
                "exec",
                &self.db.container,
                "mysql",
                "-u",
                &self.db.user,
                &format!("-p{}", self.db.password),
                &self.db.database,
                "-e",
                &statement,
            ])
            .output()
            .await
            .map_err(|e| CarreraError::SinkWrite {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(CarreraError::SinkWrite {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(
            test = %outcome.test_name,
            status = %outcome.status,
            duration_secs = outcome.duration_secs,
            "test result saved to results database"
        );
        Ok(())
    }
}
