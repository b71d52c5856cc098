//! Suite configuration: URLs, timeouts, retry policy, engine profiles.
//!
//! All values here are read-only inputs to the core. The per-engine
//! launch-arg table is injected at session construction; nothing in the
//! suite mutates configuration at runtime.

use std::path::PathBuf;
use std::time::Duration;

/// Site under test
pub const BASE_URL: &str = "https://useinsider.com";

/// Default wait timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default retry attempts for flaky steps and reruns
pub const RETRY_ATTEMPTS: u32 = 3;

/// Browser engines the runner can parameterize over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserEngine {
    /// Chromium-family engine, driven over CDP
    Chrome,
    /// Gecko engine; profile kept for the outer runner's parameterization
    Firefox,
}

impl BrowserEngine {
    /// Engine name as used in test identifiers
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }

    /// Launch arguments for this engine
    #[must_use]
    pub const fn launch_args(&self) -> &'static [&'static str] {
        match self {
            Self::Chrome => &[
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
            ],
            Self::Firefox => &[],
        }
    }

    /// Whether the bundled CDP driver can launch this engine
    #[must_use]
    pub const fn speaks_cdp(&self) -> bool {
        matches!(self, Self::Chrome)
    }
}

impl std::fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coordinates of the MySQL results container.
///
/// The sink shells into the container; the schema itself is owned by the
/// environment, not the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Docker container name
    pub container: String,
    /// MySQL user
    pub user: String,
    /// MySQL password
    pub password: String,
    /// Database name
    pub database: String,
    /// Results table name
    pub table: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            container: "mysql-qa".to_string(),
            user: "root".to_string(),
            // Default password when using the MySQL Docker container
            password: "123qwe123".to_string(),
            database: "test_results".to_string(),
            table: "ui_test_results".to_string(),
        }
    }
}

/// Configuration for a suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Base URL of the site under test
    pub base_url: String,
    /// Default wait timeout in milliseconds
    pub default_timeout_ms: u64,
    /// Retry attempts for flaky steps and scenario reruns
    pub retry_attempts: u32,
    /// Backoff between department-filter confirmation attempts
    pub retry_backoff_ms: u64,
    /// Short pause between scroll/click repetitions
    pub pause_ms: u64,
    /// Settle time after cross-page navigation
    pub settle_ms: u64,
    /// Run the browser headless
    pub headless: bool,
    /// Directory for failure screenshots
    pub screenshots_dir: PathBuf,
    /// Result-sink database coordinates
    pub db: DbConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_SECS * 1000,
            retry_attempts: RETRY_ATTEMPTS,
            retry_backoff_ms: 2000,
            pause_ms: 1000,
            settle_ms: 2000,
            headless: true,
            screenshots_dir: PathBuf::from("screenshots"),
            db: DbConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Careers page URL derived from the base URL
    #[must_use]
    pub fn careers_url(&self) -> String {
        format!("{}/careers", self.base_url)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default wait timeout
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    /// Set the retry attempt count
    #[must_use]
    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Set the confirmation-retry backoff
    #[must_use]
    pub const fn with_retry_backoff(mut self, backoff_ms: u64) -> Self {
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Set the short pause used between scroll/click repetitions
    #[must_use]
    pub const fn with_pause(mut self, pause_ms: u64) -> Self {
        self.pause_ms = pause_ms;
        self
    }

    /// Set the post-navigation settle time
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the failure-screenshot directory
    #[must_use]
    pub fn with_screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = dir.into();
        self
    }

    /// Set the database coordinates
    #[must_use]
    pub fn with_db(mut self, db: DbConfig) -> Self {
        self.db = db;
        self
    }

    /// Default timeout as a Duration
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Short pause as a Duration
    #[must_use]
    pub const fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Settle time as a Duration
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Retry backoff as a Duration
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
