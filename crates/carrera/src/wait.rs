//! Wait discipline: bounded polling policies and their outcomes.
//!
//! Every wait in the suite is deadline-bounded; there is no unbounded polling.
//! Conditions are data, not closures, so they can be logged, compared, and
//! replayed against the mock driver in tests.
//!
//! Jidoka: a wait that cannot succeed stops at its deadline and says so,
//! instead of letting the scenario drift.

use crate::locator::Locator;
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (15 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT POLICY
// =============================================================================

/// A bounded polling policy: timeout plus poll interval.
///
/// Stateless aside from the deadline computed at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitPolicy {
    /// Create a new policy with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Outcome of a bounded wait.
///
/// Primitives never raise past this boundary: callers receive `NotFound` or
/// `TimedOut` as first-class outcomes and decide fatality themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The condition was satisfied; carries the satisfying value
    Found(T),
    /// Definitive absence before the deadline (nothing to wait on)
    NotFound,
    /// The deadline elapsed while the condition kept failing
    TimedOut,
}

impl<T> WaitOutcome<T> {
    /// True if the condition was satisfied
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// True if the deadline elapsed
    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// Convert to an Option, discarding the failure distinction
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::TimedOut => None,
        }
    }

    /// Borrow the satisfying value, if any
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound | Self::TimedOut => None,
        }
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Predicates a wait can poll for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// At least one element matches the locator
    Present(Locator),
    /// The first match is visible and enabled
    Clickable(Locator),
    /// No match is visible (absent counts as invisible)
    Invisible(Locator),
    /// The first match's trimmed text equals the expected string
    TextEquals {
        /// Element to read
        locator: Locator,
        /// Expected trimmed text
        expected: String,
    },
    /// More than `min` elements match the locator
    CountAbove {
        /// Elements to count
        locator: Locator,
        /// Exclusive lower bound
        min: usize,
    },
    /// document.readyState is "complete"
    DocumentReady,
}

impl Condition {
    /// Human-readable description for log lines
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Present(locator) => format!("presence of {locator}"),
            Self::Clickable(locator) => format!("clickability of {locator}"),
            Self::Invisible(locator) => format!("invisibility of {locator}"),
            Self::TextEquals { locator, expected } => {
                format!("text of {locator} to equal '{expected}'")
            }
            Self::CountAbove { locator, min } => {
                format!("more than {min} matches of {locator}")
            }
            Self::DocumentReady => "document ready state".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod wait_policy_tests {
        use super::*;

        #[test]
        fn test_default_policy() {
            let policy = WaitPolicy::default();
            assert_eq!(policy.timeout_ms, DEFAULT_TIMEOUT_MS);
            assert_eq!(policy.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_builder_chain() {
            let policy = WaitPolicy::new().with_timeout(5000).with_poll_interval(50);
            assert_eq!(policy.timeout(), Duration::from_millis(5000));
            assert_eq!(policy.poll_interval(), Duration::from_millis(50));
        }
    }

    mod wait_outcome_tests {
        use super::*;

        #[test]
        fn test_found_accessors() {
            let outcome = WaitOutcome::Found(42);
            assert!(outcome.is_found());
            assert!(!outcome.is_timed_out());
            assert_eq!(outcome.value(), Some(&42));
            assert_eq!(outcome.into_option(), Some(42));
        }

        #[test]
        fn test_not_found_is_falsy() {
            let outcome: WaitOutcome<String> = WaitOutcome::NotFound;
            assert!(!outcome.is_found());
            assert_eq!(outcome.into_option(), None);
        }

        #[test]
        fn test_timed_out_is_distinct_from_not_found() {
            let timed_out: WaitOutcome<()> = WaitOutcome::TimedOut;
            let not_found: WaitOutcome<()> = WaitOutcome::NotFound;
            assert!(timed_out.is_timed_out());
            assert!(!not_found.is_timed_out());
            assert_ne!(timed_out, not_found);
        }
    }

    mod condition_tests {
        use super::*;
        use crate::locator::Locator;

        #[test]
        fn test_descriptions_name_the_locator() {
            let locator = Locator::xpath("//a[contains(text(), 'View Role')]");
            let desc = Condition::Present(locator.clone()).description();
            assert!(desc.contains("View Role"));

            let desc = Condition::TextEquals {
                locator,
                expected: "Quality Assurance".to_string(),
            }
            .description();
            assert!(desc.contains("Quality Assurance"));
        }

        #[test]
        fn test_document_ready_description() {
            assert_eq!(Condition::DocumentReady.description(), "document ready state");
        }
    }
}
