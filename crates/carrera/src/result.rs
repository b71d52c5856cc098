//! Result and error types for Carrera.

use thiserror::Error;

/// Result type for Carrera operations
pub type CarreraResult<T> = Result<T, CarreraError>;

/// Errors that can occur in Carrera
#[derive(Debug, Error)]
pub enum CarreraError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Element absent within the wait deadline
    #[error("Element not found: {locator}")]
    NotFound {
        /// Locator description
        locator: String,
    },

    /// Element present but a native click could not be delivered
    #[error("Element not interactable: {locator}")]
    NotInteractable {
        /// Locator description
        locator: String,
    },

    /// Expected confirmation never appeared; flow continues without it
    #[error("Stale state: {message}")]
    StaleState {
        /// Error message
        message: String,
    },

    /// Window/tab switching error
    #[error("Window switch failed: {message}")]
    WindowSwitch {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A scenario gate failed. The only fatal boundary in the suite
    #[error("Step '{step}' failed: {reason}")]
    StepFailed {
        /// Journey step that failed
        step: String,
        /// Why the gate did not hold
        reason: String,
    },

    /// Result sink write error (callers log and swallow this)
    #[error("Result sink write failed: {message}")]
    SinkWrite {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
