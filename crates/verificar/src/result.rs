//! Result and error types for Verificar.

use thiserror::Error;

/// Result type for Verificar operations
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors that can occur while verifying a page
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error. Fatal: there is no session to tear down
    #[error("Failed to launch browser: {message}")]
    Launch {
        /// Error message
        message: String,
    },

    /// Page-level error (evaluation failed, page gone, session closed)
    #[error("Page error: {message}")]
    Page {
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

    /// A step failed: element missing, not interactable within its timeout,
    /// or navigation did not complete
    #[error("Step {step} failed: {message}")]
    Interaction {
        /// Description of the step that failed
        step: String,
        /// Underlying cause
        message: String,
    },

    /// A check's condition was never observed before its timeout
    #[error("Check {assertion} not satisfied within {timeout_ms}ms")]
    AssertionTimeout {
        /// Description of the check
        assertion: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// Artifact capture/write failure; logged, never flips a passed outcome
    #[error("Artifact capture failed: {message}")]
    Artifact {
        /// Error message
        message: String,
    },

    /// Scenario definition could not be parsed
    #[error("Scenario parse error: {message}")]
    ScenarioParse {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl VerifyError {
    /// Create a launch error
    #[must_use]
    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Create an artifact error
    #[must_use]
    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }

    /// Create an interaction error for a step
    #[must_use]
    pub fn interaction(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Interaction {
            step: step.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_display() {
        let err = VerifyError::launch("chromium exited early");
        assert!(err.to_string().contains("launch"));
        assert!(err.to_string().contains("chromium exited early"));
    }

    #[test]
    fn test_interaction_error_carries_step() {
        let err = VerifyError::interaction("click:text=Tech Shaman", "no element matched");
        let msg = err.to_string();
        assert!(msg.contains("click:text=Tech Shaman"));
        assert!(msg.contains("no element matched"));
    }

    #[test]
    fn test_assertion_timeout_display() {
        let err = VerifyError::AssertionTimeout {
            assertion: "visible:canvas".to_string(),
            timeout_ms: 30_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("visible:canvas"));
        assert!(msg.contains("30000ms"));
    }

    #[test]
    fn test_artifact_error_display() {
        let err = VerifyError::artifact("permission denied: /proc/nope.png");
        assert!(err.to_string().contains("Artifact capture failed"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VerifyError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
