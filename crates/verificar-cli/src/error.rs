//! Error types for the CLI.

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// No scenario with the requested name exists
    #[error("Unknown scenario: {name}. Use `verificador list` to see what is available")]
    UnknownScenario {
        /// Requested scenario name
        name: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (suite report serialization)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Verificar library error
    #[error("Verificar error: {0}")]
    Verify(#[from] verificar::VerifyError),
}
