//! Error types for the rules core.

/// Errors that can occur during rules operations.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A dice notation string could not be parsed.
    #[error("invalid dice notation '{notation}': {reason}")]
    InvalidNotation {
        /// The notation as supplied by the caller.
        notation: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An action type string does not name a known action.
    #[error("unknown action type: {0}")]
    UnknownAction(String),

    /// A difficulty label does not name a known difficulty.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A weighted table failed validation.
    #[error("invalid table '{table}': {reason}")]
    InvalidTable {
        /// Name of the offending table.
        table: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A modifier source with the same name is already registered.
    #[error("modifier source '{0}' is already registered")]
    DuplicateSource(String),

    /// An engine configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A data or configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Data or configuration JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
