use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the wizard core, definitions, and configuration.
///
/// Validation failures are never reported through this type; they are
/// ordinary [`ValidationOutcome`](crate::validation::ValidationOutcome)
/// values.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Unknown validation rule: {0}")]
    UnknownRule(String),
    #[error("Unknown callback: {0}")]
    UnknownCallback(String),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Unknown panel: {0}")]
    UnknownPanel(usize),
    #[error("Duplicate field id: {0}")]
    DuplicateField(String),
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl WizardError {
    /// Configuration errors are programmer mistakes in a definition; the
    /// wizard degrades around them instead of refusing to start.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WizardError::UnknownRule(_) | WizardError::UnknownCallback(_)
        )
    }
}

pub type Result<T> = StdResult<T, WizardError>;

/// Errors surfaced by the interactive shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WizardError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
