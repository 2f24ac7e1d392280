//! Error types for declaration, registration and dispatch.
//!
//! Declaration and registration errors surface at setup time and are never
//! caught internally. User input problems are not errors: they are reported
//! as [`UsageError`] values through the printer and returned as an outcome.

use thiserror::Error;

use crate::validate::ValidationError;

/// Boxed error returned by command callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the library.
#[derive(Debug, Error)]
pub enum WendellError {
    /// An option was declared without a non-empty name.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A command was executed by name but is not registered.
    #[error("Command '{name}' not found. Registered commands: {}", .registered.join(", "))]
    UnknownCommand {
        name: String,
        registered: Vec<String>,
    },

    /// Dispatch ended on a command with neither a matching child nor a
    /// callback. This is a mis-declared tree, not bad user input.
    #[error("command '{command}' has no callback and no matching sub-command")]
    Unresolved { command: String },

    /// A callback reported failure.
    #[error("command '{command}' failed: {source}")]
    Callback {
        command: String,
        #[source]
        source: CallbackError,
    },

    /// A command tree was rejected at registration.
    #[error("invalid command tree: {0}")]
    Validation(#[from] ValidationError),

    /// Definition file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON definition parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML definition parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`WendellError`].
pub type Result<T> = std::result::Result<T, WendellError>;

/// A user-facing usage problem found while dispatching.
///
/// Each variant renders as the diagnostic line printed before the general
/// help text.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum UsageError {
    /// The argument vector held no command token.
    #[error("No command given.")]
    NoCommand,
    /// An option-looking token appeared where a command was expected.
    #[error("Options must be specified after the command.")]
    OptionsBeforeCommand,
    /// The first positional token names no registered command.
    #[error("Command \"{0}\" not understood.")]
    UnknownCommand(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_lists_registered_names() {
        let err = WendellError::UnknownCommand {
            name: "ship".into(),
            registered: vec!["build".into(), "deploy".into()],
        };
        assert_eq!(
            err.to_string(),
            "Command 'ship' not found. Registered commands: build, deploy"
        );
    }

    #[test]
    fn test_usage_error_messages() {
        assert_eq!(UsageError::NoCommand.to_string(), "No command given.");
        assert_eq!(
            UsageError::UnknownCommand("ship".into()).to_string(),
            "Command \"ship\" not understood."
        );
    }
}
