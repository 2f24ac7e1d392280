//! Command tree validation.
//!
//! Catches declarations that would make resolution silently misbehave:
//! sub-commands that can never be matched and two options sharing a short
//! spelling. Options may reuse the root parser's `-h/--help` and
//! `-v/--version` spellings; they take precedence at their own level.
//!
//! # Examples
//!
//! ```
//! use wendell_core::*;
//!
//! let ok = Command::new("tool").with_command(Command::new("build"));
//! assert!(validate_command(&ok).is_empty());
//!
//! // Sub-command names starting with a dash are never matched
//! let bad = Command::new("tool").with_command(Command::new("--build"));
//! assert!(!validate_command(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::command::Command;
use crate::option::CommandOption;

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Sub-command name starts with `-`, so the scan never matches it.
    #[error("command name cannot start with a dash: {0}")]
    DashedCommandName(String),
    /// Two options in the same command share a long or short spelling.
    ///
    /// [`Command::add_option`] already replaces options by long spelling, so
    /// in practice this reports shared short spellings.
    #[error("duplicate option spelling in command '{command}': {spelling}")]
    DuplicateSpelling { command: String, spelling: String },
}

/// Validates a command and all of its descendants.
///
/// Stops at the first problem found.
pub fn validate_command(command: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let name = command.name().trim();
    if name.is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }
    if name.starts_with('-') {
        errors.push(ValidationError::DashedCommandName(name.to_string()));
        return errors;
    }

    errors.extend(validate_options(name, command.options()));
    if !errors.is_empty() {
        return errors;
    }

    for child in command.commands() {
        errors.extend(validate_command(child));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(command: &str, options: &[CommandOption]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        let spellings = std::iter::once(option.long()).chain(option.short());
        for spelling in spellings {
            if !seen.insert(spelling) {
                errors.push(ValidationError::DuplicateSpelling {
                    command: command.to_string(),
                    spelling: spelling.to_string(),
                });
                return errors;
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionConfig;

    fn option(config: OptionConfig) -> CommandOption {
        CommandOption::configure(config).unwrap()
    }

    #[test]
    fn test_rejects_empty_child_name() {
        let tree = Command::new("tool").with_command(Command::new("  "));
        assert_eq!(
            validate_command(&tree),
            vec![ValidationError::EmptyCommandName]
        );
    }

    #[test]
    fn test_shared_long_spelling_leaves_one_option() {
        let deploy = Command::new("deploy")
            .with_option(option(OptionConfig::new("env")))
            .with_option(option(OptionConfig::new("environment").with_long("env")));

        assert_eq!(deploy.options().len(), 1);
        assert_eq!(deploy.options()[0].name(), "environment");
        assert!(validate_command(&deploy).is_empty());
    }

    #[test]
    fn test_rejects_duplicate_short_spelling() {
        let tree = Command::new("tool")
            .with_option(option(OptionConfig::new("verbose").with_short("v")))
            .with_option(option(OptionConfig::new("validate").with_short("v")));

        let errors = validate_command(&tree);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::DuplicateSpelling { spelling, .. }] if spelling == "-v"
        ));
    }

    #[test]
    fn test_global_switch_spellings_are_allowed() {
        let tree = Command::new("deploy")
            .with_option(option(OptionConfig::new("verbose").with_short("v")))
            .with_option(option(OptionConfig::new("topic").with_long("help")));

        assert!(validate_command(&tree).is_empty());
    }

    #[test]
    fn test_accepts_valid_tree() {
        let tree = Command::new("tool")
            .with_option(option(OptionConfig::new("quiet").with_short("q")))
            .with_command(
                Command::new("remote")
                    .with_command(Command::new("add"))
                    .with_command(Command::new("remove")),
            );

        assert!(validate_command(&tree).is_empty());
    }
}
