//! Merging tokenized flag values with declared defaults.
//!
//! The tokenizer reports values keyed by long spelling and only for flags
//! that actually appeared. [`merge_defaults`] re-keys them by option name and
//! fills in declared defaults for options that did not appear. An explicit
//! value, including an explicit `false` from `--no-flag`, always wins over a
//! default.
//!
//! # Example
//!
//! ```
//! use wendell_core::*;
//!
//! let options = vec![
//!     CommandOption::configure(OptionConfig::new("verbose").with_default(false)).unwrap(),
//!     CommandOption::configure(
//!         OptionConfig::new("dryRun").with_long("dry-run").with_default(false),
//!     )
//!     .unwrap(),
//! ];
//!
//! let mut tokenized = FlagValues::new();
//! tokenized.insert("dry-run".into(), FlagValue::Bool(true));
//!
//! let data = merge_defaults(&options, tokenized);
//! assert_eq!(data.get("dryRun"), Some(&FlagValue::Bool(true)));
//! assert_eq!(data.get("verbose"), Some(&FlagValue::Bool(false)));
//! ```

use wendell_flags::FlagValues;

use crate::option::CommandOption;

/// Re-keys tokenized values by option name and applies defaults.
///
/// Values for flags no option declares are kept under the key the tokenizer
/// used, unless that key is already taken by a declared option's name.
pub fn merge_defaults<'a>(
    options: impl IntoIterator<Item = &'a CommandOption>,
    mut tokenized: FlagValues,
) -> FlagValues {
    let mut data = FlagValues::new();

    for option in options {
        match tokenized.remove(option.key()) {
            Some(value) => {
                data.insert(option.name().to_string(), value);
            }
            None => {
                if let Some(default) = option.default_value() {
                    data.insert(option.name().to_string(), default.clone());
                }
            }
        }
    }

    for (key, value) in tokenized {
        data.entry(key).or_insert(value);
    }

    data
}

#[cfg(test)]
mod tests {
    use wendell_flags::{FlagValue, ValueKind};

    use super::*;
    use crate::OptionConfig;

    fn option(config: OptionConfig) -> CommandOption {
        CommandOption::configure(config).unwrap()
    }

    #[test]
    fn test_explicit_false_beats_default() {
        let options = vec![option(OptionConfig::new("color").with_default(true))];
        let mut tokenized = FlagValues::new();
        tokenized.insert("color".into(), FlagValue::Bool(false));

        let data = merge_defaults(&options, tokenized);
        assert_eq!(data.get("color"), Some(&FlagValue::Bool(false)));
    }

    #[test]
    fn test_absent_without_default_stays_absent() {
        let options = vec![option(
            OptionConfig::new("env").with_type(ValueKind::String),
        )];

        let data = merge_defaults(&options, FlagValues::new());
        assert!(data.is_empty());
    }

    #[test]
    fn test_unknown_flags_are_kept() {
        let options = vec![option(OptionConfig::new("verbose"))];
        let mut tokenized = FlagValues::new();
        tokenized.insert("trace".into(), FlagValue::Bool(true));

        let data = merge_defaults(&options, tokenized);
        assert_eq!(data.get("trace"), Some(&FlagValue::Bool(true)));
        assert!(!data.contains_key("verbose"));
    }

    #[test]
    fn test_unknown_flag_cannot_shadow_option_name() {
        let options = vec![option(
            OptionConfig::new("Mode")
                .with_long("mode-name")
                .with_type(ValueKind::String)
                .with_default("fast"),
        )];
        let mut tokenized = FlagValues::new();
        tokenized.insert("Mode".into(), FlagValue::from("slow"));

        let data = merge_defaults(&options, tokenized);
        assert_eq!(data.get("Mode"), Some(&FlagValue::from("fast")));
    }
}
