//! Declarative flag descriptions.
//!
//! A [`CommandOption`] is built once from an [`OptionConfig`] and never
//! changes afterwards. Spellings are stored dash-normalized: the long form
//! always carries exactly two leading dashes, the short form exactly one.

use serde::Serialize;
use wendell_flags::{FlagValue, ValueKind};

use crate::config::OptionConfig;
use crate::error::{Result, WendellError};

/// A single flag a command accepts.
///
/// # Examples
///
/// ```
/// use wendell_core::{CommandOption, OptionConfig, ValueKind};
///
/// let env = CommandOption::configure(
///     OptionConfig::new("env")
///         .with_short("---e")
///         .with_type(ValueKind::String)
///         .with_default("dev"),
/// )
/// .unwrap();
///
/// assert_eq!(env.long(), "--env");
/// assert_eq!(env.short(), Some("-e"));
/// assert!(env.has_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    name: String,
    description: String,
    short: Option<String>,
    long: String,
    value_type: ValueKind,
    default: Option<FlagValue>,
}

/// The form of an option handed to the flag tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Long spelling without dashes, and the value type marker.
    pub long: (String, ValueKind),
    /// Short spelling without dash, and the long spelling it aliases.
    pub short: Option<(String, String)>,
}

impl CommandOption {
    /// Builds an option from its declaration.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::Configuration`] when `name` is missing or
    /// blank.
    pub fn configure(config: OptionConfig) -> Result<Self> {
        let name = config
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| WendellError::Configuration("option name cannot be empty".into()))?;

        let short = config
            .short
            .as_deref()
            .and_then(|s| normalize(s, 1));
        let long = config
            .long
            .as_deref()
            .and_then(|l| normalize(l, 2))
            .or_else(|| normalize(&name.to_lowercase(), 2))
            .ok_or_else(|| {
                WendellError::Configuration(format!("option '{name}' has no usable long spelling"))
            })?;

        Ok(Self {
            name,
            description: config.description.unwrap_or_default(),
            short,
            long,
            value_type: config.value_type.unwrap_or_default(),
            default: config.default,
        })
    }

    /// Boolean switch with a fixed `--name`/`-short` spelling and no default.
    pub(crate) fn switch(name: &str, short: char, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            short: Some(format!("-{short}")),
            long: format!("--{name}"),
            value_type: ValueKind::Boolean,
            default: None,
        }
    }

    /// Shorthand for a named option with every other field defaulted.
    pub fn new(name: &str) -> Result<Self> {
        Self::configure(OptionConfig::new(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Short spelling, e.g. `-v`.
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Long spelling, e.g. `--verbose`.
    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn value_type(&self) -> ValueKind {
        self.value_type
    }

    pub fn default_value(&self) -> Option<&FlagValue> {
        self.default.as_ref()
    }

    /// Returns `true` iff a default was declared, even `false` or `""`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wendell_core::{CommandOption, OptionConfig};
    ///
    /// let quiet = CommandOption::configure(OptionConfig::new("quiet").with_default(false)).unwrap();
    /// assert!(quiet.has_default());
    /// assert!(!CommandOption::new("loud").unwrap().has_default());
    /// ```
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns the long and (optional) short signature for the tokenizer.
    ///
    /// # Examples
    ///
    /// ```
    /// use wendell_core::{CommandOption, OptionConfig, ValueKind};
    ///
    /// let sig = CommandOption::configure(OptionConfig::new("verbose").with_short("v"))
    ///     .unwrap()
    ///     .signature();
    /// assert_eq!(sig.long, ("verbose".to_string(), ValueKind::Boolean));
    /// assert_eq!(sig.short, Some(("v".to_string(), "verbose".to_string())));
    /// ```
    pub fn signature(&self) -> Signature {
        let long = strip_dashes(&self.long).to_string();
        let short = self
            .short
            .as_deref()
            .map(|s| (strip_dashes(s).to_string(), long.clone()));

        Signature {
            long: (long, self.value_type),
            short,
        }
    }

    /// Long spelling without dashes; the key the tokenizer reports under.
    pub(crate) fn key(&self) -> &str {
        strip_dashes(&self.long)
    }
}

fn strip_dashes(spelling: &str) -> &str {
    spelling.trim_start_matches('-')
}

/// Re-prefixes `spelling` with exactly `dashes` dashes. Blank spellings
/// normalize to nothing.
fn normalize(spelling: &str, dashes: usize) -> Option<String> {
    let bare = strip_dashes(spelling.trim());
    if bare.is_empty() {
        return None;
    }
    Some(format!("{}{bare}", "-".repeat(dashes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_defaults_to_lowercase_name() {
        let opt = CommandOption::new("Verbose").unwrap();

        assert_eq!(opt.name(), "Verbose");
        assert_eq!(opt.long(), "--verbose");
        assert_eq!(opt.short(), None);
        assert_eq!(opt.value_type(), ValueKind::Boolean);
    }

    #[test]
    fn test_dash_normalization() {
        for spelling in ["--foo", "foo", "-foo", "----foo"] {
            let opt = CommandOption::configure(
                OptionConfig::new("x").with_long(spelling).with_short(spelling),
            )
            .unwrap();
            assert_eq!(opt.long(), "--foo");
            assert_eq!(opt.short(), Some("-foo"));
        }
    }

    #[test]
    fn test_blank_short_is_ignored() {
        let opt = CommandOption::configure(OptionConfig::new("x").with_short("-")).unwrap();
        assert_eq!(opt.short(), None);
        assert!(opt.signature().short.is_none());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = CommandOption::configure(OptionConfig::default()).unwrap_err();
        assert!(matches!(err, WendellError::Configuration(_)));

        let err = CommandOption::new("   ").unwrap_err();
        assert!(matches!(err, WendellError::Configuration(_)));
    }

    #[test]
    fn test_has_default_distinguishes_falsy_defaults() {
        let off = CommandOption::configure(OptionConfig::new("a").with_default(false)).unwrap();
        let empty = CommandOption::configure(OptionConfig::new("b").with_default("")).unwrap();
        let unset = CommandOption::new("c").unwrap();

        assert!(off.has_default());
        assert!(empty.has_default());
        assert!(!unset.has_default());
    }

    #[test]
    fn test_signature_uses_long_spelling() {
        let opt = CommandOption::configure(
            OptionConfig::new("dryRun")
                .with_long("--dry-run")
                .with_short("-n")
                .with_type(ValueKind::String),
        )
        .unwrap();

        let sig = opt.signature();
        assert_eq!(sig.long, ("dry-run".to_string(), ValueKind::String));
        assert_eq!(sig.short, Some(("n".to_string(), "dry-run".to_string())));
        assert_eq!(opt.key(), "dry-run");
    }
}
