//! The default flag tokenizer.
//!
//! Rules, applied left to right:
//!
//! - `--` ends flag processing; every later token is positional.
//! - A lone `-` and any token not starting with `-` is positional.
//! - `--name=value` / `-n=value` carry an inline value.
//! - Short spellings are looked up in the [`ShortSignatures`] and replaced by
//!   their long alias.
//! - A string flag without an inline value consumes the next token unless it
//!   starts with `-` (a lone `-` is still consumed). Without a usable next
//!   token the value is `""`.
//! - A boolean flag is `true`; an inline value of `false` makes it `false`.
//! - `--no-name` is `false` when `name` is a known boolean.
//! - Unknown flags are recorded under their stripped spelling, as `true` or
//!   as their inline value.
//!
//! Later occurrences of a flag overwrite earlier ones.

use serde::Serialize;
use tracing::trace;

use crate::{FlagValue, FlagValues, LongSignatures, ShortSignatures, ValueKind};

/// Output of a tokenizer run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    /// Recognized flags, keyed by long spelling without dashes.
    pub values: FlagValues,
    /// Tokens that were not consumed as flags or flag values, in order.
    pub remain: Vec<String>,
}

/// Splits a token slice into flag values and positionals.
///
/// Implementations must be pure: the same signatures and tokens always
/// produce the same [`Tokenized`].
pub trait FlagTokenizer {
    fn tokenize(
        &self,
        long: &LongSignatures,
        short: &ShortSignatures,
        args: &[String],
    ) -> Tokenized;
}

/// Default [`FlagTokenizer`].
///
/// # Examples
///
/// ```
/// use wendell_flags::*;
///
/// let mut long = LongSignatures::new();
/// long.insert("color".into(), ValueKind::Boolean);
///
/// let args: Vec<String> = ["--no-color", "--", "--color"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let out = Tokenizer::new().tokenize(&long, &ShortSignatures::new(), &args);
/// assert_eq!(out.values.get("color"), Some(&FlagValue::Bool(false)));
/// assert_eq!(out.remain, vec!["--color".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl FlagTokenizer for Tokenizer {
    fn tokenize(
        &self,
        long: &LongSignatures,
        short: &ShortSignatures,
        args: &[String],
    ) -> Tokenized {
        let mut out = Tokenized::default();
        let mut i = 0;

        while i < args.len() {
            let token = args[i].as_str();
            i += 1;

            if token == "--" {
                out.remain.extend(args[i..].iter().cloned());
                break;
            }
            if token == "-" || !token.starts_with('-') {
                out.remain.push(token.to_string());
                continue;
            }

            let is_long = token.starts_with("--");
            let (spelling, inline) = split_inline(token);
            let name = if is_long {
                spelling.to_string()
            } else {
                short
                    .get(spelling)
                    .cloned()
                    .unwrap_or_else(|| spelling.to_string())
            };

            match long.get(&name) {
                Some(ValueKind::String) => {
                    let value = match inline {
                        Some(value) => value.to_string(),
                        None => match args.get(i) {
                            Some(next) if next == "-" || !next.starts_with('-') => {
                                i += 1;
                                next.clone()
                            }
                            _ => String::new(),
                        },
                    };
                    trace!(flag = %name, value = %value, "string flag");
                    out.values.insert(name, FlagValue::String(value));
                }
                Some(ValueKind::Boolean) => {
                    let value = inline.map(parse_bool).unwrap_or(true);
                    trace!(flag = %name, value, "boolean flag");
                    out.values.insert(name, FlagValue::Bool(value));
                }
                None => {
                    let negated = if is_long && inline.is_none() {
                        name.strip_prefix("no-")
                            .filter(|base| long.get(*base) == Some(&ValueKind::Boolean))
                    } else {
                        None
                    };

                    match negated {
                        Some(base) => {
                            trace!(flag = %base, "negated boolean flag");
                            out.values.insert(base.to_string(), FlagValue::Bool(false));
                        }
                        None => {
                            let value = inline
                                .map(FlagValue::from)
                                .unwrap_or(FlagValue::Bool(true));
                            trace!(flag = %name, "unknown flag");
                            out.values.insert(name, value);
                        }
                    }
                }
            }
        }

        out
    }
}

/// Strips leading dashes and splits off an inline `=value`.
fn split_inline(token: &str) -> (&str, Option<&str>) {
    let stripped = token.trim_start_matches('-');
    match stripped.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (stripped, None),
    }
}

fn parse_bool(value: &str) -> bool {
    !value.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn signatures() -> (LongSignatures, ShortSignatures) {
        let mut long = LongSignatures::new();
        long.insert("verbose".into(), ValueKind::Boolean);
        long.insert("env".into(), ValueKind::String);
        let mut short = ShortSignatures::new();
        short.insert("v".into(), "verbose".into());
        short.insert("e".into(), "env".into());
        (long, short)
    }

    #[test]
    fn test_positionals_pass_through() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["a", "-", "b"]));

        assert!(out.values.is_empty());
        assert_eq!(out.remain, args(&["a", "-", "b"]));
    }

    #[test]
    fn test_short_alias_resolves_to_long_name() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["-v", "-e", "prod"]));

        assert_eq!(out.values.get("verbose"), Some(&FlagValue::Bool(true)));
        assert_eq!(out.values.get("env"), Some(&FlagValue::from("prod")));
        assert!(out.remain.is_empty());
    }

    #[test]
    fn test_inline_values() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(
            &long,
            &short,
            &args(&["--env=staging", "--verbose=false"]),
        );

        assert_eq!(out.values.get("env"), Some(&FlagValue::from("staging")));
        assert_eq!(out.values.get("verbose"), Some(&FlagValue::Bool(false)));
    }

    #[test]
    fn test_string_flag_does_not_swallow_following_flag() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["--env", "--verbose"]));

        assert_eq!(out.values.get("env"), Some(&FlagValue::from("")));
        assert_eq!(out.values.get("verbose"), Some(&FlagValue::Bool(true)));
    }

    #[test]
    fn test_string_flag_at_end_is_empty() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["file", "--env"]));

        assert_eq!(out.values.get("env"), Some(&FlagValue::from("")));
        assert_eq!(out.remain, args(&["file"]));
    }

    #[test]
    fn test_negated_boolean() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["--verbose", "--no-verbose"]));

        assert_eq!(out.values.get("verbose"), Some(&FlagValue::Bool(false)));
        assert!(!out.values.contains_key("no-verbose"));
    }

    #[test]
    fn test_unknown_flags_are_recorded() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(
            &long,
            &short,
            &args(&["--dry-run", "-x", "--tag=v1", "next"]),
        );

        assert_eq!(out.values.get("dry-run"), Some(&FlagValue::Bool(true)));
        assert_eq!(out.values.get("x"), Some(&FlagValue::Bool(true)));
        assert_eq!(out.values.get("tag"), Some(&FlagValue::from("v1")));
        assert_eq!(out.remain, args(&["next"]));
    }

    #[test]
    fn test_double_dash_terminates_flags() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["-v", "--", "-e", "x"]));

        assert_eq!(out.values.len(), 1);
        assert_eq!(out.remain, args(&["-e", "x"]));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let (long, short) = signatures();
        let out = Tokenizer::new().tokenize(&long, &short, &args(&["-e", "a", "--env", "b"]));

        assert_eq!(out.values.get("env"), Some(&FlagValue::from("b")));
    }
}
