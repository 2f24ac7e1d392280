//! Signature maps handed to the tokenizer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type marker for a flag.
///
/// # Examples
///
/// ```
/// use wendell_flags::ValueKind;
///
/// assert_eq!(ValueKind::default(), ValueKind::Boolean);
/// assert!(ValueKind::String.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Free-form string value.
    String,
    /// Switch with no value (the default).
    #[default]
    Boolean,
}

impl ValueKind {
    /// Returns `true` when the flag consumes a value token.
    pub fn takes_value(self) -> bool {
        matches!(self, Self::String)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Boolean => f.write_str("boolean"),
        }
    }
}

/// Long spelling without dashes (e.g. `"verbose"`) → value kind.
pub type LongSignatures = BTreeMap<String, ValueKind>;

/// Short spelling without dash (e.g. `"v"`) → long spelling without dashes.
pub type ShortSignatures = BTreeMap<String, String>;
