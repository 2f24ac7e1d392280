use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed flag value.
///
/// Serialized untagged, so a boolean flag is written as `true` and a string
/// flag as `"prod"`.
///
/// # Examples
///
/// ```
/// use wendell_flags::FlagValue;
///
/// let v: FlagValue = serde_json::from_str("\"prod\"").unwrap();
/// assert_eq!(v.as_str(), Some("prod"));
/// assert!(FlagValue::Bool(true).is_truthy());
/// assert!(!FlagValue::from("").is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    String(String),
}

impl FlagValue {
    /// Returns the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }

    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::String(s) => Some(s),
        }
    }

    /// `true` for `Bool(true)` and for non-empty strings.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Flag name → value. Ordered so results compare and serialize
/// deterministically.
pub type FlagValues = BTreeMap<String, FlagValue>;
