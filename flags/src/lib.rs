//! Flag tokenizing primitive.
//!
//! Given the option signatures a command accepts and a flat slice of
//! argument tokens, the tokenizer separates the tokens into recognized flag
//! values and the positional tokens it did not consume:
//!
//! - [`LongSignatures`] — long spelling (without dashes) → [`ValueKind`].
//! - [`ShortSignatures`] — short spelling (without dash) → long spelling,
//!   making the short flag an alias.
//! - [`FlagTokenizer`] — the seam callers depend on.
//! - [`Tokenizer`] — the default implementation.
//!
//! The tokenizer knows nothing about commands: it never decides which level
//! of a command tree a token belongs to, it only reads the slice it is given.
//!
//! # Example
//!
//! ```
//! use wendell_flags::*;
//!
//! let mut long = LongSignatures::new();
//! long.insert("verbose".into(), ValueKind::Boolean);
//! long.insert("env".into(), ValueKind::String);
//! let mut short = ShortSignatures::new();
//! short.insert("v".into(), "verbose".into());
//!
//! let args: Vec<String> = ["-v", "--env", "prod", "app.toml"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let out = Tokenizer::new().tokenize(&long, &short, &args);
//!
//! assert_eq!(out.values.get("verbose"), Some(&FlagValue::Bool(true)));
//! assert_eq!(out.values.get("env"), Some(&FlagValue::from("prod")));
//! assert_eq!(out.remain, vec!["app.toml".to_string()]);
//! ```

mod signature;
mod tokenizer;
mod value;

pub use signature::{LongSignatures, ShortSignatures, ValueKind};
pub use tokenizer::{FlagTokenizer, Tokenized, Tokenizer};
pub use value::{FlagValue, FlagValues};
