//! Command tree resolution, dispatch and help rendering.
//!
//! This crate turns a tree of declared commands into a dispatcher for an
//! argument vector:
//!
//! - [`CommandOption`] — a flag with a long and optional short spelling, a
//!   value type and an optional default.
//! - [`Command`] — a named node owning options, an optional callback and
//!   sub-commands. [`Command::parse`] resolves one level of arguments.
//! - [`CommandParser`] — the root dispatcher. Adds the global `-h/--help`
//!   and `-v/--version` switches, walks the whole tree, prints help, version
//!   and usage diagnostics through a [`Printer`], and invokes callbacks.
//! - [`Definition`] — a serde-loadable (YAML or JSON) declaration of a whole
//!   parser, built with [`Definition::build`].
//!
//! Flag tokenizing lives in the `wendell-flags` crate behind the
//! [`FlagTokenizer`] trait; its types are re-exported here.
//!
//! Trees are checked at registration ([`validate_command`]) so that
//! duplicate spellings and unreachable sub-commands fail at setup instead of
//! misbehaving at dispatch. A command's own options take precedence over the
//! global switches at that command's level.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use wendell_core::*;
//!
//! let seen = Arc::new(Mutex::new(None));
//! let sink = Arc::clone(&seen);
//!
//! let deploy = Command::new("deploy")
//!     .with_description("Deploy the application")
//!     .with_option(
//!         CommandOption::configure(
//!             OptionConfig::new("env")
//!                 .with_short("e")
//!                 .with_type(ValueKind::String)
//!                 .with_default("dev"),
//!         )
//!         .unwrap(),
//!     )
//!     .with_callback(move |inv| {
//!         *sink.lock().unwrap() = inv.data.get("env").cloned();
//!         Ok(())
//!     });
//!
//! let mut parser = CommandParser::new(ParserConfig::new("tool"))
//!     .with_printer(Arc::new(MemoryPrinter::new()));
//! parser.command(deploy).unwrap();
//!
//! let args: Vec<String> = vec!["deploy".into(), "-e".into(), "prod".into()];
//! parser.parse(&args).unwrap();
//! assert_eq!(*seen.lock().unwrap(), Some(FlagValue::from("prod")));
//! ```

mod command;
mod config;
mod error;
mod help;
mod merge;
mod option;
mod parser;
mod printer;
mod validate;

pub use command::{Callback, Command, Invocation, ParseResult};
pub use config::{CommandConfig, Definition, OptionConfig, ParserConfig};
pub use error::{CallbackError, Result, UsageError, WendellError};
pub use help::{HelpContext, command_help, general_help};
pub use merge::merge_defaults;
pub use option::{CommandOption, Signature};
pub use parser::{CommandParser, DEFAULT_VERSION, FALLBACK_BIN, Outcome, Resolution};
pub use printer::{ConsolePrinter, MemoryPrinter, Printer, date_prefix};
pub use validate::{ValidationError, validate_command};
pub use wendell_flags::{
    FlagTokenizer, FlagValue, FlagValues, LongSignatures, ShortSignatures, Tokenized, Tokenizer,
    ValueKind,
};
