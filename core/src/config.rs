//! Declaration structs for options, commands and the root parser.
//!
//! Every struct derives [`serde::Deserialize`], so a command tree can be
//! declared in code with the `with_*` builders or loaded from a YAML/JSON
//! [`Definition`]. Only the fields listed on each struct are recognized;
//! unknown keys in serialized declarations are ignored.
//!
//! # Example YAML
//!
//! ```yaml
//! bin: deployer
//! title: Deployer
//! version: "2.1.0"
//! commands:
//!   deploy:
//!     description: Deploy the application
//!     usage: "deploy [--env ENV] TARGET"
//!     options:
//!       env:
//!         short: e
//!         type: string
//!         default: dev
//!     commands:
//!       rollback:
//!         description: Undo the last deploy
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wendell_flags::{FlagValue, ValueKind};

use crate::command::Command;
use crate::error::Result;
use crate::parser::CommandParser;

/// Declaration of a single option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionConfig {
    /// Option name; falls back to the map key when declared in a map.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Short spelling, with or without its dash.
    pub short: Option<String>,
    /// Long spelling, with or without dashes. Defaults to lowercase(name).
    pub long: Option<String>,
    /// Value type, `boolean` when absent.
    #[serde(rename = "type")]
    pub value_type: Option<ValueKind>,
    /// Declared default. `None` means no default, which is distinct from a
    /// `false` or `""` default.
    pub default: Option<FlagValue>,
}

impl OptionConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_short(mut self, short: &str) -> Self {
        self.short = Some(short.to_string());
        self
    }

    pub fn with_long(mut self, long: &str) -> Self {
        self.long = Some(long.to_string());
        self
    }

    pub fn with_type(mut self, value_type: ValueKind) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_default(mut self, default: impl Into<FlagValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Declaration of a command and, recursively, its sub-commands.
///
/// The callback is not part of the declaration; attach it to the built
/// [`Command`] with [`Command::with_callback`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Command name; falls back to the map key when declared in a map.
    pub name: Option<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    /// Options keyed by name, in declaration order.
    #[serde(default)]
    pub options: IndexMap<String, OptionConfig>,
    /// Sub-commands keyed by name, in declaration order.
    #[serde(default)]
    pub commands: IndexMap<String, CommandConfig>,
}

impl CommandConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Adds an option declaration keyed by its name (or `key`).
    pub fn with_option(mut self, key: &str, option: OptionConfig) -> Self {
        self.options.insert(key.to_string(), option);
        self
    }

    /// Adds a sub-command declaration keyed by `key`.
    pub fn with_command(mut self, key: &str, command: CommandConfig) -> Self {
        self.commands.insert(key.to_string(), command);
        self
    }
}

/// Root parser settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Program name shown in help and version output.
    pub bin: Option<String>,
    /// Title printed above help text.
    pub title: Option<String>,
    /// General usage line.
    pub usage: Option<String>,
    /// Version reported by `--version`.
    pub version: Option<String>,
}

impl ParserConfig {
    pub fn new(bin: &str) -> Self {
        Self {
            bin: Some(bin.to_string()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

/// A complete parser declaration: root settings plus top-level commands.
///
/// # Examples
///
/// ```
/// use wendell_core::Definition;
///
/// let def = Definition::from_yaml_str(
///     "bin: tool\ncommands:\n  build:\n    description: Build it\n",
/// )
/// .unwrap();
/// let parser = def.build().unwrap();
/// assert_eq!(parser.bin(), "tool");
/// assert!(parser.get_command("build").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(flatten)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub commands: IndexMap<String, CommandConfig>,
}

impl Definition {
    /// Loads a definition file, picking the format from its extension:
    /// `.json` is read as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::WendellError::Io) if the file cannot be read,
    /// or [`Json`](crate::WendellError::Json) /
    /// [`Yaml`](crate::WendellError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading definition");

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds a [`CommandParser`] with every declared command registered.
    ///
    /// # Errors
    ///
    /// Fails on the first option without a name or the first command tree
    /// that does not validate.
    pub fn build(self) -> Result<CommandParser> {
        let mut parser = CommandParser::new(self.parser);
        for (key, config) in self.commands {
            let command = Command::from_keyed(&key, config)?;
            parser.command(command)?;
        }
        Ok(parser)
    }
}
