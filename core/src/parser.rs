//! Root dispatcher.
//!
//! [`CommandParser`] wraps a root [`Command`] and adds what only the top of
//! a program needs: the program name, title, usage template and version,
//! the global `-h/--help` and `-v/--version` switches, and the walk that
//! resolves an argument vector all the way down the tree before dispatching.
//!
//! The global switches are offered to the tokenizer at every level, so both
//! `tool --help deploy` and `tool deploy --help` render help for `deploy`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use wendell_flags::{FlagTokenizer, FlagValue, FlagValues, Tokenizer};

use crate::command::{Command, Invocation};
use crate::config::ParserConfig;
use crate::error::{Result, UsageError, WendellError};
use crate::help::{HelpContext, command_help, general_help};
use crate::option::CommandOption;
use crate::printer::{ConsolePrinter, Printer};
use crate::validate::validate_command;

/// Version reported when none is configured.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Program name used when none is configured and the executable name cannot
/// be determined.
pub const FALLBACK_BIN: &str = "wendell";

const HELP: &str = "help";
const VERSION: &str = "version";

/// Result of walking an argument vector down the tree, without invoking
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Resolved command names below the root, outermost first. Empty when no
    /// command was recognized.
    pub path: Vec<String>,
    /// Option values of the deepest resolved level.
    pub data: FlagValues,
    /// Positionals left for the deepest resolved level.
    pub args: Vec<String>,
    /// `-h/--help` was given at some level.
    pub help: bool,
    /// `-v/--version` was given at some level.
    pub version: bool,
}

/// What [`CommandParser::parse`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// A callback ran.
    Dispatched { path: Vec<String> },
    /// Help was printed, for `path` or generally when `path` is empty.
    Help { path: Vec<String> },
    /// The version line was printed.
    Version,
    /// A usage diagnostic and the general help were printed.
    Usage(UsageError),
}

/// Top-level command dispatcher.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wendell_core::*;
///
/// let printer = Arc::new(MemoryPrinter::new());
/// let mut parser = CommandParser::new(ParserConfig::new("tool").with_version("2.0.0"))
///     .with_printer(printer.clone());
/// parser
///     .command(Command::new("build").with_callback(|_| Ok(())))
///     .unwrap();
///
/// let outcome = parser.parse(&["build".to_string()]).unwrap();
/// assert_eq!(outcome, Outcome::Dispatched { path: vec!["build".to_string()] });
///
/// parser.parse(&["--version".to_string()]).unwrap();
/// assert_eq!(printer.lines(), vec!["tool version 2.0.0".to_string()]);
/// ```
pub struct CommandParser {
    bin: String,
    title: String,
    usage: String,
    version: String,
    root: Command,
    globals: Vec<CommandOption>,
    printer: Arc<dyn Printer>,
    tokenizer: Arc<dyn FlagTokenizer + Send + Sync>,
}

impl CommandParser {
    pub fn new(config: ParserConfig) -> Self {
        let bin = config.bin.unwrap_or_else(default_bin);
        let usage = config
            .usage
            .unwrap_or_else(|| format!("{bin} [-h, --help] [-v, --version] COMMAND [OPTIONS] [ARG, ...]"));

        let globals = vec![
            CommandOption::switch(HELP, 'h', "Show help"),
            CommandOption::switch(VERSION, 'v', "Show the version"),
        ];
        let mut root = Command::new(&bin).with_usage(&usage);
        for option in &globals {
            root.add_option(option.clone());
        }

        Self {
            title: config.title.unwrap_or_default(),
            version: config.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            bin,
            usage,
            root,
            globals,
            printer: Arc::new(ConsolePrinter),
            tokenizer: Arc::new(Tokenizer::new()),
        }
    }

    pub fn with_printer(mut self, printer: Arc<dyn Printer>) -> Self {
        self.printer = printer;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn FlagTokenizer + Send + Sync>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn version_number(&self) -> &str {
        &self.version
    }

    /// The root command holding the global switches and top-level commands.
    pub fn root(&self) -> &Command {
        &self.root
    }

    /// Registers a top-level command, replacing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::Validation`] with the first problem found in
    /// the command's subtree.
    ///
    /// Options may reuse the global switches' spellings: at their own level
    /// they take precedence over `-h/--help` and `-v/--version`.
    pub fn command(&mut self, command: Command) -> Result<&mut Self> {
        if let Some(err) = validate_command(&command).into_iter().next() {
            return Err(WendellError::Validation(err));
        }
        debug!(command = %command.name(), "registering command");
        self.root.add_command(command);
        Ok(self)
    }

    pub fn remove_command(&mut self, name: &str) -> Option<Command> {
        self.root.remove_command(name)
    }

    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.root.find_command(name)
    }

    /// Mutable access, e.g. to attach callbacks to commands built from a
    /// [`Definition`](crate::Definition).
    pub fn get_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.root.find_command_mut(name)
    }

    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        self.root.find_path(path)
    }

    pub fn find_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Command> {
        self.root.find_path_mut(path)
    }

    /// Top-level commands in registration order.
    pub fn commands(&self) -> &[Command] {
        self.root.commands()
    }

    /// Walks `args` down the tree without printing or invoking anything.
    ///
    /// Each hop parses one level; the positionals left at that level are
    /// forwarded in front of the tokens after the matched sub-command.
    pub fn resolve(&self, args: &[String]) -> Resolution {
        let tokenizer = self.tokenizer.as_ref();
        let mut parsed = self.root.parse_level(args, &[], tokenizer);
        let mut help = self.requested(&self.root, &parsed.data, HELP);
        let mut version = self.requested(&self.root, &parsed.data, VERSION);
        let mut node = &self.root;
        let mut path = Vec::new();

        while let Some(next) = parsed.next.take() {
            let Some(child) = node.find_command(&next) else {
                break;
            };
            node = child;
            path.push(next);
            parsed = node.parse_level(&parsed.args, &self.globals, tokenizer);
            help |= self.requested(node, &parsed.data, HELP);
            version |= self.requested(node, &parsed.data, VERSION);
        }

        debug!(path = ?path, help, version, "resolved argument vector");

        Resolution {
            path,
            data: parsed.data,
            args: parsed.args,
            help,
            version,
        }
    }

    /// Resolves `args` and acts on the result: prints help or the version,
    /// reports a usage problem, or invokes the resolved command's callback.
    ///
    /// Usage problems are printed and returned as [`Outcome::Usage`], not as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::Unresolved`] when the resolved command has no
    /// callback and [`WendellError::Callback`] when the callback fails.
    pub fn parse(&self, args: &[String]) -> Result<Outcome> {
        let resolution = self.resolve(args);

        if resolution.help {
            self.print(self.help_lines(&resolution.path), false);
            return Ok(Outcome::Help {
                path: resolution.path,
            });
        }

        if resolution.version {
            self.version();
            return Ok(Outcome::Version);
        }

        if resolution.path.is_empty() {
            let problem = usage_problem(args);
            debug!(%problem, "usage error");
            self.print(vec![problem.to_string(), String::new()], true);
            self.help(None);
            return Ok(Outcome::Usage(problem));
        }

        let command = self
            .root
            .find_path(&resolution.path)
            .ok_or_else(|| WendellError::Unresolved {
                command: resolution.path.join(" "),
            })?;
        command.invoke(Invocation {
            command,
            path: &resolution.path,
            parser: Some(self),
            data: &resolution.data,
            args: &resolution.args,
        })?;

        Ok(Outcome::Dispatched {
            path: resolution.path,
        })
    }

    /// Invokes a registered top-level command directly.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::UnknownCommand`], listing the registered
    /// names, when `name` is not registered.
    pub fn execute(&self, name: &str, data: &FlagValues, args: &[String]) -> Result<()> {
        let command = self
            .root
            .find_command(name)
            .ok_or_else(|| WendellError::UnknownCommand {
                name: name.to_string(),
                registered: self.root.command_names(),
            })?;

        let path = [name.to_string()];
        command.invoke(Invocation {
            command,
            path: &path,
            parser: Some(self),
            data,
            args,
        })
    }

    /// Prints help for a top-level command, or the general help when
    /// `command` is `None` or not registered.
    pub fn help(&self, command: Option<&str>) {
        let lines = match command {
            Some(name) => self.help_lines(&[name]),
            None => self.help_lines::<&str>(&[]),
        };
        self.print(lines, false);
    }

    /// Help lines for the command at `path`; the general help when `path`
    /// is empty or does not resolve.
    pub fn help_lines<S: AsRef<str>>(&self, path: &[S]) -> Vec<String> {
        let ctx = HelpContext {
            bin: &self.bin,
            title: &self.title,
            usage: &self.usage,
        };

        match self.root.find_path(path) {
            Some(command) if !path.is_empty() => command_help(&ctx, path, command),
            _ => general_help(&ctx, self.root.commands()),
        }
    }

    /// Prints `"<bin> version <version>"`.
    pub fn version(&self) {
        self.print(vec![self.version_line()], true);
    }

    pub fn version_line(&self) -> String {
        format!("{} version {}", self.bin, self.version)
    }

    /// Whether the global switch `name` was given at `level`. A level whose
    /// own option takes over the switch never requests it.
    fn requested(&self, level: &Command, data: &FlagValues, name: &str) -> bool {
        self.globals
            .iter()
            .find(|global| global.name() == name)
            .is_some_and(|global| {
                !level.overrides(global) && data.get(name).is_some_and(FlagValue::is_truthy)
            })
    }

    fn print(&self, lines: Vec<String>, prefixed: bool) {
        self.printer.print(&self.bin, &lines, prefixed);
    }
}

impl fmt::Debug for CommandParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("bin", &self.bin)
            .field("title", &self.title)
            .field("usage", &self.usage)
            .field("version", &self.version)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Classifies why no command was resolved, from the first raw token.
fn usage_problem(args: &[String]) -> UsageError {
    match args.first() {
        None => UsageError::NoCommand,
        Some(token) if token.starts_with('-') => UsageError::OptionsBeforeCommand,
        Some(token) => UsageError::UnknownCommand(token.clone()),
    }
}

fn default_bin() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| FALLBACK_BIN.to_string())
}
