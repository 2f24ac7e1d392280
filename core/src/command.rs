//! Command nodes and single-level resolution.
//!
//! A [`Command`] owns its options, its callback and its sub-commands. Parsing
//! never mutates the tree, so one tree can serve any number of `parse` and
//! `execute` calls, from any number of threads.
//!
//! # Resolution
//!
//! [`Command::parse`] resolves exactly one level of an argument vector:
//!
//! 1. Scan left to right for the first token that does not start with `-`
//!    and names a registered sub-command. The scan stops at the first match.
//! 2. Tokens before the match are this level's option tokens; tokens after
//!    it are handed to the sub-command.
//! 3. The option tokens are tokenized against this level's signatures and
//!    the result merged with declared defaults.
//!
//! The scan does not know which options take values, so a sub-command name
//! used as an option value (`--format build`) is still taken as the
//! sub-command. There is no `--` handling in the scan either.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use wendell_flags::{FlagTokenizer, FlagValues, LongSignatures, ShortSignatures, Tokenizer};

use crate::config::CommandConfig;
use crate::error::{CallbackError, Result, WendellError};
use crate::merge::merge_defaults;
use crate::option::CommandOption;
use crate::parser::CommandParser;

/// Handler invoked once a command is fully resolved.
pub type Callback =
    Arc<dyn Fn(&Invocation<'_>) -> std::result::Result<(), CallbackError> + Send + Sync>;

/// Everything a callback receives.
///
/// `data` holds only the invoked command's own option values; ancestors'
/// values are consumed at their own level and not passed down.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The command whose callback runs.
    pub command: &'a Command,
    /// Command names from the dispatch entry point down to `command`.
    pub path: &'a [String],
    /// The root parser, when dispatch went through one. Otherwise the
    /// command itself is the context.
    pub parser: Option<&'a CommandParser>,
    /// Merged option values.
    pub data: &'a FlagValues,
    /// Unconsumed positional arguments.
    pub args: &'a [String],
}

/// Result of resolving one command level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// The matched sub-command, if any.
    pub next: Option<String>,
    /// This level's option values merged with defaults.
    pub data: FlagValues,
    /// Unconsumed positionals followed by every token after the sub-command.
    pub args: Vec<String>,
}

/// A named node in a command tree.
///
/// # Examples
///
/// ```
/// use wendell_core::*;
///
/// let tree = Command::new("tool")
///     .with_command(Command::new("build"))
///     .with_command(Command::new("test"));
///
/// let args: Vec<String> = vec!["build".into(), "--flag".into()];
/// let parsed = tree.parse(&args);
///
/// assert_eq!(parsed.next.as_deref(), Some("build"));
/// assert!(parsed.data.is_empty());
/// assert_eq!(parsed.args, vec!["--flag".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct Command {
    name: String,
    description: String,
    usage: String,
    options: Vec<CommandOption>,
    callback: Option<Callback>,
    commands: Vec<Command>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builds a command tree from its declaration.
    ///
    /// Option entries without a name take their map key as name, and so do
    /// sub-command entries.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::Configuration`] for the first option that ends
    /// up without a name.
    pub fn configure(config: CommandConfig) -> Result<Self> {
        let mut command = Self {
            name: config.name.unwrap_or_default(),
            description: config.description.unwrap_or_default(),
            usage: config.usage.unwrap_or_default(),
            ..Default::default()
        };

        for (key, mut option) in config.options {
            if option.name.is_none() {
                option.name = Some(key);
            }
            command.add_option(CommandOption::configure(option)?);
        }

        for (key, child) in config.commands {
            command.add_command(Self::from_keyed(&key, child)?);
        }

        Ok(command)
    }

    /// Like [`configure`](Self::configure), using `key` when the declaration
    /// carries no name.
    pub fn from_keyed(key: &str, mut config: CommandConfig) -> Result<Self> {
        if config.name.is_none() {
            config.name = Some(key.to_string());
        }
        Self::configure(config)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.add_option(option);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.add_command(command);
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> std::result::Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.set_callback(callback);
        self
    }

    pub fn set_callback<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>) -> std::result::Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Adds an option. An option with the same name or the same long
    /// spelling is replaced in place, so every long spelling maps to exactly
    /// one option.
    pub fn add_option(&mut self, option: CommandOption) -> &mut Self {
        let collides = |o: &CommandOption| o.name() == option.name() || o.long() == option.long();

        match self.options.iter().position(|o| collides(o)) {
            Some(index) => {
                let mut i = index + 1;
                while i < self.options.len() {
                    if collides(&self.options[i]) {
                        self.options.remove(i);
                    } else {
                        i += 1;
                    }
                }
                self.options[index] = option;
            }
            None => self.options.push(option),
        }
        self
    }

    /// Registers a sub-command. A sub-command with the same name is replaced
    /// in place; nothing is merged.
    pub fn add_command(&mut self, command: Command) -> &mut Self {
        match self.commands.iter().position(|c| c.name == command.name) {
            Some(index) => self.commands[index] = command,
            None => self.commands.push(command),
        }
        self
    }

    /// Unregisters a sub-command, returning it if it was registered.
    pub fn remove_command(&mut self, name: &str) -> Option<Command> {
        let index = self.commands.iter().position(|c| c.name == name)?;
        Some(self.commands.remove(index))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Sub-commands in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn find_option(&self, name: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.name() == name)
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn find_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.commands.iter_mut().find(|c| c.name == name)
    }

    /// Follows `path` down the tree, one sub-command per segment.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Command> {
        path.iter()
            .try_fold(self, |node, segment| node.find_command(segment.as_ref()))
    }

    pub fn find_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Command> {
        path.iter()
            .try_fold(self, |node, segment| node.find_command_mut(segment.as_ref()))
    }

    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns `true` if one of this level's own options takes over `global`
    /// by declaring its name or its long spelling. A shared short spelling
    /// only moves the short alias; the global stays reachable by its long
    /// spelling.
    pub fn overrides(&self, global: &CommandOption) -> bool {
        self.options
            .iter()
            .any(|o| o != global && (o.name() == global.name() || o.long() == global.long()))
    }

    /// Tokenizer signatures for `extra` and this level's options. Where a
    /// spelling appears in both, this level's option wins.
    pub fn signatures(&self, extra: &[CommandOption]) -> (LongSignatures, ShortSignatures) {
        let mut long = LongSignatures::new();
        let mut short = ShortSignatures::new();

        for option in extra.iter().chain(&self.options) {
            let sig = option.signature();
            long.insert(sig.long.0, sig.long.1);
            if let Some((alias, target)) = sig.short {
                short.insert(alias, target);
            }
        }

        (long, short)
    }

    /// Resolves one level of `args` with the default tokenizer.
    pub fn parse(&self, args: &[String]) -> ParseResult {
        self.parse_with(args, &Tokenizer::new())
    }

    /// Resolves one level of `args` with a caller-supplied tokenizer.
    pub fn parse_with(&self, args: &[String], tokenizer: &dyn FlagTokenizer) -> ParseResult {
        self.parse_level(args, &[], tokenizer)
    }

    /// Resolves one level, offering `globals` to the tokenizer alongside this
    /// level's own options.
    pub(crate) fn parse_level(
        &self,
        args: &[String],
        globals: &[CommandOption],
        tokenizer: &dyn FlagTokenizer,
    ) -> ParseResult {
        let matched = args
            .iter()
            .position(|token| !token.starts_with('-') && self.find_command(token).is_some());

        let (option_args, next, next_args) = match matched {
            Some(index) => (&args[..index], Some(args[index].clone()), &args[index + 1..]),
            None => (args, None, &args[args.len()..]),
        };

        let globals: Vec<CommandOption> = globals
            .iter()
            .filter(|global| !self.overrides(global))
            .cloned()
            .collect();
        let (long, short) = self.signatures(&globals);
        let tokenized = tokenizer.tokenize(&long, &short, option_args);
        let data = merge_defaults(self.options.iter().chain(&globals), tokenized.values);

        let mut rest = tokenized.remain;
        rest.extend(next_args.iter().cloned());

        debug!(
            command = %self.name,
            next = next.as_deref().unwrap_or("-"),
            flags = data.len(),
            positionals = rest.len(),
            "resolved command level"
        );

        ParseResult {
            next,
            data,
            args: rest,
        }
    }

    /// Resolves `args` level by level and invokes the deepest command's
    /// callback with its own option values and leftover positionals.
    ///
    /// # Errors
    ///
    /// Returns [`WendellError::Unresolved`] when the deepest command has no
    /// callback, or [`WendellError::Callback`] when the callback fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use wendell_core::*;
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let tree = Command::new("tool").with_command(
    ///     Command::new("build").with_callback(move |inv| {
    ///         sink.lock().unwrap().extend(inv.args.iter().cloned());
    ///         Ok(())
    ///     }),
    /// );
    ///
    /// tree.execute(&["build".to_string(), "app".to_string()]).unwrap();
    /// assert_eq!(*seen.lock().unwrap(), vec!["app".to_string()]);
    /// ```
    pub fn execute(&self, args: &[String]) -> Result<()> {
        self.execute_with(args, &Tokenizer::new())
    }

    pub fn execute_with(&self, args: &[String], tokenizer: &dyn FlagTokenizer) -> Result<()> {
        let mut path = Vec::new();
        self.dispatch(args, tokenizer, &mut path)
    }

    fn dispatch(
        &self,
        args: &[String],
        tokenizer: &dyn FlagTokenizer,
        path: &mut Vec<String>,
    ) -> Result<()> {
        path.push(self.name.clone());
        let parsed = self.parse_with(args, tokenizer);

        if let Some(next) = parsed.next {
            let child = self
                .find_command(&next)
                .ok_or_else(|| WendellError::UnknownCommand {
                    name: next.clone(),
                    registered: self.command_names(),
                })?;
            return child.dispatch(&parsed.args, tokenizer, path);
        }

        self.invoke(Invocation {
            command: self,
            path: path.as_slice(),
            parser: None,
            data: &parsed.data,
            args: &parsed.args,
        })
    }

    /// Runs the callback for an already-resolved invocation.
    pub(crate) fn invoke(&self, invocation: Invocation<'_>) -> Result<()> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| WendellError::Unresolved {
                command: self.name.clone(),
            })?;

        debug!(command = %self.name, args = invocation.args.len(), "invoking callback");
        callback(&invocation).map_err(|source| WendellError::Callback {
            command: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .field("options", &self.options)
            .field("callback", &self.callback.is_some())
            .field("commands", &self.commands)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use wendell_flags::{FlagValue, ValueKind};

    use super::*;
    use crate::OptionConfig;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn verbose() -> CommandOption {
        CommandOption::configure(
            OptionConfig::new("verbose")
                .with_short("v")
                .with_default(false),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_matches_child_at_index_zero() {
        let tree = Command::new("tool")
            .with_command(Command::new("build"))
            .with_command(Command::new("test"));

        let parsed = tree.parse(&args(&["build", "--flag"]));
        assert_eq!(
            parsed,
            ParseResult {
                next: Some("build".into()),
                data: FlagValues::new(),
                args: args(&["--flag"]),
            }
        );
    }

    #[test]
    fn test_parse_applies_defaults() {
        let tree = Command::new("tool").with_option(verbose());

        let given = tree.parse(&args(&["--verbose", "file.txt"]));
        assert_eq!(given.next, None);
        assert_eq!(given.data.get("verbose"), Some(&FlagValue::Bool(true)));
        assert_eq!(given.args, args(&["file.txt"]));

        let defaulted = tree.parse(&args(&["file.txt"]));
        assert_eq!(defaulted.data.get("verbose"), Some(&FlagValue::Bool(false)));
        assert_eq!(defaulted.args, args(&["file.txt"]));
    }

    #[test]
    fn test_parse_earliest_child_wins() {
        let tree = Command::new("tool")
            .with_command(Command::new("build"))
            .with_command(Command::new("test"));

        let parsed = tree.parse(&args(&["-v", "test", "build", "x"]));
        assert_eq!(parsed.next.as_deref(), Some("test"));
        assert_eq!(parsed.args, args(&["build", "x"]));
        assert_eq!(parsed.data.get("v"), Some(&FlagValue::Bool(true)));
    }

    #[test]
    fn test_parse_positionals_precede_child_tail() {
        let tree = Command::new("tool")
            .with_option(verbose())
            .with_command(Command::new("build"));

        let parsed = tree.parse(&args(&["stray", "-v", "build", "--release", "app"]));
        assert_eq!(parsed.next.as_deref(), Some("build"));
        assert_eq!(parsed.args, args(&["stray", "--release", "app"]));
    }

    #[test]
    fn test_parse_dashed_token_never_matches_child() {
        let tree = Command::new("tool").with_command(Command::new("-x"));

        let parsed = tree.parse(&args(&["-x"]));
        assert_eq!(parsed.next, None);
    }

    #[test]
    fn test_parse_option_value_matching_child_is_taken_as_child() {
        let tree = Command::new("tool")
            .with_option(
                CommandOption::configure(OptionConfig::new("name").with_type(ValueKind::String))
                    .unwrap(),
            )
            .with_command(Command::new("build"));

        let parsed = tree.parse(&args(&["--name", "build"]));
        assert_eq!(parsed.next.as_deref(), Some("build"));
        assert_eq!(parsed.data.get("name"), Some(&FlagValue::from("")));
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_parse_is_repeatable() {
        let tree = Command::new("tool")
            .with_option(verbose())
            .with_command(Command::new("build"));
        let input = args(&["-v", "a", "build", "b"]);

        assert_eq!(tree.parse(&input), tree.parse(&input));
    }

    #[test]
    fn test_add_command_last_write_wins() {
        let mut tree = Command::new("tool");
        tree.add_command(Command::new("build").with_description("first"));
        tree.add_command(Command::new("test"));
        tree.add_command(Command::new("build").with_description("second"));

        assert_eq!(tree.command_names(), vec!["build", "test"]);
        assert_eq!(tree.find_command("build").unwrap().description(), "second");

        assert!(tree.remove_command("build").is_some());
        assert!(tree.remove_command("build").is_none());
        assert_eq!(tree.command_names(), vec!["test"]);
    }

    #[test]
    fn test_execute_recurses_with_own_data_only() {
        let seen: Arc<Mutex<Vec<(Vec<String>, FlagValues, Vec<String>)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let deploy = Command::new("deploy")
            .with_option(
                CommandOption::configure(OptionConfig::new("env").with_type(ValueKind::String))
                    .unwrap(),
            )
            .with_callback(move |inv| {
                sink.lock().unwrap().push((
                    inv.path.to_vec(),
                    inv.data.clone(),
                    inv.args.to_vec(),
                ));
                Ok(())
            });
        let tree = Command::new("tool").with_option(verbose()).with_command(deploy);

        tree.execute(&args(&["-v", "deploy", "--env", "prod", "web"]))
            .unwrap();

        let calls = seen.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (path, data, rest) = &calls[0];
        assert_eq!(path, &args(&["tool", "deploy"]));
        assert_eq!(data.get("env"), Some(&FlagValue::from("prod")));
        assert!(!data.contains_key("verbose"));
        assert_eq!(rest, &args(&["web"]));
    }

    #[test]
    fn test_execute_without_callback_is_unresolved() {
        let tree = Command::new("tool").with_command(Command::new("build"));

        let err = tree.execute(&args(&["build"])).unwrap_err();
        assert!(matches!(err, WendellError::Unresolved { ref command } if command == "build"));
    }

    #[test]
    fn test_callback_error_is_propagated() {
        let tree = Command::new("tool").with_callback(|_| Err("boom".into()));

        let err = tree.execute(&[]).unwrap_err();
        assert!(matches!(err, WendellError::Callback { ref command, .. } if command == "tool"));
        assert_eq!(err.to_string(), "command 'tool' failed: boom");
    }

    #[test]
    fn test_configure_uses_map_keys_for_names() {
        let config = CommandConfig::new("tool")
            .with_option("verbose", OptionConfig::default().with_short("v"))
            .with_command(
                "deploy",
                CommandConfig::default().with_option(
                    "env",
                    OptionConfig::default().with_type(ValueKind::String),
                ),
            );

        let tree = Command::configure(config).unwrap();
        assert_eq!(tree.find_option("verbose").unwrap().short(), Some("-v"));
        let deploy = tree.find_command("deploy").unwrap();
        assert_eq!(deploy.find_option("env").unwrap().long(), "--env");
    }

    #[test]
    fn test_find_path() {
        let tree = Command::new("tool").with_command(
            Command::new("remote").with_command(Command::new("add")),
        );

        assert_eq!(tree.find_path(&["remote", "add"]).unwrap().name(), "add");
        assert!(tree.find_path(&["remote", "rm"]).is_none());
        assert_eq!(tree.find_path::<&str>(&[]).unwrap().name(), "tool");
    }

    #[test]
    fn test_option_sharing_long_spelling_replaces_earlier() {
        let tree = Command::new("tool")
            .with_option(
                CommandOption::configure(
                    OptionConfig::new("mode")
                        .with_type(ValueKind::String)
                        .with_default("fast"),
                )
                .unwrap(),
            )
            .with_option(verbose())
            .with_option(
                CommandOption::configure(
                    OptionConfig::new("profile")
                        .with_long("mode")
                        .with_type(ValueKind::String),
                )
                .unwrap(),
            );

        let names: Vec<&str> = tree.options().iter().map(CommandOption::name).collect();
        assert_eq!(names, vec!["profile", "verbose"]);

        let parsed = tree.parse(&args(&["--mode", "slow"]));
        assert_eq!(parsed.data.get("profile"), Some(&FlagValue::from("slow")));
        assert!(!parsed.data.contains_key("mode"));
    }
}
