use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use wendell_core::{CallbackError, CommandParser, Definition, FlagValues, Invocation, Outcome};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "wendell")]
#[command(about = "Resolve, render and dry-run command definitions")]
#[command(version, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how an argument vector resolves, without running anything.
    Resolve(ResolveArgs),
    /// Render the general help, or the help for a command path.
    Help(HelpArgs),
    /// Check that a definition builds into a valid command tree.
    Validate(ValidateArgs),
    /// Dispatch an argument vector, printing each invocation as JSON.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct DefinitionArg {
    /// Definition file (`.json` is read as JSON, anything else as YAML).
    #[arg(long, short = 'd')]
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    source: DefinitionArg,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to resolve, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    source: DefinitionArg,
    /// Command path (e.g. `remote add`); empty for the general help.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    source: DefinitionArg,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    source: DefinitionArg,
    /// Arguments to dispatch, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// What a bound callback prints for each invocation.
#[derive(Debug, Serialize)]
struct InvocationRecord<'a> {
    path: &'a [String],
    data: &'a FlagValues,
    args: &'a [String],
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
        Command::Run(args) => run_run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let parser = load_parser(&args.source.definition)?;
    let resolution = parser.resolve(&args.args);
    println!("{}", format_output(&resolution, args.format)?);
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let parser = load_parser(&args.source.definition)?;
    if !args.path.is_empty() && parser.find_path(&args.path).is_none() {
        return Err(format!("Unknown command path '{}'", args.path.join(" ")));
    }

    for line in parser.help_lines(&args.path) {
        println!("{line}");
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let parser = load_parser(&args.source.definition)?;
    println!(
        "Definition '{}' is valid: {} top-level command(s).",
        args.source.definition.display(),
        parser.commands().len()
    );
    Ok(())
}

fn run_run(args: RunArgs) -> Result<(), String> {
    let mut parser = load_parser(&args.source.definition)?;
    bind_callbacks(&mut parser);

    match parser.parse(&args.args).map_err(|err| err.to_string())? {
        Outcome::Usage(problem) => Err(problem.to_string()),
        outcome => {
            debug!(?outcome, "dispatch finished");
            Ok(())
        }
    }
}

fn load_parser(path: &Path) -> Result<CommandParser, String> {
    let definition = Definition::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    debug!(
        path = %path.display(),
        commands = definition.commands.len(),
        "loaded definition"
    );
    definition
        .build()
        .map_err(|err| format!("Invalid definition '{}': {err}", path.display()))
}

/// Attaches [`print_invocation`] to every command in the tree, so any
/// resolved path can be dispatched.
fn bind_callbacks(parser: &mut CommandParser) {
    for name in parser.root().command_names() {
        if let Some(command) = parser.get_command_mut(&name) {
            bind_subtree(command);
        }
    }
}

fn bind_subtree(command: &mut wendell_core::Command) {
    command.set_callback(print_invocation);
    for name in command.command_names() {
        if let Some(child) = command.find_command_mut(&name) {
            bind_subtree(child);
        }
    }
}

fn print_invocation(invocation: &Invocation<'_>) -> Result<(), CallbackError> {
    let record = InvocationRecord {
        path: invocation.path,
        data: invocation.data,
        args: invocation.args,
    };
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize JSON: {err}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|err| format!("Failed to serialize YAML: {err}"))
        }
    }
}
