//! Help and usage rendering.
//!
//! Pure formatting: these functions only read command metadata and return
//! lines. Emitting them is the [`Printer`](crate::Printer)'s job.

use wendell_flags::ValueKind;

use crate::command::Command;
use crate::option::CommandOption;

/// Root metadata shared by every help page.
#[derive(Debug, Clone, Copy)]
pub struct HelpContext<'a> {
    pub bin: &'a str,
    pub title: &'a str,
    pub usage: &'a str,
}

const DESCRIPTION_GAP: &str = "     # ";

/// General help: title, usage template and the top-level command list.
///
/// # Examples
///
/// ```
/// use wendell_core::{general_help, Command, HelpContext};
///
/// let ctx = HelpContext { bin: "tool", title: "", usage: "tool COMMAND" };
/// let lines = general_help(&ctx, &[Command::new("build").with_description("Build it")]);
///
/// assert_eq!(lines[0], "Usage: tool COMMAND");
/// assert!(lines.contains(&"    build     # Build it".to_string()));
/// ```
pub fn general_help(ctx: &HelpContext<'_>, commands: &[Command]) -> Vec<String> {
    let mut lines = title_lines(ctx);
    lines.push(format!("Usage: {}", ctx.usage));
    lines.push(String::new());

    if !commands.is_empty() {
        lines.push("Commands:".to_string());
        lines.extend(commands.iter().map(command_line));
        lines.push(String::new());
        lines.push(format!(
            "Use '{} --help <command>' for command specific help",
            ctx.bin
        ));
    }

    lines
}

/// Help for one command: its usage (or its path when it declares none),
/// description, options and sub-commands.
pub fn command_help<S: AsRef<str>>(
    ctx: &HelpContext<'_>,
    path: &[S],
    command: &Command,
) -> Vec<String> {
    let mut lines = title_lines(ctx);

    let usage = if command.usage().is_empty() {
        path.iter()
            .map(|segment| segment.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        command.usage().to_string()
    };
    lines.push(format!("Usage: {} {usage}", ctx.bin));
    lines.push(String::new());

    if !command.description().is_empty() {
        lines.push(command.description().to_string());
        lines.push(String::new());
    }

    if !command.options().is_empty() {
        lines.push("Options:".to_string());
        lines.extend(command.options().iter().map(option_line));
        lines.push(String::new());
    }

    if !command.commands().is_empty() {
        lines.push("Commands:".to_string());
        lines.extend(command.commands().iter().map(command_line));
        lines.push(String::new());
    }

    lines
}

fn title_lines(ctx: &HelpContext<'_>) -> Vec<String> {
    if ctx.title.is_empty() {
        Vec::new()
    } else {
        vec![ctx.title.to_string(), String::new()]
    }
}

fn command_line(command: &Command) -> String {
    let mut line = format!("    {}", command.name());
    if !command.description().is_empty() {
        line.push_str(DESCRIPTION_GAP);
        line.push_str(command.description());
    }
    line
}

fn option_line(option: &CommandOption) -> String {
    let mut line = match option.short() {
        Some(short) => format!("    {short}, {}", option.long()),
        None => format!("    {}", option.long()),
    };
    if option.value_type() == ValueKind::String {
        line.push_str(" <string>");
    }

    let mut notes = option.description().to_string();
    if let Some(default) = option.default_value() {
        if !notes.is_empty() {
            notes.push(' ');
        }
        notes.push_str(&format!("(default: {default})"));
    }
    if !notes.is_empty() {
        line.push_str(DESCRIPTION_GAP);
        line.push_str(&notes);
    }
    line
}
