//! Output boundary.
//!
//! The parser hands finished lines to a [`Printer`] together with the program
//! name. Diagnostics (usage errors, version) are sent `prefixed`; help text is
//! not. How a prefix looks is up to the printer.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use chrono::Local;

/// Receives rendered lines.
pub trait Printer: Send + Sync {
    fn print(&self, bin: &str, lines: &[String], prefixed: bool);
}

/// Formats `line` as `[bin] HH:MM:SS line` using local time.
///
/// # Examples
///
/// ```
/// let line = wendell_core::date_prefix("tool", "ready");
/// assert!(line.starts_with("[tool] "));
/// assert!(line.ends_with(" ready"));
/// ```
pub fn date_prefix(bin: &str, line: &str) -> String {
    format!("[{bin}] {} {line}", Local::now().format("%H:%M:%S"))
}

/// Writes to stdout, applying [`date_prefix`] to prefixed lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrinter;

impl Printer for ConsolePrinter {
    fn print(&self, bin: &str, lines: &[String], prefixed: bool) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            let written = if prefixed {
                writeln!(out, "{}", date_prefix(bin, line))
            } else {
                writeln!(out, "{line}")
            };
            // Closed stdout (e.g. piped into `head`).
            if written.is_err() {
                return;
            }
        }
    }
}

/// Collects lines in memory, without prefixes.
///
/// # Examples
///
/// ```
/// use wendell_core::{MemoryPrinter, Printer};
///
/// let printer = MemoryPrinter::new();
/// printer.print("tool", &["one".to_string()], true);
/// assert_eq!(printer.lines(), vec!["one".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryPrinter {
    lines: Mutex<Vec<String>>,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the collected lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Collected lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

impl Printer for MemoryPrinter {
    fn print(&self, _bin: &str, lines: &[String], _prefixed: bool) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(lines.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_prefix_shape() {
        let line = date_prefix("tool", "hello");
        let rest = line.strip_prefix("[tool] ").unwrap();
        let (time, text) = rest.split_once(' ').unwrap();

        assert_eq!(text, "hello");
        assert_eq!(time.split(':').count(), 3);
    }

    #[test]
    fn test_memory_printer_take_drains() {
        let printer = MemoryPrinter::new();
        printer.print("tool", &["a".to_string(), "b".to_string()], false);

        assert_eq!(printer.take(), vec!["a".to_string(), "b".to_string()]);
        assert!(printer.lines().is_empty());
    }
}
