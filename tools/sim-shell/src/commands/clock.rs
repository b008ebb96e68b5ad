use std::io::{self, Write};

use crate::clock::{ClockUpdate, UpdateKind};
use crate::filesystem::FileSystem;
use crate::shell::Shell;

pub const DATE_FORMAT: &str = "%m/%d/%Y";
pub const TIME_FORMAT: &str = "%I:%M:%S %p";

pub(super) fn date<FS: FileSystem>(shell: &mut Shell<FS>) -> io::Result<i32> {
    adjust(shell, UpdateKind::Date)
}

pub(super) fn time<FS: FileSystem>(shell: &mut Shell<FS>) -> io::Result<i32> {
    adjust(shell, UpdateKind::Time)
}

/// Shows the simulated value, then optionally reads and applies an override.
fn adjust<FS: FileSystem>(shell: &mut Shell<FS>, kind: UpdateKind) -> io::Result<i32> {
    let (format, entry_prompt, updated) = match kind {
        UpdateKind::Date => (DATE_FORMAT, "Enter date (MM DD YYYY): ", "Date updated to"),
        UpdateKind::Time => (TIME_FORMAT, "Enter time (HH MM SS): ", "Time updated to"),
    };

    let current = shell.clock().current();
    writeln!(shell.console().out(), "Current {} (simulated): {}", kind, current.format(format))?;

    let Some(answer) = read_answer(shell, &format!("Change {}? (y/n): ", kind))? else {
        return Ok(1);
    };
    if !is_affirmative(&answer) {
        return Ok(0);
    }

    let entry = shell.console().prompt(entry_prompt)?;
    let Some(parts) = entry.as_deref().and_then(parse_components) else {
        writeln!(shell.console().out(), "Invalid input format")?;
        return Ok(0);
    };

    match shell.clock().propose(ClockUpdate::from_parts(kind, parts)) {
        Ok(value) => {
            writeln!(shell.console().out(), "{}: {}", updated, value.format(format))?;
            Ok(0)
        }
        Err(e) => {
            writeln!(shell.console().out(), "{}", e)?;
            Ok(1)
        }
    }
}

/// Prompts once, then keeps reading past blank lines until an answer arrives.
fn read_answer<FS: FileSystem>(
    shell: &mut Shell<FS>,
    question: &str,
) -> io::Result<Option<String>> {
    let mut line = shell.console().prompt(question)?;
    while line.as_deref().is_some_and(|answer| answer.trim().is_empty()) {
        line = shell.console().read_line()?;
    }
    Ok(line)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))
}

/// Exactly three whitespace-separated integers.
fn parse_components(line: &str) -> Option<[i64; 3]> {
    let numbers = line
        .split_whitespace()
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    numbers.try_into().ok()
}
