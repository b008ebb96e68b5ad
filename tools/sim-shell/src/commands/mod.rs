//! Built-in command table and routing.

mod clock;
mod files;

pub use files::{summarize, DirSummary};

use std::io::{self, Write};

use crate::filesystem::{FileSystem, FileSystemError};
use crate::shell::Shell;

/// Result of routing one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The command exists and ran; carries its exit code.
    Handled(i32),
    /// No built-in has that name.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Dir,
    Cd,
    CdParent,
    Mkdir,
    Rmdir,
    Touch,
    Del,
    Type,
    Cls,
    Help,
    Date,
    Time,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Dir,
        Command::Cd,
        Command::CdParent,
        Command::Mkdir,
        Command::Rmdir,
        Command::Touch,
        Command::Del,
        Command::Type,
        Command::Cls,
        Command::Help,
        Command::Date,
        Command::Time,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Dir => "dir",
            Command::Cd => "cd",
            Command::CdParent => "cd..",
            Command::Mkdir => "mkdir",
            Command::Rmdir => "rmdir",
            Command::Touch => "touch",
            Command::Del => "del",
            Command::Type => "type",
            Command::Cls => "cls",
            Command::Help => "help",
            Command::Date => "date",
            Command::Time => "time",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Usage line and one-line description, as shown by `help`.
    pub fn synopsis(self) -> (&'static str, &'static str) {
        match self {
            Command::Dir => ("dir", "List files and folders"),
            Command::Cd => ("cd <dir>", "Change directory"),
            Command::CdParent => ("cd..", "Go to parent directory"),
            Command::Mkdir => ("mkdir <dir>", "Create directory"),
            Command::Rmdir => ("rmdir <dir>", "Remove directory"),
            Command::Touch => ("touch <file>", "Create empty file"),
            Command::Del => ("del <file>", "Delete file"),
            Command::Type => ("type <file>", "Display file contents"),
            Command::Cls => ("cls", "Clear screen"),
            Command::Help => ("help", "Show this help"),
            Command::Date => ("date", "Show or change the simulated date"),
            Command::Time => ("time", "Show or change the simulated time"),
        }
    }

    fn run<FS: FileSystem>(self, shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
        match self {
            Command::Dir => files::dir(shell),
            Command::Cd => files::cd(shell, argv),
            Command::CdParent => files::cd(shell, &["cd", ".."]),
            Command::Mkdir => files::mkdir(shell, argv),
            Command::Rmdir => files::rmdir(shell, argv),
            Command::Touch => files::touch(shell, argv),
            Command::Del => files::del(shell, argv),
            Command::Type => files::type_file(shell, argv),
            Command::Cls => files::cls(shell),
            Command::Help => files::help(shell),
            Command::Date => clock::date(shell),
            Command::Time => clock::time(shell),
        }
    }
}

/// Routes `argv` (whose first element is the command name) to its handler.
///
/// The `io::Error` case is reserved for failures of the console itself;
/// filesystem failures are reported by the handler and turned into exit code 1.
pub fn dispatch<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<Dispatch> {
    let Some(command) = argv.first().and_then(|name| Command::from_name(name)) else {
        return Ok(Dispatch::Unknown);
    };

    let code = command.run(shell, argv)?;
    log::debug!("{} exited with {}", command.name(), code);
    Ok(Dispatch::Handled(code))
}

/// Returns `argv[1]`, or prints `usage` to the error stream.
fn required_arg<'a, FS: FileSystem>(
    shell: &mut Shell<FS>,
    argv: &[&'a str],
    usage: &str,
) -> io::Result<Option<&'a str>> {
    match argv.get(1) {
        Some(arg) => Ok(Some(*arg)),
        None => {
            writeln!(shell.console().err(), "{}", usage)?;
            Ok(None)
        }
    }
}

fn report_failure<FS: FileSystem>(
    shell: &mut Shell<FS>,
    command: &str,
    error: &FileSystemError,
) -> io::Result<i32> {
    log::info!("{} failed: {:?}", command, error);
    writeln!(shell.console().err(), "{}: {}", command, error)?;
    Ok(1)
}
