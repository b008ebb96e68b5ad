use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use super::{report_failure, required_arg, Command};
use crate::filesystem::{EntryMetadata, FileSystem};
use crate::shell::Shell;

const ENTRY_TIME_FORMAT: &str = "%m/%d/%Y  %I:%M %p";

/// Totals printed under a `dir` listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirSummary {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

impl DirSummary {
    /// Every listed entry; `.` and `..` are never part of a listing.
    pub fn entries(&self) -> u64 {
        self.files + self.dirs
    }
}

pub fn summarize(entries: &[EntryMetadata]) -> DirSummary {
    entries.iter().fold(DirSummary::default(), |mut summary, entry| {
        if entry.is_directory {
            summary.dirs += 1;
        } else {
            summary.files += 1;
            summary.bytes += entry.len;
        }
        summary
    })
}

pub(super) fn dir<FS: FileSystem>(shell: &mut Shell<FS>) -> io::Result<i32> {
    let listing = shell
        .filesystem()
        .current_directory()
        .and_then(|cwd| shell.filesystem().list_directory(&cwd).map(|entries| (cwd, entries)));

    let (cwd, mut entries) = match listing {
        Ok(listing) => listing,
        Err(e) => return report_failure(shell, "dir", &e),
    };
    entries.sort_by_key(EntryMetadata::name);

    let out = shell.console().out();
    write!(out, "\n Directory of {}\n\n", cwd.display())?;

    for entry in &entries {
        let stamp = DateTime::<Local>::from(entry.modified).format(ENTRY_TIME_FORMAT);
        if entry.is_directory {
            writeln!(out, "{}    <DIR>          {}", stamp, entry.name())?;
        } else {
            writeln!(out, "{}    {:>10} {}", stamp, entry.len, entry.name())?;
        }
    }

    let summary = summarize(&entries);
    writeln!(out, "\n     Total Files Listed:")?;
    writeln!(out, "              {} File(s)    {} bytes", summary.files, summary.bytes)?;
    writeln!(out, "              {} Dir(s)", summary.dirs)?;
    Ok(0)
}

pub(super) fn cd<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(target) = required_arg(shell, argv, "cd: Missing argument")? else {
        return Ok(1);
    };

    if let Err(e) = shell.filesystem().change_directory(Path::new(target)) {
        return report_failure(shell, "cd", &e);
    }

    // The move already happened; only the confirmation is lost if this fails.
    if let Ok(cwd) = shell.filesystem().current_directory() {
        writeln!(shell.console().out(), "Now in: {}", cwd.display())?;
    }
    Ok(0)
}

pub(super) fn mkdir<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(name) = required_arg(shell, argv, "mkdir: Missing folder name")? else {
        return Ok(1);
    };

    match shell.filesystem().create_directory(Path::new(name)) {
        Ok(()) => {
            writeln!(shell.console().out(), "Directory '{}' created", name)?;
            Ok(0)
        }
        Err(e) => report_failure(shell, "mkdir", &e),
    }
}

pub(super) fn rmdir<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(name) = required_arg(shell, argv, "rmdir: Missing folder name")? else {
        return Ok(1);
    };

    match shell.filesystem().remove_directory(Path::new(name)) {
        Ok(()) => {
            writeln!(shell.console().out(), "Directory '{}' removed", name)?;
            Ok(0)
        }
        Err(e) => report_failure(shell, "rmdir", &e),
    }
}

pub(super) fn touch<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(name) = required_arg(shell, argv, "touch: Missing filename")? else {
        return Ok(1);
    };
    let path = Path::new(name);

    let touched = shell.filesystem().exists(path).and_then(|existed| {
        shell.filesystem().create_file(path)?;
        if existed {
            shell.filesystem().set_modified_time(path, SystemTime::now())?;
        }
        Ok(existed)
    });

    match touched {
        Ok(false) => {
            writeln!(shell.console().out(), "File '{}' created", name)?;
            Ok(0)
        }
        Ok(true) => {
            writeln!(shell.console().out(), "File '{}' updated", name)?;
            Ok(0)
        }
        Err(e) => report_failure(shell, "touch", &e),
    }
}

pub(super) fn del<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(name) = required_arg(shell, argv, "del: Missing filename")? else {
        return Ok(1);
    };

    match shell.filesystem().delete_file(Path::new(name)) {
        Ok(()) => {
            writeln!(shell.console().out(), "File '{}' deleted", name)?;
            Ok(0)
        }
        Err(e) => report_failure(shell, "del", &e),
    }
}

pub(super) fn type_file<FS: FileSystem>(shell: &mut Shell<FS>, argv: &[&str]) -> io::Result<i32> {
    let Some(name) = required_arg(shell, argv, "type: Missing filename")? else {
        return Ok(1);
    };

    match shell.filesystem().read_file(Path::new(name)) {
        Ok(contents) => {
            let out = shell.console().out();
            out.write_all(&contents)?;
            out.flush()?;
            Ok(0)
        }
        Err(e) => report_failure(shell, "type", &e),
    }
}

pub(super) fn cls<FS: FileSystem>(shell: &mut Shell<FS>) -> io::Result<i32> {
    let out = shell.console().out();
    write!(out, "\x1b[2J\x1b[H")?;
    out.flush()?;
    Ok(0)
}

pub(super) fn help<FS: FileSystem>(shell: &mut Shell<FS>) -> io::Result<i32> {
    let out = shell.console().out();
    writeln!(out, "Available commands:")?;
    for command in Command::ALL {
        let (usage, description) = command.synopsis();
        writeln!(out, "  {:<18} - {}", usage, description)?;
    }
    writeln!(out, "  {:<18} - {}", "exit", "Exit shell")?;
    Ok(0)
}
