use std::io::{self, Write};

use crate::clock::ClockStore;
use crate::commands::{self, Dispatch};
use crate::console::Console;
use crate::filesystem::FileSystem;

/// Command name plus at most nine arguments.
pub const MAX_TOKENS: usize = 10;

pub const PROMPT: &str = "> ";

/// What the read loop should do after one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

/// Splits a line on whitespace, dropping tokens past `MAX_TOKENS`.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().take(MAX_TOKENS).collect()
}

pub struct Shell<FS: FileSystem> {
    filesystem: FS,
    clock: ClockStore<FS>,
    console: Console,
}

impl<FS: FileSystem> Shell<FS> {
    pub fn new(filesystem: FS, clock: ClockStore<FS>, console: Console) -> Self {
        Self {
            filesystem,
            clock,
            console,
        }
    }

    pub fn filesystem(&self) -> &FS {
        &self.filesystem
    }

    pub fn clock(&mut self) -> &mut ClockStore<FS> {
        &mut self.clock
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn dispatch(&mut self, argv: &[&str]) -> io::Result<Dispatch> {
        commands::dispatch(self, argv)
    }

    pub fn execute_line(&mut self, line: &str) -> io::Result<LineOutcome> {
        let argv = tokenize(line);
        let Some(&name) = argv.first() else {
            return Ok(LineOutcome::Continue);
        };

        if name == "exit" {
            return Ok(LineOutcome::Exit);
        }

        if self.dispatch(&argv)? == Dispatch::Unknown {
            writeln!(self.console.out(), "Unknown command: {}", name)?;
        }
        Ok(LineOutcome::Continue)
    }

    /// Reads and executes lines until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        while let Some(line) = self.console.prompt(PROMPT)? {
            if self.execute_line(&line)? == LineOutcome::Exit {
                break;
            }
        }
        log::debug!("Read loop finished");
        Ok(())
    }
}
