pub mod clock;
pub mod commands;
pub mod console;
pub mod filesystem;
pub mod shell;

pub mod mock;

pub use clock::{ClockError, ClockStore, ClockUpdate, SystemClock, TimeSource};
pub use commands::{Command, Dispatch};
pub use console::Console;
pub use filesystem::{EntryMetadata, FileSystem, FileSystemError, RealFileSystem};
pub use shell::{LineOutcome, Shell};
