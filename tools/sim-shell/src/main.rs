use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use sim_shell::clock::DEFAULT_CLOCK_FILE;
use sim_shell::{ClockStore, Console, RealFileSystem, Shell};

#[derive(Parser, Debug)]
#[command(name = "sim-shell")]
#[command(about = "A DOS-style command shell with a persisted simulated clock", long_about = None)]
struct Cli {
    /// File holding the simulated clock
    /// (defaults to $SIM_SHELL_CLOCK_FILE or ./simulated_time.dat)
    #[arg(long)]
    clock_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_clock_file(clock_file: Option<PathBuf>) -> Result<PathBuf> {
    let path = match clock_file {
        Some(path) => path,
        None => match std::env::var("SIM_SHELL_CLOCK_FILE") {
            Ok(env_path) => PathBuf::from(env_path),
            Err(_) => PathBuf::from(DEFAULT_CLOCK_FILE),
        },
    };

    // Anchor to the startup directory so `cd` does not move the clock file
    if path.is_absolute() {
        Ok(path)
    } else {
        let current_dir = std::env::current_dir()
            .context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level = if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    let clock_file = resolve_clock_file(cli.clock_file)?;

    let filesystem = RealFileSystem::new();
    let clock = ClockStore::new(filesystem.clone(), clock_file);
    log::info!("Using clock file: {}", clock.path().display());
    let mut shell = Shell::new(filesystem, clock, Console::stdio());

    shell.run().context("Console I/O failed")?;

    Ok(())
}
