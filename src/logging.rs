//! Logger setup. The store reports swallowed failures through `log`, so this
//! is where those diagnostics end up.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

/// Destination for log records.
pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the terminal UI is drawing.
    File(PathBuf),
}

/// Install the global logger. `level` is the default filter and `RUST_LOG`
/// overrides it.
pub fn init_logging(level: &str, target: LogTarget) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let LogTarget::File(path) = target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("failed to install logger")
}
