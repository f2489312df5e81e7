use std::path::PathBuf;

use clap::Parser;
use engine_logging::LogDestination;

/// Observe a sequence of JSON endpoints and print every published snapshot.
#[derive(Parser, Debug)]
#[command(name = "fetch_app")]
#[command(version)]
pub struct Cli {
    /// Endpoints to observe, in order. Relative keys need `base_url` in the config.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// RON config file. Defaults to `./fetch_app.ron` when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Switch to the next key after this many milliseconds instead of waiting
    /// for the current cycle to settle.
    #[arg(long)]
    pub switch_after_ms: Option<u64>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "terminal")]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = "./engine.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }
}
