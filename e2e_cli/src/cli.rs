//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "e2e",
    version,
    about = "Correlate station and vehicle logs into latency/jitter reports"
)]
pub struct Cli {
    /// Path to config TOML (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines and print results/errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Occurrence counting for GPIO and motion lines.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CounterArg {
    /// GPIO and motion lines each keep their own ordinal
    PerChannel,
    /// GPIO and motion lines advance one shared position
    Interleaved,
}

impl From<CounterArg> for e2e_config::CounterMode {
    fn from(c: CounterArg) -> Self {
        match c {
            CounterArg::PerChannel => e2e_config::CounterMode::PerChannel,
            CounterArg::Interleaved => e2e_config::CounterMode::Interleaved,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every numbered log pair in the input directory
    Run {
        /// Directory with e2e_station_<j>.txt / e2e_vehicle_<j>.txt (overrides input.dir)
        #[arg(long, value_name = "DIR")]
        input_dir: Option<PathBuf>,
        /// Directory receiving output_<j>/ report folders (overrides output.dir)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// First pair index to probe (overrides input.start_index)
        #[arg(long, value_name = "N")]
        start_index: Option<usize>,
        /// Stop after N pairs (overrides input.max_pairs)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        max_pairs: Option<u64>,
        /// Occurrence counting mode (overrides parser.counter)
        #[arg(long, value_enum, value_name = "MODE")]
        counter: Option<CounterArg>,
    },
    /// Process one explicit station/vehicle log pair as pair 0
    Pair {
        /// Station log file
        #[arg(long, value_name = "FILE")]
        station: PathBuf,
        /// Vehicle log file
        #[arg(long, value_name = "FILE")]
        vehicle: PathBuf,
        /// Directory receiving the output_0/ report folder (overrides output.dir)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Occurrence counting mode (overrides parser.counter)
        #[arg(long, value_enum, value_name = "MODE")]
        counter: Option<CounterArg>,
    },
}
