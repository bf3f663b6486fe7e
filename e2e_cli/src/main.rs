mod cli;
mod error_fmt;
mod logging;
mod report;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use e2e_config::Config;
use eyre::Result;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::Overrides;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => e2e_config::load_file(path)?,
        None => Config::default(),
    };
    let _file_guard = logging::init_tracing(cli.json, &cli.log_level, &cfg.logging)?;

    let result = execute(cli, &cfg);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "run failed");
    }
    result
}

fn execute(cli: Cli, cfg: &Config) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler; continuing without it");
        }
    }

    match cli.cmd {
        Commands::Run {
            input_dir,
            output_dir,
            start_index,
            max_pairs,
            counter,
        } => {
            let overrides = Overrides {
                input_dir,
                output_dir,
                start_index,
                max_pairs: max_pairs.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
                counter: counter.map(Into::into),
            };
            run::run_dir(cfg, &overrides, cli.json, &shutdown)?;
        }
        Commands::Pair {
            station,
            vehicle,
            output_dir,
            counter,
        } => {
            let overrides = Overrides {
                output_dir,
                counter: counter.map(Into::into),
                ..Overrides::default()
            };
            run::run_pair(cfg, &station, &vehicle, &overrides, cli.json, &shutdown)?;
        }
    }
    Ok(())
}
