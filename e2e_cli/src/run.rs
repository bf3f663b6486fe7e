//! Command execution: source/sink wiring, per-pair console output.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use e2e_config::Config;
use e2e_core::error::Result;
use e2e_core::report::{MetricTable, PairReport, ReportSink};
use e2e_core::source_error::map_source_error;
use e2e_core::{RunParams, RunSummary, Summary};
use e2e_io::{DirPairSource, MemoryPairSource};
use e2e_traits::RawPair;
use eyre::WrapErr;
use serde_json::{Value, json};

use crate::report::CsvReportSink;

/// CLI values that override the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub start_index: Option<usize>,
    pub max_pairs: Option<usize>,
    pub counter: Option<e2e_config::CounterMode>,
}

impl Overrides {
    fn apply(&self, cfg: &Config) -> RunParams {
        let mut params = RunParams::from(cfg);
        if let Some(c) = self.counter {
            params.counter_mode = c.into();
        }
        if let Some(s) = self.start_index {
            params.start_index = s;
        }
        if self.max_pairs.is_some() {
            params.max_pairs = self.max_pairs;
        }
        params
    }

    fn output_dir(&self, cfg: &Config) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&cfg.output.dir))
    }
}

/// Writes the CSV files, then prints one result line per pair.
struct ConsoleSink {
    files: CsvReportSink,
    json: bool,
}

impl ReportSink for ConsoleSink {
    fn emit(&mut self, report: &PairReport) -> Result<()> {
        let dir = self.files.write(report)?;
        if self.json {
            println!("{}", pair_json(report, &dir));
        } else {
            println!("{}", pair_line(report, &dir));
        }
        Ok(())
    }
}

fn summary_json(summary: Option<&Summary>) -> Value {
    summary.map_or(Value::Null, |s| {
        json!({ "min": s.min, "max": s.max, "mean": s.mean, "stdev": s.stdev })
    })
}

fn table_json(table: &MetricTable) -> Value {
    json!({
        "latency": summary_json(table.latency.as_ref()),
        "jitter": summary_json(table.jitter.as_ref()),
    })
}

pub fn pair_json(report: &PairReport, dir: &Path) -> Value {
    let d = &report.diagnostics;
    json!({
        "pair": report.index,
        "trials": report.trial_count(),
        "excluded": d.excluded,
        "led_flags": d.led_flags,
        "truncated": d.truncated(report.trial_count()),
        "report_dir": dir.display().to_string(),
        "metrics": {
            "m2m": table_json(&report.m2m),
            "g2g": table_json(&report.g2g),
            "e2e": table_json(&report.e2e),
            "pid_tr": table_json(&report.pid_tr),
        },
    })
}

pub fn pair_line(report: &PairReport, dir: &Path) -> String {
    let mean = |t: &MetricTable| {
        t.latency
            .map_or_else(|| "undefined".to_string(), |s| format!("{:.6}", s.mean))
    };
    format!(
        "pair {}: {} trial(s), {} excluded, m2m avg {} s, e2e avg {} s -> {}",
        report.index,
        report.trial_count(),
        report.diagnostics.excluded.len(),
        mean(&report.m2m),
        mean(&report.e2e),
        dir.display()
    )
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        println!(
            "{}",
            json!({ "pairs_processed": summary.pairs_processed, "next_index": summary.next_index })
        );
    } else {
        println!("processed {} pair(s)", summary.pairs_processed);
    }
}

/// `run`: walk numbered pairs in the input directory until one is missing.
pub fn run_dir(
    cfg: &Config,
    overrides: &Overrides,
    json: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<RunSummary> {
    let dir = overrides
        .input_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.input.dir));
    let mut source = DirPairSource::with_patterns(
        &dir,
        &cfg.input.station_pattern,
        &cfg.input.vehicle_pattern,
    )
    .wrap_err("input patterns")?;
    let mut sink = ConsoleSink {
        files: CsvReportSink::new(overrides.output_dir(cfg), &cfg.output.prefix),
        json,
    };
    let params = overrides.apply(cfg);

    tracing::info!(
        input = %dir.display(),
        start = params.start_index,
        max_pairs = ?params.max_pairs,
        counter = ?params.counter_mode,
        "run start"
    );
    let summary = e2e_core::run(&mut source, &mut sink, &params, Some(shutdown))?;
    tracing::info!(
        processed = summary.pairs_processed,
        next_index = summary.next_index,
        "run complete"
    );
    print_summary(&summary, json);
    Ok(summary)
}

/// `pair`: process one explicit station/vehicle pair as index 0.
pub fn run_pair(
    cfg: &Config,
    station: &Path,
    vehicle: &Path,
    overrides: &Overrides,
    json: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<RunSummary> {
    let read = |path: &Path| e2e_io::read_log(path).map_err(|e| map_source_error(&e));
    let station_text = read(station)?;
    let vehicle_text = read(vehicle)?;

    let mut source: MemoryPairSource = std::iter::once(RawPair::new(station_text, vehicle_text)).collect();
    let mut sink = ConsoleSink {
        files: CsvReportSink::new(overrides.output_dir(cfg), &cfg.output.prefix),
        json,
    };
    let params = RunParams {
        start_index: 0,
        max_pairs: Some(1),
        ..overrides.apply(cfg)
    };
    let summary = e2e_core::run(&mut source, &mut sink, &params, Some(shutdown))
        .wrap_err_with(|| format!("{} + {}", station.display(), vehicle.display()))?;
    print_summary(&summary, json);
    Ok(summary)
}
