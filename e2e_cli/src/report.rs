//! CSV report files, one directory per pair.
//!
//! ```text
//! <out>/<prefix><index>/RAW_DATA.csv   aligned raw timestamps
//! <out>/<prefix><index>/M2M.csv        metric tables, in sheet order
//! <out>/<prefix><index>/G2G.csv
//! <out>/<prefix><index>/E2E.csv
//! <out>/<prefix><index>/PID.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use e2e_core::error::{CoreError, Result};
use e2e_core::report::{MetricTable, PairReport, ReportSink};
use e2e_core::{Summary, TrialRow};

pub const RAW_SHEET: &str = "RAW_DATA";
pub const METRIC_HEADER: [&str; 8] = ["LATENCY", "JITTER", "", "", "MIN", "MAX", "AVERAGE", "STDEV"];
/// Written in place of the four summary cells when a summary is undefined.
pub const UNDEFINED: &str = "undefined";

/// Writes every emitted report under `out_dir/<prefix><index>/`.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    out_dir: PathBuf,
    prefix: String,
}

impl CsvReportSink {
    pub fn new(out_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn pair_dir(&self, index: usize) -> PathBuf {
        self.out_dir.join(format!("{}{index}", self.prefix))
    }

    /// Write all five files for `report` and return the directory holding them.
    pub fn write(&self, report: &PairReport) -> Result<PathBuf> {
        let dir = self.pair_dir(report.index);
        fs::create_dir_all(&dir)
            .map_err(|e| CoreError::Sink(format!("create {}: {e}", dir.display())))?;

        write_raw(&dir.join(format!("{RAW_SHEET}.csv")), &report.trials)?;
        for table in report.tables() {
            let path = dir.join(format!("{}.csv", table.kind().sheet()));
            write_metric(&path, table)?;
        }
        tracing::debug!(pair = report.index, dir = %dir.display(), "report written");
        Ok(dir)
    }
}

impl ReportSink for CsvReportSink {
    fn emit(&mut self, report: &PairReport) -> Result<()> {
        self.write(report).map(|_| ())
    }
}

fn sink_err(path: &Path) -> impl Fn(csv::Error) -> CoreError + '_ {
    move |e| CoreError::Sink(format!("{}: {e}", path.display()))
}

fn write_raw(path: &Path, trials: &[TrialRow]) -> Result<()> {
    let mut w = csv::Writer::from_path(path).map_err(sink_err(path))?;
    w.write_record(TrialRow::COLUMNS).map_err(sink_err(path))?;
    for row in trials {
        w.write_record(row.values().iter().map(ToString::to_string))
            .map_err(sink_err(path))?;
    }
    w.flush()
        .map_err(|e| CoreError::Sink(format!("{}: {e}", path.display())))?;
    Ok(())
}

fn summary_cells(label: &str, summary: Option<&Summary>) -> [String; 6] {
    let [min, max, mean, stdev]: [String; 4] = match summary {
        Some(s) => s.as_array().map(|v| v.to_string()),
        None => std::array::from_fn(|_| UNDEFINED.to_string()),
    };
    [String::new(), label.to_string(), min, max, mean, stdev]
}

/// Data rows hold (value, jitter); rows 1 and 2 also carry the "Latency" and
/// "Jitter" summaries. Short series are padded so both summaries are present.
fn write_metric(path: &Path, table: &MetricTable) -> Result<()> {
    let mut w = csv::Writer::from_path(path).map_err(sink_err(path))?;
    w.write_record(METRIC_HEADER).map_err(sink_err(path))?;

    let series = &table.series;
    let rows = series.len().max(2);
    for i in 0..rows {
        let value = series.values.get(i).map(ToString::to_string).unwrap_or_default();
        let jitter = series.jitter.get(i).map(ToString::to_string).unwrap_or_default();
        let tail = match i {
            0 => summary_cells("Latency", table.latency.as_ref()),
            1 => summary_cells("Jitter", table.jitter.as_ref()),
            _ => Default::default(),
        };
        let mut record = Vec::with_capacity(METRIC_HEADER.len());
        record.push(value);
        record.push(jitter);
        record.extend(tail);
        w.write_record(&record).map_err(sink_err(path))?;
    }
    w.flush()
        .map_err(|e| CoreError::Sink(format!("{}: {e}", path.display())))?;
    Ok(())
}
