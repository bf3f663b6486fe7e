//! Per-pair report handed to the rendering layer.

use crate::error::Result;
use crate::metrics::{MetricKind, MetricSeries, TrialRow};
use crate::stats::Summary;

/// A metric series with its summary cells.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub series: MetricSeries,
    /// Summary of every latency value; `None` when there are no trials.
    pub latency: Option<Summary>,
    /// Summary of the jitter values after the first; `None` with fewer than two trials.
    pub jitter: Option<Summary>,
}

impl MetricTable {
    pub fn new(series: MetricSeries) -> Self {
        let latency = Summary::of_abs(&series.values).ok();
        let jitter = series
            .jitter
            .get(1..)
            .and_then(|rest| Summary::of_abs(rest).ok());
        if latency.is_none() || jitter.is_none() {
            tracing::warn!(
                metric = %series.kind,
                trials = series.len(),
                latency_defined = latency.is_some(),
                jitter_defined = jitter.is_some(),
                "summary undefined for too few trials"
            );
        }
        Self {
            series,
            latency,
            jitter,
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.series.kind
    }
}

/// Counters describing how a pair was reduced to its trial table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairDiagnostics {
    /// Occurrence indices excluded by station GPIO flags.
    pub excluded: Vec<u32>,
    /// Vehicle LED occurrences flagged MULTIPLE/NONE (not applied).
    pub led_flags: Vec<u32>,
    pub station_motion: usize,
    pub station_gpio: usize,
    pub vehicle_motion: usize,
    pub vehicle_led: usize,
    pub skipped_station_motion: usize,
    pub skipped_vehicle_motion: usize,
    pub skipped_vehicle_led: usize,
}

impl PairDiagnostics {
    /// Records beyond the trial count that were dropped by alignment.
    pub fn truncated(&self, trials: usize) -> usize {
        [self.station_motion, self.station_gpio, self.vehicle_motion]
            .iter()
            .map(|n| n.saturating_sub(trials))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairReport {
    pub index: usize,
    pub trials: Vec<TrialRow>,
    pub m2m: MetricTable,
    pub g2g: MetricTable,
    pub e2e: MetricTable,
    pub pid_tr: MetricTable,
    pub diagnostics: PairDiagnostics,
}

impl PairReport {
    pub fn from_trials(index: usize, trials: Vec<TrialRow>, diagnostics: PairDiagnostics) -> Self {
        let table = |kind| MetricTable::new(MetricSeries::from_trials(kind, &trials));
        let m2m = table(MetricKind::M2m);
        let g2g = table(MetricKind::G2g);
        let e2e = table(MetricKind::E2e);
        let pid_tr = table(MetricKind::PidTr);
        Self {
            index,
            trials,
            m2m,
            g2g,
            e2e,
            pid_tr,
            diagnostics,
        }
    }

    pub fn trial_count(&self) -> usize {
        self.trials.len()
    }

    pub fn table(&self, kind: MetricKind) -> &MetricTable {
        match kind {
            MetricKind::M2m => &self.m2m,
            MetricKind::G2g => &self.g2g,
            MetricKind::E2e => &self.e2e,
            MetricKind::PidTr => &self.pid_tr,
        }
    }

    /// Tables in report sheet order.
    pub fn tables(&self) -> [&MetricTable; 4] {
        MetricKind::ALL.map(|k| self.table(k))
    }
}

/// Consumer of finished pair reports (file writer, JSON printer, test collector).
pub trait ReportSink {
    fn emit(&mut self, report: &PairReport) -> Result<()>;
}

impl<K: ReportSink + ?Sized> ReportSink for &mut K {
    fn emit(&mut self, report: &PairReport) -> Result<()> {
        (**self).emit(report)
    }
}
