//! Test and helper sinks for e2e_core

use crate::error::Result;
use crate::report::{PairReport, ReportSink};

/// Discards every report; useful when only the run summary matters.
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&mut self, _report: &PairReport) -> Result<()> {
        Ok(())
    }
}

/// Keeps every emitted report in memory, in emission order.
#[derive(Default)]
pub struct CollectingSink {
    pub reports: Vec<PairReport>,
}

impl ReportSink for CollectingSink {
    fn emit(&mut self, report: &PairReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}
