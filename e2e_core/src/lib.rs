#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core correlation logic (storage-agnostic).
//!
//! This crate pairs a station log with a vehicle log of the same motion trials
//! and derives latency and jitter metrics. Logs arrive through the
//! `e2e_traits::PairSource` trait; reports leave through [`ReportSink`].
//!
//! ## Pipeline
//!
//! - **Classifier**: tags a line by marker (`classify` module)
//! - **Flag resolver**: station GPIO `MULTIPLE`/`NONE` occurrences become an
//!   exclusion set (`exclusion` module)
//! - **Parser**: per-log value sequences with exclusions applied (`parser` module)
//! - **Aligner**: positional zip and the m2m / g2g / e2e / pid_tr metrics
//!   (`metrics` module)
//! - **Report**: metric tables with MIN/MAX/AVERAGE/STDEV summaries (`report`, `stats`)
//! - **Runner**: per-pair processing and the bounded pair loop (`runner` module)
//!
//! Timestamps stay integral until the final division by [`util::TIMESTAMP_SCALE`].

pub mod classify;
pub mod conversions;
pub mod error;
pub mod exclusion;
pub mod metrics;
pub mod mocks;
pub mod parser;
pub mod report;
pub mod runner;
pub mod source_error;
pub mod stats;
pub mod util;

pub use classify::{EventKind, TaggedLine, classify};
pub use error::{CoreError, StatsError};
pub use exclusion::{CounterMode, ExclusionSet, InvalidMarker, OccurrenceCounter, scan_exclusions};
pub use metrics::{MetricKind, MetricSeries, TrialRow, align, jitter};
pub use parser::{EventStream, MotionPulse, StreamRole, parse_stream};
pub use report::{MetricTable, PairDiagnostics, PairReport, ReportSink};
pub use runner::{RunParams, RunSummary, process_pair, run};
pub use stats::Summary;
