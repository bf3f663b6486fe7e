use std::sync::atomic::{AtomicBool, Ordering};

use e2e_traits::{PairSource, RawPair};
use eyre::WrapErr;

use crate::error::{CoreError, Result as CoreResult};
use crate::exclusion::{CounterMode, scan_exclusions};
use crate::metrics::align;
use crate::parser::{StreamRole, parse_stream};
use crate::report::{PairDiagnostics, PairReport, ReportSink};
use crate::source_error::map_source_error;

/// Parameters for one correlation run.
#[derive(Debug, Clone, Default)]
pub struct RunParams {
    pub counter_mode: CounterMode,
    /// First pair index probed.
    pub start_index: usize,
    /// Stop after this many pairs even if more are available.
    pub max_pairs: Option<usize>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pairs_processed: usize,
    /// First index that was not processed.
    pub next_index: usize,
}

/// Correlate one station/vehicle pair.
///
/// Steps: resolve flags from the station log, parse both logs with the same
/// exclusion set, align by position, build metric tables. Nothing is kept
/// between calls.
pub fn process_pair(index: usize, raw: &RawPair, params: &RunParams) -> CoreResult<PairReport> {
    let exclusions = scan_exclusions(&raw.station, params.counter_mode);
    let station = parse_stream(&raw.station, StreamRole::Station, &exclusions, params.counter_mode)?;
    let vehicle = parse_stream(&raw.vehicle, StreamRole::Vehicle, &exclusions, params.counter_mode)?;
    debug_assert_eq!(station.gpio_flags, exclusions);

    let trials = align(&station, &vehicle)?;
    let diagnostics = PairDiagnostics {
        excluded: exclusions.to_vec(),
        led_flags: vehicle.led_flags.to_vec(),
        station_motion: station.motion.len(),
        station_gpio: station.gpio.len(),
        vehicle_motion: vehicle.motion.len(),
        vehicle_led: vehicle.led.len(),
        skipped_station_motion: station.skipped_motion,
        skipped_vehicle_motion: vehicle.skipped_motion,
        skipped_vehicle_led: vehicle.skipped_led,
    };
    if trials.is_empty() {
        tracing::warn!(pair = index, "no aligned trials");
    }
    let truncated = diagnostics.truncated(trials.len());
    if truncated > 0 {
        tracing::debug!(pair = index, truncated, "records beyond trial count dropped");
    }
    tracing::info!(
        pair = index,
        trials = trials.len(),
        excluded = diagnostics.excluded.len(),
        "pair correlated"
    );
    Ok(PairReport::from_trials(index, trials, diagnostics))
}

/// Process every consecutive pair the source holds, starting at `params.start_index`.
///
/// Stops at the first index whose logs are missing. Any error aborts the run
/// before that pair's report is emitted. `shutdown` is checked between pairs.
pub fn run<S, K>(
    source: &mut S,
    sink: &mut K,
    params: &RunParams,
    shutdown: Option<&AtomicBool>,
) -> CoreResult<RunSummary>
where
    S: PairSource + ?Sized,
    K: ReportSink + ?Sized,
{
    let limit = params.max_pairs.unwrap_or(usize::MAX);
    let mut index = params.start_index;
    let mut processed = 0usize;

    while processed < limit {
        if shutdown.is_some_and(|s| s.load(Ordering::Relaxed)) {
            tracing::warn!(next_index = index, "shutdown requested");
            return Err(CoreError::Interrupted { next_index: index }.into());
        }
        let raw = match source.fetch(index) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(index, "no further log pair; stopping");
                break;
            }
            Err(e) => return Err(map_source_error(e.as_ref()).into()),
        };
        let where_ = source.describe(index);
        tracing::debug!(index, source = %where_, "processing pair");
        let report =
            process_pair(index, &raw, params).wrap_err_with(|| format!("pair {index} ({where_})"))?;
        sink.emit(&report)
            .wrap_err_with(|| format!("emit report for pair {index}"))?;
        processed += 1;
        let Some(next) = index.checked_add(1) else {
            break;
        };
        index = next;
    }

    tracing::info!(pairs = processed, next_index = index, "run finished");
    Ok(RunSummary {
        pairs_processed: processed,
        next_index: index,
    })
}
