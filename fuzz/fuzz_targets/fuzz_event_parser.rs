#![no_main]
use e2e_core::{CounterMode, RunParams, process_pair};
use e2e_traits::RawPair;
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    station: &'a str,
    vehicle: &'a str,
    interleaved: bool,
}

fuzz_target!(|input: Input<'_>| {
    for line in input.station.lines().chain(input.vehicle.lines()) {
        let _ = e2e_core::classify(line);
    }
    let params = RunParams {
        counter_mode: if input.interleaved {
            CounterMode::Interleaved
        } else {
            CounterMode::PerChannel
        },
        ..RunParams::default()
    };
    // Malformed logs must surface as errors, never as panics or bad tables.
    if let Ok(report) = process_pair(0, &RawPair::new(input.station, input.vehicle), &params) {
        for table in report.tables() {
            assert_eq!(table.series.values.len(), report.trial_count());
            assert_eq!(table.series.jitter.len(), report.trial_count());
        }
    }
});
