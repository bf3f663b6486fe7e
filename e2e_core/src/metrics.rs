//! Trial alignment and latency metrics.
//!
//! Trials are paired purely by position: the `i`-th surviving record of every
//! channel belongs to trial `i`. The trial count is the shortest of the
//! vehicle motion, station motion and station GPIO sequences; longer
//! sequences lose their tail.

use std::fmt;

use crate::error::CoreError;
use crate::parser::EventStream;
use crate::util::TIMESTAMP_SCALE;

/// Raw timestamps of one aligned trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRow {
    pub vehicle_on: i64,
    pub vehicle_off: i64,
    pub vehicle_led: i64,
    pub station_on: i64,
    pub station_off: i64,
    pub station_gpio: i64,
}

impl TrialRow {
    /// Column names of the raw trial table, in field order.
    pub const COLUMNS: [&'static str; 6] = [
        "VEHICLE_GY_ON",
        "VEHICLE_GY_OFF",
        "LED_ON",
        "STATION_GY_ON",
        "STATION_GY_OFF",
        "PHOTOTRANSISTOR",
    ];

    pub fn values(&self) -> [i64; 6] {
        [
            self.vehicle_on,
            self.vehicle_off,
            self.vehicle_led,
            self.station_on,
            self.station_off,
            self.station_gpio,
        ]
    }

    /// Device-to-device skew at trigger time.
    pub fn m2m(&self) -> f64 {
        scaled(diff(self.vehicle_on, self.station_on).abs())
    }

    /// Vehicle trigger-to-LED duration against station trigger-to-release duration.
    pub fn pid_tr(&self) -> f64 {
        let vehicle = diff(self.vehicle_led, self.vehicle_on);
        let station = diff(self.station_off, self.station_on);
        scaled((vehicle - station).abs())
    }

    /// Station GPIO release to vehicle LED.
    pub fn g2g(&self) -> f64 {
        scaled(diff(self.station_gpio, self.vehicle_led).abs())
    }

    /// Signed end-to-end latency: station total minus vehicle total.
    pub fn e2e(&self) -> f64 {
        let station = diff(self.station_gpio, self.station_on);
        let vehicle = diff(self.vehicle_led, self.vehicle_on);
        scaled(station - vehicle)
    }
}

#[inline]
fn diff(a: i64, b: i64) -> i128 {
    i128::from(a) - i128::from(b)
}

#[inline]
fn scaled(v: i128) -> f64 {
    v as f64 / TIMESTAMP_SCALE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    M2m,
    G2g,
    E2e,
    PidTr,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::M2m,
        MetricKind::G2g,
        MetricKind::E2e,
        MetricKind::PidTr,
    ];

    /// Report sheet name.
    pub fn sheet(self) -> &'static str {
        match self {
            MetricKind::M2m => "M2M",
            MetricKind::G2g => "G2G",
            MetricKind::E2e => "E2E",
            MetricKind::PidTr => "PID",
        }
    }

    pub fn of(self, row: &TrialRow) -> f64 {
        match self {
            MetricKind::M2m => row.m2m(),
            MetricKind::G2g => row.g2g(),
            MetricKind::E2e => row.e2e(),
            MetricKind::PidTr => row.pid_tr(),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricKind::M2m => "m2m",
            MetricKind::G2g => "g2g",
            MetricKind::E2e => "e2e",
            MetricKind::PidTr => "pid_tr",
        })
    }
}

/// One metric over all trials with its successive-sample jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub kind: MetricKind,
    pub values: Vec<f64>,
    pub jitter: Vec<f64>,
}

impl MetricSeries {
    pub fn from_trials(kind: MetricKind, trials: &[TrialRow]) -> Self {
        let values: Vec<f64> = trials.iter().map(|t| kind.of(t)).collect();
        let jitter = jitter(&values);
        Self {
            kind,
            values,
            jitter,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// First difference with an implicit zero before the first sample.
pub fn jitter(values: &[f64]) -> Vec<f64> {
    let mut prev = 0.0;
    values
        .iter()
        .map(|&v| {
            let d = v - prev;
            prev = v;
            d
        })
        .collect()
}

/// Number of trials the three bounding sequences can support.
pub fn trial_count(station: &EventStream, vehicle: &EventStream) -> usize {
    vehicle
        .motion
        .len()
        .min(station.motion.len())
        .min(station.gpio.len())
}

/// Zip station and vehicle streams into trial rows.
///
/// LED values are not part of the bound; a vehicle log with fewer LED values
/// than aligned trials is an error rather than a silently shorter table.
pub fn align(station: &EventStream, vehicle: &EventStream) -> Result<Vec<TrialRow>, CoreError> {
    let n = trial_count(station, vehicle);
    (0..n)
        .map(|i| {
            let led = vehicle
                .led
                .get(i)
                .copied()
                .ok_or_else(|| CoreError::MissingLedValue {
                    trial: i,
                    available: vehicle.led.len(),
                })?;
            let v = vehicle.motion[i];
            let s = station.motion[i];
            Ok(TrialRow {
                vehicle_on: v.on,
                vehicle_off: v.off,
                vehicle_led: led,
                station_on: s.on,
                station_off: s.off,
                station_gpio: station.gpio[i],
            })
        })
        .collect()
}
