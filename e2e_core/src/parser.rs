//! Event stream parser: turns one log's text into per-kind value sequences.

use std::fmt;

use crate::classify::{EventKind, classify};
use crate::error::CoreError;
use crate::exclusion::{CounterMode, ExclusionSet, InvalidMarker, OccurrenceCounter};

/// Which device a log came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    Station,
    Vehicle,
}

impl StreamRole {
    /// Whether lines of `kind` belong to this log.
    ///
    /// Both devices run the same kernel module, so each log also carries the
    /// other side's marker. Station logs keep GPIO and motion lines, vehicle
    /// logs keep motion and LED lines; anything else is unrecognized.
    pub fn accepts(self, kind: EventKind) -> bool {
        matches!(
            (self, kind),
            (_, EventKind::MotionPulse)
                | (StreamRole::Station, EventKind::GpioPulse)
                | (StreamRole::Vehicle, EventKind::LedEvent)
        )
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamRole::Station => "station",
            StreamRole::Vehicle => "vehicle",
        })
    }
}

/// Sensor on/off timestamps of one detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionPulse {
    pub on: i64,
    pub off: i64,
}

/// Everything extracted from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    pub motion: Vec<MotionPulse>,
    pub gpio: Vec<i64>,
    pub led: Vec<i64>,
    /// GPIO occurrences carrying MULTIPLE/NONE.
    pub gpio_flags: ExclusionSet,
    /// LED occurrences carrying MULTIPLE/NONE. Collected for diagnostics only.
    pub led_flags: ExclusionSet,
    /// Motion records dropped because their index was excluded.
    pub skipped_motion: usize,
    /// LED values dropped because their index was excluded.
    pub skipped_led: usize,
    /// Lines carrying none of the markers.
    pub unrecognized: usize,
}

fn parse_int(
    role: StreamRole,
    line: usize,
    kind: EventKind,
    field: &str,
    payload: &str,
) -> Result<i64, CoreError> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|_| CoreError::MalformedPayload {
            role,
            line,
            kind,
            payload: payload.trim().to_string(),
            reason: "not an integer",
        })
}

fn parse_motion(
    role: StreamRole,
    line: usize,
    payload: &str,
) -> Result<MotionPulse, CoreError> {
    let kind = EventKind::MotionPulse;
    let mut fields = payload.split(';');
    let (Some(on), Some(off)) = (fields.next(), fields.next()) else {
        return Err(CoreError::MalformedPayload {
            role,
            line,
            kind,
            payload: payload.trim().to_string(),
            reason: "expected two ';'-separated fields",
        });
    };
    Ok(MotionPulse {
        on: parse_int(role, line, kind, on, payload)?,
        off: parse_int(role, line, kind, off, payload)?,
    })
}

/// Parse one log top to bottom.
///
/// `exclusions` holds occurrence indices built from the station's GPIO flags;
/// a motion or LED line whose index is in the set is dropped. Lines carrying
/// the other device's marker are unrecognized (see [`StreamRole::accepts`]).
/// Any accepted line whose payload does not parse aborts the whole parse.
pub fn parse_stream(
    text: &str,
    role: StreamRole,
    exclusions: &ExclusionSet,
    mode: CounterMode,
) -> Result<EventStream, CoreError> {
    let mut counter = OccurrenceCounter::new(mode);
    let mut out = EventStream::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let Some(tagged) = classify(raw).filter(|t| role.accepts(t.kind)) else {
            out.unrecognized += 1;
            continue;
        };
        let n = counter.tick(tagged.kind);
        match tagged.kind {
            EventKind::GpioPulse => {
                if let Some(marker) = InvalidMarker::detect(tagged.payload) {
                    tracing::debug!(%role, line, occurrence = n, ?marker, "flagged GPIO pulse");
                    out.gpio_flags.insert(n);
                } else {
                    out.gpio
                        .push(parse_int(role, line, tagged.kind, tagged.payload, tagged.payload)?);
                }
            }
            EventKind::MotionPulse => {
                if exclusions.contains(n) {
                    tracing::trace!(%role, line, occurrence = n, "motion pulse excluded");
                    out.skipped_motion += 1;
                } else {
                    out.motion.push(parse_motion(role, line, tagged.payload)?);
                }
            }
            EventKind::LedEvent => {
                if let Some(marker) = InvalidMarker::detect(tagged.payload) {
                    tracing::debug!(%role, line, occurrence = n, ?marker, "flagged LED event");
                    out.led_flags.insert(n);
                } else if exclusions.contains(n) {
                    tracing::trace!(%role, line, occurrence = n, "LED event excluded");
                    out.skipped_led += 1;
                } else {
                    out.led
                        .push(parse_int(role, line, tagged.kind, tagged.payload, tagged.payload)?);
                }
            }
        }
    }

    tracing::debug!(
        %role,
        motion = out.motion.len(),
        gpio = out.gpio.len(),
        led = out.led.len(),
        skipped_motion = out.skipped_motion,
        skipped_led = out.skipped_led,
        unrecognized = out.unrecognized,
        "stream parsed"
    );
    Ok(out)
}
