//! Line classifier: tags one log line by the marker it carries.

use std::fmt;

/// Photo-transistor interrupt on GPIO 16 (station side).
pub const GPIO_MARKER: &str = "GPIO_16_IRQ:";
/// Gyro on/off pulse, `on;off[;...]`.
pub const MOTION_MARKER: &str = "MOTION:";
/// Indicator LED switched on (vehicle side).
pub const LED_MARKER: &str = "LED_ON:";

/// Order in which markers are tried; the first hit wins.
const MARKERS: [(EventKind, &str); 3] = [
    (EventKind::GpioPulse, GPIO_MARKER),
    (EventKind::MotionPulse, MOTION_MARKER),
    (EventKind::LedEvent, LED_MARKER),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GpioPulse,
    MotionPulse,
    LedEvent,
}

impl EventKind {
    pub fn marker(self) -> &'static str {
        match self {
            EventKind::GpioPulse => GPIO_MARKER,
            EventKind::MotionPulse => MOTION_MARKER,
            EventKind::LedEvent => LED_MARKER,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::GpioPulse => "GPIO pulse",
            EventKind::MotionPulse => "motion pulse",
            EventKind::LedEvent => "LED event",
        })
    }
}

/// A recognized line: its kind and everything after the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedLine<'a> {
    pub kind: EventKind,
    pub payload: &'a str,
}

/// Classify a single line. `None` means unrecognized; such lines are dropped.
pub fn classify(line: &str) -> Option<TaggedLine<'_>> {
    MARKERS.iter().find_map(|&(kind, marker)| {
        line.find(marker).map(|idx| TaggedLine {
            kind,
            payload: &line[idx + marker.len()..],
        })
    })
}
