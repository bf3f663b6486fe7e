//! Flag resolution: which trial occurrences are invalid and must be skipped.
//!
//! The station's GPIO channel reports `MULTIPLE` (more than one interrupt in a
//! detection window) or `NONE` (no interrupt) instead of a timestamp. Such an
//! occurrence index is excluded from every motion channel keyed by the same
//! counter, in both logs. The set is computed once from the station text by
//! [`scan_exclusions`] and then passed by reference to each parse.

use std::collections::BTreeSet;

use crate::classify::{EventKind, classify};
use crate::parser::StreamRole;

/// Payload tokens marking an invalid GPIO or LED occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMarker {
    Multiple,
    None,
}

impl InvalidMarker {
    /// Detect an invalidity token anywhere in the payload.
    pub fn detect(payload: &str) -> Option<Self> {
        if payload.contains("MULTIPLE") {
            Some(InvalidMarker::Multiple)
        } else if payload.contains("NONE") {
            Some(InvalidMarker::None)
        } else {
            None
        }
    }
}

/// How GPIO and motion lines share occurrence indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterMode {
    /// GPIO and motion each count their own lines. This matches the logs the
    /// e2e kernel module writes, which number GPIO and motion events separately.
    #[default]
    PerChannel,
    /// GPIO and motion advance one common position in line order.
    Interleaved,
}

/// Occurrence counter handed to every line handler of one log scan.
///
/// LED lines always count on their own. GPIO and motion lines count either
/// separately or on one shared position depending on [`CounterMode`].
#[derive(Debug, Clone, Default)]
pub struct OccurrenceCounter {
    mode: CounterMode,
    shared: u32,
    gpio: u32,
    motion: u32,
    led: u32,
}

impl OccurrenceCounter {
    pub fn new(mode: CounterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }

    /// Advance the counter for a line of `kind` and return its 1-based index.
    pub fn tick(&mut self, kind: EventKind) -> u32 {
        let slot = match (kind, self.mode) {
            (EventKind::LedEvent, _) => &mut self.led,
            (_, CounterMode::Interleaved) => &mut self.shared,
            (EventKind::GpioPulse, CounterMode::PerChannel) => &mut self.gpio,
            (EventKind::MotionPulse, CounterMode::PerChannel) => &mut self.motion,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// Set of 1-based occurrence indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<u32>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl FromIterator<u32> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Collect the occurrence indices of flagged GPIO lines in `text`.
///
/// Pure: looks only at markers, never parses numbers, so it cannot fail.
/// `text` is a station log; its LED lines are ignored.
pub fn scan_exclusions(text: &str, mode: CounterMode) -> ExclusionSet {
    let mut counter = OccurrenceCounter::new(mode);
    let mut set = ExclusionSet::new();
    let station_lines = text
        .lines()
        .filter_map(classify)
        .filter(|t| StreamRole::Station.accepts(t.kind));
    for tagged in station_lines {
        let n = counter.tick(tagged.kind);
        if tagged.kind == EventKind::GpioPulse && InvalidMarker::detect(tagged.payload).is_some() {
            set.insert(n);
        }
    }
    set
}
