//! Common unit helpers for e2e_core.

/// Divisor applied to every raw timestamp difference before it becomes a metric.
///
/// Raw log timestamps are integer ticks; metrics are reported in units of
/// one million ticks.
pub const TIMESTAMP_SCALE: f64 = 1e6;
