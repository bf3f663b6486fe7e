//! `From` implementations bridging `e2e_config` types to `e2e_core` types.

use crate::exclusion::CounterMode;
use crate::runner::RunParams;

// ── CounterMode ──────────────────────────────────────────────────────────────

impl From<e2e_config::CounterMode> for CounterMode {
    fn from(c: e2e_config::CounterMode) -> Self {
        match c {
            e2e_config::CounterMode::PerChannel => CounterMode::PerChannel,
            e2e_config::CounterMode::Interleaved => CounterMode::Interleaved,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&e2e_config::Config> for RunParams {
    fn from(c: &e2e_config::Config) -> Self {
        Self {
            counter_mode: c.parser.counter.into(),
            start_index: c.input.start_index,
            max_pairs: c.input.max_pairs,
        }
    }
}
