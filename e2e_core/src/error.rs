use thiserror::Error;

use crate::classify::EventKind;
use crate::parser::StreamRole;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{role} log line {line}: malformed {kind} payload {payload:?} ({reason})")]
    MalformedPayload {
        role: StreamRole,
        line: usize,
        kind: EventKind,
        payload: String,
        reason: &'static str,
    },
    #[error("no LED value for aligned trial {trial} ({available} LED values parsed)")]
    MissingLedValue { trial: usize, available: usize },
    #[error("pair source error: {0}")]
    Source(String),
    #[error("run interrupted before pair {next_index}")]
    Interrupted { next_index: usize },
    #[error("report sink error: {0}")]
    Sink(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("summary of an empty series is undefined")]
    Empty,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
