//! Human-readable error descriptions and structured JSON error formatting.

use e2e_core::error::CoreError;
use serde_json::json;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(ce) = err.downcast_ref::<CoreError>() {
        return match ce {
            CoreError::MalformedPayload {
                role,
                line,
                kind,
                payload,
                reason,
            } => format!(
                "What happened: The {role} log has a {kind} line that could not be parsed (line {line}: {payload:?}, {reason}).\nLikely causes: A truncated or hand-edited log, or another kernel message spliced into the marker line.\nHow to fix: Repair or delete line {line} of the {role} log and rerun; no report was written for this pair."
            ),
            CoreError::MissingLedValue { trial, available } => format!(
                "What happened: The vehicle log ran out of LED_ON values at trial {trial} ({available} parsed).\nLikely causes: LED lines lost from the kernel ring buffer, or the capture stopped before the last trial finished.\nHow to fix: Recapture the pair, or drop the trailing motion lines that have no LED_ON counterpart."
            ),
            CoreError::Source(msg) => format!(
                "What happened: A log pair could not be read ({msg}).\nLikely causes: Missing read permission, or a log that is not valid UTF-8.\nHow to fix: Check the files under the input directory and rerun from the failed index with --start-index."
            ),
            CoreError::Interrupted { next_index } => format!(
                "What happened: The run was interrupted before pair {next_index}.\nLikely causes: Ctrl-C or SIGTERM.\nHow to fix: Rerun with --start-index {next_index} to continue where it stopped."
            ),
            CoreError::Sink(msg) => format!(
                "What happened: A report file could not be written ({msg}).\nLikely causes: Output directory not writable, a file in place of a directory, or a full disk.\nHow to fix: Point --output-dir (or output.dir) at a writable location and rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass an existing TOML file, or omit --config to use defaults."
        );
    }
    if lower.starts_with("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this tool ({msg}).\nLikely causes: A typo in a key or value, or an unknown parser.counter mode.\nHow to fix: Compare against etc/e2e_config.toml and fix the reported line."
        );
    }
    if ["input.", "output.", "logging."]
        .iter()
        .any(|section| lower.starts_with(section))
        && lower.contains("must")
    {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: An empty directory, a pattern without {{index}}, or an unsupported rotation.\nHow to fix: Edit the TOML config and try again."
        );
    }
    if lower.contains("log level") || lower.contains("logging.level") {
        return format!(
            "What happened: {msg}.\nLikely causes: A misspelled level or RUST_LOG directive.\nHow to fix: Use one of error, warn, info, debug, trace."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per failure class; everything else exits 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::MalformedPayload { .. }) => 3,
        Some(CoreError::MissingLedValue { .. }) => 4,
        Some(CoreError::Source(_)) => 5,
        Some(CoreError::Interrupted { .. }) => 130,
        _ => 1,
    }
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::MalformedPayload { .. }) => "MalformedPayload",
        Some(CoreError::MissingLedValue { .. }) => "MissingLedValue",
        Some(CoreError::Source(_)) => "Source",
        Some(CoreError::Interrupted { .. }) => "Interrupted",
        Some(CoreError::Sink(_)) => "Sink",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let msg = humanize(err);
    let details = match err.downcast_ref::<CoreError>() {
        Some(CoreError::MalformedPayload {
            role,
            line,
            kind,
            payload,
            ..
        }) => Some(json!({
            "role": role.to_string(),
            "line": line,
            "kind": kind.to_string(),
            "payload": payload,
        })),
        Some(CoreError::MissingLedValue { trial, available }) => {
            Some(json!({ "trial": trial, "available": available }))
        }
        Some(CoreError::Interrupted { next_index }) => Some(json!({ "next_index": next_index })),
        _ => None,
    };

    let obj = if let Some(d) = details {
        json!({ "reason": reason_name(err), "details": d, "message": msg })
    } else {
        json!({ "reason": reason_name(err), "message": msg })
    };
    obj.to_string()
}
