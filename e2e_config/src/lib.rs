#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the e2e latency correlator.
//!
//! - `Config` and its sections are deserialized from TOML; every section has
//!   defaults so an empty file is a valid config.
//! - `validate()` rejects values that would make a run meaningless or endless.
use serde::Deserialize;
use std::path::Path;

const INDEX_PLACEHOLDER: &str = "{index}";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Input {
    /// Directory holding the numbered log pairs
    pub dir: String,
    /// Station log file name; `{index}` is replaced by the pair index
    pub station_pattern: String,
    /// Vehicle log file name; `{index}` is replaced by the pair index
    pub vehicle_pattern: String,
    /// First pair index probed
    pub start_index: usize,
    /// Optional cap on the number of pairs processed in one run
    pub max_pairs: Option<usize>,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            dir: "e2e_data".to_string(),
            station_pattern: "e2e_station_{index}.txt".to_string(),
            vehicle_pattern: "e2e_vehicle_{index}.txt".to_string(),
            start_index: 0,
            max_pairs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Output {
    /// Directory receiving one report directory per pair
    pub dir: String,
    /// Report directory name prefix; the pair index is appended
    pub prefix: String,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            prefix: "output_".to_string(),
        }
    }
}

/// How GPIO and motion lines of one log share occurrence indices.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CounterMode {
    /// Each marker kind keeps its own ordinal; the k-th GPIO line and the k-th
    /// motion line describe the same trial. This is how the e2e kernel module
    /// numbers its GPIO and motion lines.
    #[default]
    PerChannel,
    /// One position advanced by GPIO and motion lines alike, in line order.
    Interleaved,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ParserCfg {
    pub counter: CounterMode,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub input: Input,
    pub output: Output,
    pub parser: ParserCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Input
        if self.input.dir.trim().is_empty() {
            eyre::bail!("input.dir must not be empty");
        }
        if !self.input.station_pattern.contains(INDEX_PLACEHOLDER) {
            eyre::bail!("input.station_pattern must contain {INDEX_PLACEHOLDER}");
        }
        if !self.input.vehicle_pattern.contains(INDEX_PLACEHOLDER) {
            eyre::bail!("input.vehicle_pattern must contain {INDEX_PLACEHOLDER}");
        }
        if self.input.station_pattern == self.input.vehicle_pattern {
            eyre::bail!("input.station_pattern and input.vehicle_pattern must differ");
        }
        if self.input.max_pairs == Some(0) {
            eyre::bail!("input.max_pairs must be >= 1 when set");
        }

        // Output
        if self.output.dir.trim().is_empty() {
            eyre::bail!("output.dir must not be empty");
        }
        if self.output.prefix.contains(['/', '\\']) {
            eyre::bail!("output.prefix must not contain path separators");
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rotation:?}");
        }

        Ok(())
    }
}
