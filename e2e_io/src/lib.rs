pub mod error;
pub mod util;

use e2e_traits::{PairSource, RawPair};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::error::IoError;
use crate::util::render_pattern;

pub const DEFAULT_STATION_PATTERN: &str = "e2e_station_{index}.txt";
pub const DEFAULT_VEHICLE_PATTERN: &str = "e2e_vehicle_{index}.txt";

/// Log pairs stored as numbered files in one directory.
#[derive(Debug, Clone)]
pub struct DirPairSource {
    dir: PathBuf,
    station_pattern: String,
    vehicle_pattern: String,
}

impl DirPairSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            station_pattern: DEFAULT_STATION_PATTERN.to_string(),
            vehicle_pattern: DEFAULT_VEHICLE_PATTERN.to_string(),
        }
    }

    pub fn with_patterns(
        dir: impl Into<PathBuf>,
        station_pattern: impl Into<String>,
        vehicle_pattern: impl Into<String>,
    ) -> error::Result<Self> {
        let station_pattern = station_pattern.into();
        let vehicle_pattern = vehicle_pattern.into();
        // Validate both up front so a bad pattern fails before the first fetch.
        render_pattern(&station_pattern, 0)?;
        render_pattern(&vehicle_pattern, 0)?;
        Ok(Self {
            dir: dir.into(),
            station_pattern,
            vehicle_pattern,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the station and vehicle logs for `index`.
    pub fn paths(&self, index: usize) -> error::Result<(PathBuf, PathBuf)> {
        let station = self.dir.join(render_pattern(&self.station_pattern, index)?);
        let vehicle = self.dir.join(render_pattern(&self.vehicle_pattern, index)?);
        Ok((station, vehicle))
    }
}

/// Read one whole log file as UTF-8 text.
pub fn read_log(path: &Path) -> error::Result<String> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| IoError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}

impl PairSource for DirPairSource {
    fn fetch(
        &mut self,
        index: usize,
    ) -> Result<Option<RawPair>, Box<dyn std::error::Error + Send + Sync>> {
        let (station_path, vehicle_path) = self.paths(index)?;
        let station_found = station_path.is_file();
        let vehicle_found = vehicle_path.is_file();
        if !(station_found && vehicle_found) {
            tracing::debug!(
                index,
                station_found,
                vehicle_found,
                station = %station_path.display(),
                vehicle = %vehicle_path.display(),
                "log pair not found"
            );
            return Ok(None);
        }
        let station = read_log(&station_path)?;
        let vehicle = read_log(&vehicle_path)?;
        tracing::debug!(
            index,
            station_bytes = station.len(),
            vehicle_bytes = vehicle.len(),
            "log pair read"
        );
        Ok(Some(RawPair { station, vehicle }))
    }

    fn describe(&self, index: usize) -> String {
        match self.paths(index) {
            Ok((s, v)) => format!("{} + {}", s.display(), v.display()),
            Err(_) => format!("pair {index} in {}", self.dir.display()),
        }
    }
}

/// In-memory pair source; index `n` is the `n`-th pushed pair.
#[derive(Debug, Clone, Default)]
pub struct MemoryPairSource {
    pairs: VecDeque<RawPair>,
    offset: usize,
}

impl MemoryPairSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the stored pairs starting at `offset` instead of 0.
    pub fn starting_at(offset: usize) -> Self {
        Self {
            pairs: VecDeque::new(),
            offset,
        }
    }

    pub fn push(&mut self, pair: RawPair) -> &mut Self {
        self.pairs.push_back(pair);
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<RawPair> for MemoryPairSource {
    fn from_iter<I: IntoIterator<Item = RawPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
            offset: 0,
        }
    }
}

impl PairSource for MemoryPairSource {
    fn fetch(
        &mut self,
        index: usize,
    ) -> Result<Option<RawPair>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(index
            .checked_sub(self.offset)
            .and_then(|i| self.pairs.get(i))
            .cloned())
    }

    fn describe(&self, index: usize) -> String {
        format!("in-memory pair {index}")
    }
}
