//! Seam traits shared by the correlator crates.
//!
//! Sources of log pairs live behind [`PairSource`] so the core never touches
//! the filesystem directly.

/// Full text of one station/vehicle log pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPair {
    pub station: String,
    pub vehicle: String,
}

impl RawPair {
    pub fn new(station: impl Into<String>, vehicle: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            vehicle: vehicle.into(),
        }
    }
}

pub trait PairSource {
    /// Fetch the pair stored under `index`.
    ///
    /// Returns `Ok(None)` when either log of the pair is absent; that ends a run
    /// and is not an error.
    fn fetch(&mut self, index: usize)
    -> Result<Option<RawPair>, Box<dyn std::error::Error + Send + Sync>>;

    /// Human-readable location of a pair, used in log lines.
    fn describe(&self, index: usize) -> String {
        format!("pair {index}")
    }
}

impl<S: PairSource + ?Sized> PairSource for Box<S> {
    fn fetch(
        &mut self,
        index: usize,
    ) -> Result<Option<RawPair>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).fetch(index)
    }

    fn describe(&self, index: usize) -> String {
        (**self).describe(index)
    }
}
