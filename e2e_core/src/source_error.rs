//! Maps `Box<dyn Error>` from the `PairSource` boundary to typed `CoreError`.
//!
//! The trait in `e2e_traits` uses `Box<dyn Error + Send + Sync>` so any storage
//! backend can plug in; this module converts those to our typed error enum,
//! with an optional feature-gated path for `e2e_io::IoError` downcasting.

use crate::error::CoreError;

/// Map a source-boundary error to a typed `CoreError`.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> CoreError {
    #[cfg(feature = "io-errors")]
    {
        if let Some(io) = e.downcast_ref::<e2e_io::error::IoError>() {
            return match io {
                e2e_io::error::IoError::Read { path, source } => {
                    CoreError::Source(format!("cannot read {}: {source}", path.display()))
                }
                e2e_io::error::IoError::InvalidUtf8 { path } => {
                    CoreError::Source(format!("{} is not UTF-8 text", path.display()))
                }
                other => CoreError::Source(other.to_string()),
            };
        }
    }

    CoreError::Source(e.to_string())
}
