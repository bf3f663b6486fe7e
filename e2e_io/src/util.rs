//! File naming helpers for numbered log pairs.

use crate::error::{IoError, Result};

/// Placeholder replaced by the pair index in file patterns.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Substitute `index` into a pattern such as `e2e_station_{index}.txt`.
/// - Every occurrence of the placeholder is replaced.
/// - Patterns without the placeholder are rejected; they would map every index
///   to the same file and never terminate a run.
pub fn render_pattern(pattern: &str, index: usize) -> Result<String> {
    if !pattern.contains(INDEX_PLACEHOLDER) {
        return Err(IoError::Pattern(pattern.to_string()));
    }
    Ok(pattern.replace(INDEX_PLACEHOLDER, &index.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_index() {
        let name = render_pattern("e2e_station_{index}.txt", 7).unwrap();
        assert_eq!(name, "e2e_station_7.txt");
    }

    #[test]
    fn rejects_missing_placeholder() {
        let err = render_pattern("station.txt", 0).unwrap_err();
        assert!(matches!(err, IoError::Pattern(_)));
    }
}
