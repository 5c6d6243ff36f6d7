//! Run identifiers

use std::fmt;

/// Unique identifier for one pipeline run, based on UUIDv7
///
/// Run ids sort chronologically, so log lines and sink records from a batch
/// can be ordered without a separate timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use bizscore_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a RunId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid run id: {}", e))
    }

    /// Raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Creation time in milliseconds since the Unix epoch
    pub fn timestamp_ms(&self) -> u64 {
        // top 48 bits of a UUIDv7
        (self.0 >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique_and_ordered() {
        let first = RunId::new();
        let second = RunId::new();
        assert_ne!(first, second);
        assert!(first.timestamp_ms() <= second.timestamp_ms());
    }

    #[test]
    fn test_display_and_parse() {
        let id = RunId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(RunId::from_string(&text).unwrap(), id);
        assert!(RunId::from_string("DX-20250301-0042").is_err());
    }
}
