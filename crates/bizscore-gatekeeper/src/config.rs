//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for the stage postconditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Prefix every diagnosis identifier must start with
    pub identifier_prefix: String,

    /// Exact identifier length (0 = any length)
    pub identifier_length: usize,

    /// Marker that opens a structural report section
    pub section_marker: String,

    /// Minimum number of structural sections in a rendered report
    pub expected_sections: usize,

    /// Minimum rendered report size in bytes
    pub min_report_bytes: usize,

    /// Strings that indicate unrendered template content (matched case-insensitively)
    pub placeholder_markers: Vec<String>,

    /// Compare the total reported by the source system with the computed total
    pub check_reported_total: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            identifier_prefix: "DX-".to_string(),
            identifier_length: 16,
            section_marker: "<section".to_string(),
            expected_sections: 5,
            min_report_bytes: 600,
            placeholder_markers: vec![
                "{{".to_string(),
                "PLACEHOLDER".to_string(),
                "SAMPLE_DATA".to_string(),
                "lorem ipsum".to_string(),
            ],
            check_reported_total: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (structure only)
    pub fn permissive() -> Self {
        Self {
            identifier_length: 0,
            expected_sections: 1,
            min_report_bytes: 1,
            placeholder_markers: vec!["{{".to_string()],
            check_reported_total: false,
            ..Self::default()
        }
    }

    /// Create a strict configuration (larger reports, more placeholder markers)
    pub fn strict() -> Self {
        let mut placeholder_markers = Self::default().placeholder_markers;
        placeholder_markers.extend(["{%".to_string(), "[TODO]".to_string(), "[TBD]".to_string()]);

        Self {
            expected_sections: 6,
            min_report_bytes: 1200,
            placeholder_markers,
            ..Self::default()
        }
    }

    /// Check the configuration for values no report or identifier could satisfy
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.identifier_prefix.trim().is_empty() {
            return Err(GatekeeperError::Config(
                "identifier_prefix must not be empty".to_string(),
            ));
        }
        if self.identifier_length != 0 && self.identifier_length <= self.identifier_prefix.len() {
            return Err(GatekeeperError::Config(format!(
                "identifier_length {} leaves no room after prefix '{}'",
                self.identifier_length, self.identifier_prefix
            )));
        }
        if self.section_marker.is_empty() {
            return Err(GatekeeperError::Config(
                "section_marker must not be empty".to_string(),
            ));
        }
        if self.placeholder_markers.iter().any(|m| m.is_empty()) {
            return Err(GatekeeperError::Config(
                "placeholder markers must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}
