//! Bizscore Gatekeeper
//!
//! Postcondition validators for every pipeline stage. A stage only counts as
//! complete once its output passes the matching check here.
//!
//! The Gatekeeper provides:
//! - Identifier format validation
//! - Retrieved record completeness checks
//! - Score and benchmark range checks
//! - Report structure checks and the final quality check
//!
//! # Examples
//!
//! ```
//! use bizscore_gatekeeper::{Gatekeeper, ValidationConfig};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//!
//! assert!(gatekeeper.validate_identifier("DX-20250301-0042").passed());
//! assert!(!gatekeeper.validate_identifier("20250301-0042").passed());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod markers;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, Postcondition, RejectionReason, ValidationStatus};
