//! # Core Type Definitions
//!
//! This module contains the value types shared by every engine component:
//! - Phase codes (`PhaseCode`)
//! - Asset identity parsed from folder names (`AssetIdentity`)
//! - File descriptors used for version grouping (`FileVariant`)
//! - Document register rows (`DocumentRecord`)
//! - Error types (`LifecycleError`)
//!
//! ## Derived, Never Stored
//!
//! None of these types is persisted. They are views computed from the file
//! server on every call; the folder tree is the only source of truth.

use crate::primitives::{NO_PHASE, PHASE_CODE_WIDTH, mb_thousandths};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;
use thiserror::Error;

// =============================================================================
// PHASE CODE
// =============================================================================

/// A two-character lifecycle phase code (`"01"` .. `"04"`, `"00"` for none).
///
/// Codes are compared as strings. For the fixed-width zero-padded scheme the
/// lexicographic maximum equals the numeric maximum, which is what phase
/// inference relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseCode(String);

impl PhaseCode {
    /// Create a phase code from a string, kept as given.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The "no phase" code, `"00"`.
    #[must_use]
    pub fn none() -> Self {
        Self(NO_PHASE.to_string())
    }

    /// Build a code from a marker token, keeping only its first two characters.
    ///
    /// Returns `None` for an empty token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let code: String = token.chars().take(PHASE_CODE_WIDTH).collect();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Parse user input as a phase code.
    ///
    /// Accepts exactly two ASCII digits. Anything else would sort out of
    /// numeric order against the fixed-width codes and corrupt inference.
    pub fn parse(code: &str) -> Result<Self, LifecycleError> {
        let code = Self::new(code.trim());
        if code.is_well_formed() {
            Ok(code)
        } else {
            Err(LifecycleError::InvalidPhase(format!(
                "'{}' is not {} digits",
                code, PHASE_CODE_WIDTH
            )))
        }
    }

    /// Whether the code is exactly two ASCII digits.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == PHASE_CODE_WIDTH && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Whether this is the "no phase" code.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 == NO_PHASE
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PhaseCode {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for PhaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhaseCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// =============================================================================
// ASSET IDENTITY
// =============================================================================

/// Identity fields encoded in an asset folder name.
///
/// `AEN_PV025_Sunfield-Solar_Athens_North` parses to subcompany `AEN`,
/// type `PV`, id `025`, name `Sunfield-Solar`, location `Athens_North`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIdentity {
    /// The folder name the identity was parsed from.
    pub folder_name: String,
    /// First token.
    pub subcompany: String,
    /// Alphabetic characters of the second token. May be empty.
    pub asset_type: String,
    /// Digits of the second token; `None` when the token carries no digits.
    pub asset_id: Option<String>,
    /// Third token.
    pub asset_name: String,
    /// Everything after the third separator, kept whole.
    pub location: Option<String>,
}

// =============================================================================
// FILE VARIANT
// =============================================================================

/// One file considered for version grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVariant {
    /// File name without directory.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileVariant {
    /// Create a new variant descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            modified,
        }
    }
}

// =============================================================================
// DOCUMENT RECORD
// =============================================================================

/// A row of the document register.
///
/// Filesystem-derived fields are always present. The parsed fields are
/// filled only when the file name follows the document convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    /// Folder relative to the asset root (`"."` for the root itself).
    pub folder: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: NaiveDate,
    /// Extension including the leading dot, or empty.
    pub extension: String,
    pub phase_code: Option<String>,
    pub doc_type: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
}

impl DocumentRecord {
    /// Size in thousandths of a MB.
    #[must_use]
    pub fn size_mb_thousandths(&self) -> u64 {
        mb_thousandths(self.size_bytes)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the lifecycle engine.
///
/// Per-item problems inside a batch (one unparsable folder, one failed move)
/// are never raised through this type; they are skipped or collected into a
/// report. A `LifecycleError` always means the whole operation did not happen
/// or did not complete.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The asset (or target) folder does not exist.
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// An asset folder name could not be parsed.
    #[error("Invalid asset folder name: {0}")]
    InvalidFolderName(String),

    /// A phase code is malformed or missing from the phase table.
    #[error("Invalid phase code: {0}")]
    InvalidPhase(String),

    /// A new status marker could not be written.
    #[error("Cannot write status marker {}: {reason}", .path.display())]
    MarkerWrite { path: PathBuf, reason: String },

    /// The scaffold template or script failed.
    #[error("Scaffold failed: {0}")]
    Scaffold(String),

    /// The lifecycle configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_code_truncates_token() {
        assert_eq!(PhaseCode::from_token("03xyz"), Some(PhaseCode::new("03")));
        assert_eq!(PhaseCode::from_token("4"), Some(PhaseCode::new("4")));
        assert_eq!(PhaseCode::from_token(""), None);
    }

    #[test]
    fn phase_code_ordering_matches_numeric() {
        let mut codes = vec![
            PhaseCode::new("03"),
            PhaseCode::new("01"),
            PhaseCode::new("04"),
            PhaseCode::none(),
        ];
        codes.sort();
        let ordered: Vec<_> = codes.iter().map(PhaseCode::as_str).collect();
        assert_eq!(ordered, vec!["00", "01", "03", "04"]);
    }

    #[test]
    fn phase_code_parse_requires_two_digits() {
        assert_eq!(PhaseCode::parse("03").expect("two digits"), PhaseCode::new("03"));
        assert_eq!(PhaseCode::parse(" 02 ").expect("trimmed"), PhaseCode::new("02"));
        for bad in ["3", "", "003", "O1", "1a"] {
            assert!(
                matches!(PhaseCode::parse(bad), Err(LifecycleError::InvalidPhase(_))),
                "{bad:?} accepted"
            );
        }
        assert!(!PhaseCode::new("3").is_well_formed());
        assert!(PhaseCode::none().is_well_formed());
    }

    #[test]
    fn default_phase_is_none() {
        assert!(PhaseCode::default().is_none());
        assert!(!PhaseCode::new("01").is_none());
    }

    #[test]
    fn error_messages_name_the_path() {
        let err = LifecycleError::AssetNotFound(PathBuf::from("ASSETS/AEN_PV1_X"));
        assert_eq!(err.to_string(), "Asset not found: ASSETS/AEN_PV1_X");
    }
}
