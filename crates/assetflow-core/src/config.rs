//! # Lifecycle Configuration
//!
//! The fixed tables of the portfolio: phases, asset types, folders locked on
//! entering a phase, and the naming constants of markers and archives.
//!
//! A `LifecycleConfig` is an immutable value passed into every operation.
//! [`LifecycleConfig::default`] reproduces the canonical tables; a TOML file
//! may override any subset of them:
//!
//! ```toml
//! actor = "Portfolio Office"
//!
//! [[phases]]
//! code = "01"
//! label = "PIPELINE"
//! name = "Pipeline"
//!
//! [locks]
//! "02" = ["01_PREFEASIBILITY"]
//! ```

use crate::types::{LifecycleError, PhaseCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Label used in marker names for codes missing from the phase table.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

/// Display name for codes missing from the phase table.
pub const UNKNOWN_NAME: &str = "Unknown";

// =============================================================================
// PHASE DEFINITION
// =============================================================================

/// One row of the phase table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    /// Two-digit code, e.g. `"03"`.
    pub code: PhaseCode,
    /// Upper-case label used in marker names and the `STATUS:` field.
    pub label: String,
    /// Human-readable name used in reports.
    pub name: String,
}

impl PhaseDef {
    fn new(code: &str, label: &str, name: &str) -> Self {
        Self {
            code: PhaseCode::new(code),
            label: label.to_string(),
            name: name.to_string(),
        }
    }
}

// =============================================================================
// LIFECYCLE CONFIG
// =============================================================================

/// Immutable configuration for every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Ordered phase table. The first entry is the phase of a new asset.
    pub phases: Vec<PhaseDef>,
    /// Asset type code -> display name.
    pub asset_types: BTreeMap<String, String>,
    /// Phase code -> subfolders considered complete when entering that phase.
    pub locks: BTreeMap<String, Vec<String>>,
    /// Prefix shared by all status marker files.
    pub marker_prefix: String,
    /// Extension of status marker files.
    pub marker_extension: String,
    /// Text of the `Phase Closed:` field while a phase is open.
    pub open_sentinel: String,
    /// Name of the archival subfolder.
    pub archive_dir: String,
    /// Case-sensitive substrings that exempt a whole version group from archival.
    pub exempt_keywords: Vec<String>,
    /// Status vocabulary for the document register, scanned in order.
    pub status_keywords: Vec<String>,
    /// Actor tag written into `Updated By:` and `Closed By:`.
    pub actor: String,
    /// Days from creation to the target completion of the first phase.
    pub initial_target_days: u64,
    /// Days from creation to the first and second milestones of the first phase.
    pub initial_milestone_days: (u64, u64),
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        let phases = vec![
            PhaseDef::new("01", "PIPELINE", "Pipeline"),
            PhaseDef::new("02", "UNDER DEVELOPMENT", "Under Development"),
            PhaseDef::new("03", "UNDER CONSTRUCTION", "Under Construction"),
            PhaseDef::new("04", "OPERATIONAL", "Operational"),
        ];

        let asset_types = [
            ("PV", "Solar Photovoltaic"),
            ("WF", "Wind Farm"),
            ("HTL", "Hotel"),
            ("DC", "Data Center"),
            ("HF", "Hydroponic Farm"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        let locks = [
            ("02", vec!["01_PREFEASIBILITY"]),
            (
                "03",
                vec![
                    "01_PREFEASIBILITY",
                    "02_FEASIBILITY",
                    "03_LAND_ACQUISITION",
                    "04_PERMITTING",
                    "05_DESIGN_ENGINEERING",
                    "06_FINANCING",
                ],
            ),
            (
                "04",
                vec!["07_PROCUREMENT", "08_CONSTRUCTION", "09_COMMISSIONING_COD"],
            ),
        ]
        .into_iter()
        .map(|(code, folders)| {
            (
                code.to_string(),
                folders.into_iter().map(String::from).collect(),
            )
        })
        .collect();

        Self {
            phases,
            asset_types,
            locks,
            marker_prefix: "_STATUS_".to_string(),
            marker_extension: ".txt".to_string(),
            open_sentinel: "[Will be filled when moving to next phase]".to_string(),
            archive_dir: "_SUPERSEDED".to_string(),
            exempt_keywords: vec!["FINAL".to_string(), "APPROVED".to_string()],
            status_keywords: ["DRAFT", "REVIEW", "REVISED", "FINAL", "APPROVED", "SIGNED"]
                .into_iter()
                .map(String::from)
                .collect(),
            actor: "assetflow".to_string(),
            initial_target_days: 90,
            initial_milestone_days: (14, 60),
        }
    }
}

impl LifecycleConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, LifecycleError> {
        let config: Self =
            toml::from_str(text).map_err(|e| LifecycleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LifecycleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LifecycleError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.phases.is_empty() {
            return Err(LifecycleError::Config("phase table is empty".to_string()));
        }
        if self.marker_prefix.is_empty() {
            return Err(LifecycleError::Config("marker_prefix is empty".to_string()));
        }
        if self.archive_dir.is_empty() {
            return Err(LifecycleError::Config("archive_dir is empty".to_string()));
        }
        for phase in &self.phases {
            if !phase.code.is_well_formed() {
                return Err(LifecycleError::Config(format!(
                    "phase code '{}' is not two digits",
                    phase.code
                )));
            }
        }
        Ok(())
    }

    /// Parse `code` and require it to name a phase in the table.
    pub fn known_phase(&self, code: &str) -> Result<PhaseCode, LifecycleError> {
        let code = PhaseCode::parse(code)?;
        if self.phase(&code).is_none() {
            let known: Vec<&str> = self.phases.iter().map(|p| p.code.as_str()).collect();
            return Err(LifecycleError::InvalidPhase(format!(
                "'{}' is not one of [{}]",
                code,
                known.join(", ")
            )));
        }
        Ok(code)
    }

        /// Look up a phase definition by code.
    #[must_use]
    pub fn phase(&self, code: &PhaseCode) -> Option<&PhaseDef> {
        self.phases.iter().find(|p| &p.code == code)
    }

    /// Marker label for a code, `UNKNOWN` when the code is not in the table.
    #[must_use]
    pub fn phase_label(&self, code: &PhaseCode) -> &str {
        self.phase(code).map_or(UNKNOWN_LABEL, |p| p.label.as_str())
    }

    /// Display name for a code, `Unknown` when the code is not in the table.
    #[must_use]
    pub fn phase_name(&self, code: &PhaseCode) -> &str {
        self.phase(code).map_or(UNKNOWN_NAME, |p| p.name.as_str())
    }

    /// The phase every new asset starts in.
    pub fn initial_phase(&self) -> Result<&PhaseDef, LifecycleError> {
        self.phases
            .first()
            .ok_or_else(|| LifecycleError::Config("phase table is empty".to_string()))
    }

    /// Display name of an asset type, falling back to the code itself.
    #[must_use]
    pub fn asset_type_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.asset_types.get(code).map_or(code, String::as_str)
    }

    /// Subfolders locked when entering `code`.
    #[must_use]
    pub fn locked_folders(&self, code: &PhaseCode) -> &[String] {
        self.locks.get(code.as_str()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical marker filename for a phase: `_STATUS_<code>_<LABEL>.txt`.
    #[must_use]
    pub fn marker_filename(&self, code: &PhaseCode) -> String {
        format!(
            "{}{}_{}{}",
            self.marker_prefix,
            code,
            self.phase_label(code),
            self.marker_extension
        )
    }

    /// Whether a file name is a status marker.
    #[must_use]
    pub fn is_marker(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.marker_prefix)
    }
}

// =============================================================================
// TESTS
// =============================================================================
