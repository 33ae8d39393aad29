//! # Phase Inference
//!
//! The current phase of an asset is never stored. It is recomputed from the
//! status markers sitting directly in the asset folder: the highest parsable
//! code wins, `"00"` when there is none.
//!
//! Subfolders are never inspected; a marker copied into `02_FEASIBILITY/`
//! does not count.

use crate::config::LifecycleConfig;
use crate::marker::{MarkerBody, read_marker};
use crate::naming::parse_marker_filename;
use crate::types::PhaseCode;
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// MARKER LISTING
// =============================================================================

/// A status marker found in an asset folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFile {
    /// File name of the marker.
    pub name: String,
    /// Full path to the marker.
    pub path: PathBuf,
    /// Parsed phase code.
    pub code: PhaseCode,
}

/// List the parsable markers directly inside `asset_folder`, sorted by name.
///
/// Unparsable marker names are skipped with a warning. A missing or
/// unreadable folder yields an empty list.
pub fn list_markers(asset_folder: &Path, config: &LifecycleConfig) -> Vec<MarkerFile> {
    let entries = match std::fs::read_dir(asset_folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", asset_folder.display(), e);
            return Vec::new();
        }
    };

    let mut markers: Vec<MarkerFile> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !config.is_marker(&name) {
                return None;
            }
            match parse_marker_filename(&name) {
                Some(code) => Some(MarkerFile {
                    path: entry.path(),
                    name,
                    code,
                }),
                None => {
                    tracing::warn!("Skipping malformed status marker: {}", name);
                    None
                }
            }
        })
        .collect();

    markers.sort_by(|a, b| a.name.cmp(&b.name));
    markers
}

// =============================================================================
// INFERENCE
// =============================================================================

/// Infer the current phase of an asset folder.
///
/// Returns the lexicographically greatest marker code, or `"00"` when the
/// folder has no parsable marker (or does not exist). Pure function of the
/// folder contents; no side effects.
pub fn infer_phase(asset_folder: &Path, config: &LifecycleConfig) -> PhaseCode {
    list_markers(asset_folder, config)
        .into_iter()
        .map(|m| m.code)
        .max()
        .unwrap_or_default()
}

/// Phase inference plus a consistency check over the open markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    /// Inferred current phase.
    pub current: PhaseCode,
    /// Codes of all markers found.
    pub markers: Vec<PhaseCode>,
    /// Codes of markers whose `Phase Closed:` field still holds the sentinel.
    pub open: Vec<PhaseCode>,
}

impl PhaseReport {
    /// Exactly one open marker, and it is the current phase.
    ///
    /// An interrupted transition leaves zero or two open markers; this is
    /// how that state becomes visible.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.markers.is_empty() {
            return true;
        }
        self.open.len() == 1 && self.open[0] == self.current
    }
}

/// Inspect every marker of an asset folder.
///
/// Markers that cannot be read count as neither open nor closed.
pub fn inspect_phase(asset_folder: &Path, config: &LifecycleConfig) -> PhaseReport {
    let markers = list_markers(asset_folder, config);
    let current = markers
        .iter()
        .map(|m| m.code.clone())
        .max()
        .unwrap_or_default();

    let open = markers
        .iter()
        .filter(|m| {
            read_marker(&m.path)
                .map(|body: MarkerBody| body.is_open(config))
                .unwrap_or(false)
        })
        .map(|m| m.code.clone())
        .collect();

    PhaseReport {
        current,
        markers: markers.into_iter().map(|m| m.code).collect(),
        open,
    }
}

// =============================================================================
// TESTS
// =============================================================================
