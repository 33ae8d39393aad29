//! # Status Marker Bodies
//!
//! A marker body is line-oriented `Key: value` text. Only a handful of keys
//! carry meaning for the engine:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `STATUS` | Phase label at creation |
//! | `Phase Started` | Date the phase was entered |
//! | `Responsible PM` | Owner of the phase |
//! | `Target Completion` | Free text, usually a date or `TBD` |
//! | `Phase Closed` | Sentinel while open, closing date once closed |
//! | `Last Updated` / `Updated By` | Audit stamp of the last rewrite |
//! | `Closed By` | Actor that appended the closure |
//!
//! Closing a phase appends a second `Phase Closed:` line instead of rewriting
//! the file, so the last occurrence of a key is the one that counts.

use crate::config::LifecycleConfig;
use crate::phase::list_markers;
use crate::primitives::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::types::{LifecycleError, PhaseCode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

const KEY_STATUS: &str = "STATUS";
const KEY_STARTED: &str = "Phase Started";
const KEY_RESPONSIBLE: &str = "Responsible PM";
const KEY_TARGET: &str = "Target Completion";
const KEY_CLOSED: &str = "Phase Closed";
const KEY_LAST_UPDATED: &str = "Last Updated";
const KEY_UPDATED_BY: &str = "Updated By";
const KEY_CLOSED_BY: &str = "Closed By";

/// Placeholder for activity and milestone lines of a fresh marker.
pub const PLACEHOLDER: &str = "[To be updated]";

/// Target completion written when none is known.
pub const TARGET_TBD: &str = "TBD";

// =============================================================================
// NEW MARKER
// =============================================================================

/// Content of a marker about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDraft {
    pub status_label: String,
    pub phase_started: NaiveDate,
    pub responsible: String,
    pub target_completion: String,
    pub activities: Vec<String>,
    pub milestones: Vec<String>,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl MarkerDraft {
    /// Draft with placeholder activities, milestones and a `TBD` target.
    #[must_use]
    pub fn placeholder(
        status_label: &str,
        responsible: &str,
        now: NaiveDateTime,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            status_label: status_label.to_string(),
            phase_started: now.date(),
            responsible: responsible.to_string(),
            target_completion: TARGET_TBD.to_string(),
            activities: vec![PLACEHOLDER.to_string()],
            milestones: vec![PLACEHOLDER.to_string()],
            updated_at: now,
            updated_by: config.actor.clone(),
        }
    }

    /// Render the draft. The `Phase Closed:` field always holds the open sentinel.
    #[must_use]
    pub fn render(&self, config: &LifecycleConfig) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}: {}\n", KEY_STATUS, self.status_label));
        out.push_str(&format!(
            "{}: {}\n",
            KEY_STARTED,
            self.phase_started.format(DATE_FORMAT)
        ));
        out.push_str(&format!("{}: {}\n", KEY_RESPONSIBLE, self.responsible));
        out.push_str(&format!("{}: {}\n", KEY_TARGET, self.target_completion));
        out.push_str("\nKey Activities in Progress:\n");
        for (i, activity) in self.activities.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, activity));
        }
        out.push_str("\nNext Milestones:\n");
        for milestone in &self.milestones {
            out.push_str(&format!("- {}\n", milestone));
        }
        out.push('\n');
        out.push_str(&format!("{}: {}\n", KEY_CLOSED, config.open_sentinel));
        out.push_str(&format!(
            "{}: {}\n",
            KEY_LAST_UPDATED,
            self.updated_at.format(TIMESTAMP_FORMAT)
        ));
        out.push_str(&format!("{}: {}\n", KEY_UPDATED_BY, self.updated_by));
        out
    }
}

/// Write a marker, replacing any file of the same name.
pub fn write_marker(
    path: &Path,
    draft: &MarkerDraft,
    config: &LifecycleConfig,
) -> Result<(), LifecycleError> {
    std::fs::write(path, draft.render(config)).map_err(|e| LifecycleError::MarkerWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Append the closure lines to an existing marker.
pub fn append_closure(
    path: &Path,
    closed_on: NaiveDate,
    config: &LifecycleConfig,
) -> Result<(), LifecycleError> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| LifecycleError::Io(format!("Open {}: {}", path.display(), e)))?;
    write!(
        file,
        "\n{}: {}\n{}: {}\n",
        KEY_CLOSED,
        closed_on.format(DATE_FORMAT),
        KEY_CLOSED_BY,
        config.actor
    )
    .map_err(|e| LifecycleError::Io(format!("Append {}: {}", path.display(), e)))
}

// =============================================================================
// PARSED MARKER
// =============================================================================

/// Fields read back from a marker. Later occurrences of a key win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerBody {
    pub status: Option<String>,
    pub phase_started: Option<String>,
    pub responsible: Option<String>,
    pub target_completion: Option<String>,
    pub phase_closed: Option<String>,
    pub last_updated: Option<String>,
    pub updated_by: Option<String>,
    pub closed_by: Option<String>,
}

impl MarkerBody {
    /// Parse marker text. Unknown keys and free-text lines are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut body = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = Some(value.trim().to_string());
            match key.trim() {
                KEY_STATUS => body.status = value,
                KEY_STARTED => body.phase_started = value,
                KEY_RESPONSIBLE => body.responsible = value,
                KEY_TARGET => body.target_completion = value,
                KEY_CLOSED => body.phase_closed = value,
                KEY_LAST_UPDATED => body.last_updated = value,
                KEY_UPDATED_BY => body.updated_by = value,
                KEY_CLOSED_BY => body.closed_by = value,
                _ => {}
            }
        }
        body
    }

    /// A marker is open while `Phase Closed:` is absent or holds the sentinel.
    #[must_use]
    pub fn is_open(&self, config: &LifecycleConfig) -> bool {
        self.phase_closed
            .as_deref()
            .is_none_or(|closed| closed == config.open_sentinel)
    }

    /// The closing date, if the phase has been closed.
    #[must_use]
    pub fn closed_on(&self, config: &LifecycleConfig) -> Option<&str> {
        if self.is_open(config) {
            None
        } else {
            self.phase_closed.as_deref()
        }
    }
}

/// Read and parse a marker file.
pub fn read_marker(path: &Path) -> Result<MarkerBody, LifecycleError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LifecycleError::Io(format!("Read {}: {}", path.display(), e)))?;
    Ok(MarkerBody::parse(&text))
}

// =============================================================================
// TIMELINE
// =============================================================================

/// One phase of an asset's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub code: PhaseCode,
    pub phase_name: String,
    pub started: Option<String>,
    pub closed: Option<String>,
    pub responsible: Option<String>,
    pub active: bool,
}

/// Phase history of an asset, sorted by phase code.
///
/// Markers that cannot be read are skipped with a warning.
pub fn asset_timeline(asset_folder: &Path, config: &LifecycleConfig) -> Vec<TimelineEntry> {
    let mut timeline: Vec<TimelineEntry> = list_markers(asset_folder, config)
        .into_iter()
        .filter_map(|marker| match read_marker(&marker.path) {
            Ok(body) => {
                let closed = body.closed_on(config).map(String::from);
                Some(TimelineEntry {
                    phase_name: config.phase_name(&marker.code).to_string(),
                    code: marker.code,
                    started: body.phase_started,
                    active: closed.is_none(),
                    closed,
                    responsible: body.responsible,
                })
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable marker {}: {}", marker.name, e);
                None
            }
        })
        .collect();

    timeline.sort_by(|a, b| a.code.cmp(&b.code));
    timeline
}

// =============================================================================
// TESTS
// =============================================================================
