//! # Phase Transition Protocol
//!
//! Moving an asset into a new phase is three filesystem steps:
//!
//! 1. Close the marker of the current phase by appending a closure stamp.
//! 2. Write the marker of the new phase with the open sentinel.
//! 3. Lock the subfolders the phase table marks complete for the new phase.
//!
//! Only step 2 is fatal: without the new marker the asset has no inferable
//! phase. A missing current marker is tolerated, a failed closure is logged,
//! and locking is best-effort.
//!
//! The target code is checked against the phase table before anything is
//! touched. A code outside the table (`"3"`, `""`, `"09"`) is refused with
//! `InvalidPhase`.
//!
//! Steps 1 and 2 are not atomic as a pair. A crash in between leaves no open
//! marker; [`crate::phase::inspect_phase`] reports that state.
//!
//! ## Ordering
//!
//! Any `(current, target)` pair of known phases is accepted. Skips and
//! regressions are logged and reported through [`Direction`], never refused.
//! A repeat keeps the existing marker of the phase as it is: nothing is
//! closed or rewritten, so its start date and history survive.

use crate::config::LifecycleConfig;
use crate::marker::{MarkerDraft, append_closure, write_marker};
use crate::phase::{infer_phase, list_markers};
use crate::protect::{ProtectOutcome, Protector};
use crate::types::{LifecycleError, PhaseCode};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

// =============================================================================
// REPORT
// =============================================================================

/// How the target phase relates to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Next phase in the table.
    Forward,
    /// Later phase, skipping at least one phase in between.
    Skip,
    /// Same phase again.
    Repeat,
    /// Earlier phase.
    Regression,
}

impl Direction {
    /// Classify `from -> to` against the phase table.
    #[must_use]
    pub fn classify(from: &PhaseCode, to: &PhaseCode, config: &LifecycleConfig) -> Self {
        match to.cmp(from) {
            Ordering::Equal => Self::Repeat,
            Ordering::Less => Self::Regression,
            Ordering::Greater => {
                let skipped = config
                    .phases
                    .iter()
                    .any(|p| &p.code > from && &p.code < to);
                if skipped { Self::Skip } else { Self::Forward }
            }
        }
    }
}

/// A subfolder the transition tried to lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedFolder {
    pub folder: String,
    pub outcome: ProtectOutcome,
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    pub from: PhaseCode,
    pub to: PhaseCode,
    pub direction: Direction,
    /// Marker that received the closure stamp, if any.
    pub closed_marker: Option<PathBuf>,
    /// Why closing the current marker failed, if it did.
    pub close_failure: Option<String>,
    /// The marker of the new phase. On a repeat this is the existing marker.
    pub new_marker: PathBuf,
    /// False when an existing marker was kept instead of writing a new one.
    pub marker_written: bool,
    /// Lock attempts, one per existing configured subfolder.
    pub locks: Vec<LockedFolder>,
}

// =============================================================================
// PROTOCOL
// =============================================================================

/// Transition the asset at `asset_folder` into `new_phase`.
///
/// Fails with `InvalidPhase` or `AssetNotFound` (and touches nothing) when
/// the code is not in the phase table or the folder is missing, and with
/// `MarkerWrite` when the new marker cannot be written.
pub fn transition_phase(
    asset_folder: &Path,
    new_phase: &PhaseCode,
    responsible: &str,
    now: NaiveDateTime,
    config: &LifecycleConfig,
    protector: &dyn Protector,
) -> Result<TransitionReport, LifecycleError> {
    let new_phase = &match config.known_phase(new_phase.as_str()) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("Refusing transition of {}: {}", asset_folder.display(), e);
            return Err(e);
        }
    };
    if !asset_folder.is_dir() {
        tracing::warn!("Asset not found: {}", asset_folder.display());
        return Err(LifecycleError::AssetNotFound(asset_folder.to_path_buf()));
    }

    let current = infer_phase(asset_folder, config);
    let direction = Direction::classify(&current, new_phase, config);
    tracing::info!(
        "Transitioning {} from phase {} to {}",
        asset_folder.display(),
        current,
        new_phase
    );
    if !matches!(direction, Direction::Forward) {
        tracing::warn!(
            "Transition {} -> {} is {:?}; proceeding as requested",
            current,
            new_phase,
            direction
        );
    }

    let current_marker = list_markers(asset_folder, config)
        .into_iter()
        .find(|m| m.code == current);

    if let (Direction::Repeat, Some(marker)) = (direction, &current_marker) {
        tracing::info!("Already in phase {}; keeping {}", current, marker.name);
        let locks = lock_completed(asset_folder, new_phase, config, protector);
        return Ok(TransitionReport {
            from: current,
            to: new_phase.clone(),
            direction,
            closed_marker: None,
            close_failure: None,
            new_marker: marker.path.clone(),
            marker_written: false,
            locks,
        });
    }

    // Close the current marker
    let mut closed_marker = None;
    let mut close_failure = None;
    match current_marker {
        Some(marker) => match append_closure(&marker.path, now.date(), config) {
            Ok(()) => closed_marker = Some(marker.path),
            Err(e) => {
                tracing::warn!("Cannot close {}: {}", marker.name, e);
                close_failure = Some(e.to_string());
            }
        },
        None => tracing::debug!("No marker for phase {}; nothing to close", current),
    }

    // Open the new marker
    let new_marker = asset_folder.join(config.marker_filename(new_phase));
    let draft = MarkerDraft::placeholder(config.phase_label(new_phase), responsible, now, config);
    write_marker(&new_marker, &draft, config)?;

    // Lock completed folders
    let locks = lock_completed(asset_folder, new_phase, config, protector);

    tracing::info!("Phase transition to {} completed", new_phase);
    Ok(TransitionReport {
        from: current,
        to: new_phase.clone(),
        direction,
        closed_marker,
        close_failure,
        new_marker,
        marker_written: true,
        locks,
    })
}

/// Apply protection to every configured subfolder of `new_phase` that exists.
pub fn lock_completed(
    asset_folder: &Path,
    new_phase: &PhaseCode,
    config: &LifecycleConfig,
    protector: &dyn Protector,
) -> Vec<LockedFolder> {
    config
        .locked_folders(new_phase)
        .iter()
        .filter(|folder| asset_folder.join(folder.as_str()).is_dir())
        .map(|folder| {
            let outcome = protector.protect(&asset_folder.join(folder.as_str()));
            match &outcome {
                ProtectOutcome::Applied => tracing::info!("Locked {}", folder),
                ProtectOutcome::Unsupported(reason) => {
                    tracing::warn!("Could not lock {}: {}", folder, reason);
                }
            }
            LockedFolder {
                folder: folder.clone(),
                outcome,
            }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_classification() {
        let config = LifecycleConfig::default();
        let c = |s: &str| PhaseCode::new(s);
        assert_eq!(Direction::classify(&c("01"), &c("02"), &config), Direction::Forward);
        assert_eq!(Direction::classify(&c("01"), &c("03"), &config), Direction::Skip);
        assert_eq!(Direction::classify(&c("03"), &c("03"), &config), Direction::Repeat);
        assert_eq!(Direction::classify(&c("04"), &c("02"), &config), Direction::Regression);
        assert_eq!(Direction::classify(&PhaseCode::none(), &c("01"), &config), Direction::Forward);
        assert_eq!(Direction::classify(&PhaseCode::none(), &c("02"), &config), Direction::Skip);
    }

    #[test]
    fn phase_is_checked_before_the_folder() {
        let result = transition_phase(
            Path::new("/nonexistent/AEN_PV1_X_Y"),
            &PhaseCode::new("3"),
            "X",
            NaiveDateTime::default(),
            &LifecycleConfig::default(),
            &crate::protect::NoopProtector,
        );
        assert!(matches!(result, Err(LifecycleError::InvalidPhase(_))));
    }
}
