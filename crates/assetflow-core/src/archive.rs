//! # Superseded-Version Archival
//!
//! Moves every variant of a document group except the newest `keep_latest`
//! into the archival subfolder (`_SUPERSEDED`) of the folder being cleaned.
//!
//! ## Rules
//!
//! - Only immediate files of the folder are considered.
//! - A group with any member whose name contains an exemption keyword
//!   (`FINAL`, `APPROVED`; case-sensitive) is never touched.
//! - A failed move is recorded and the batch continues.
//! - Re-running is safe: moved files are no longer in the folder.

use crate::config::LifecycleConfig;
use crate::types::{FileVariant, LifecycleError};
use crate::versioning::{group_by_base_name, list_variants, rank_variants};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default number of newest variants kept in place.
pub const DEFAULT_KEEP_LATEST: usize = 1;

/// A file that was moved into the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedFile {
    pub group: String,
    pub name: String,
    pub destination: PathBuf,
}

/// A file that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMove {
    pub name: String,
    pub reason: String,
}

/// Outcome of one archival run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Files moved, in the order they were moved.
    pub moved: Vec<ArchivedFile>,
    /// Files whose move failed.
    pub failed: Vec<FailedMove>,
    /// Base names skipped because a member is final or approved.
    pub exempt_groups: Vec<String>,
}

impl ArchiveReport {
    /// Number of files moved.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }
}

/// Whether a group is exempt from archival.
#[must_use]
pub fn is_exempt(group: &[FileVariant], config: &LifecycleConfig) -> bool {
    group.iter().any(|variant| {
        config
            .exempt_keywords
            .iter()
            .any(|keyword| variant.name.contains(keyword.as_str()))
    })
}

/// Move superseded variants of `folder` into its archival subfolder.
///
/// A missing folder yields an empty report without touching anything.
/// Failing to create the archival subfolder is the only error.
pub fn archive_superseded(
    folder: &Path,
    keep_latest: usize,
    config: &LifecycleConfig,
) -> Result<ArchiveReport, LifecycleError> {
    if !folder.is_dir() {
        tracing::warn!("Path not found: {}", folder.display());
        return Ok(ArchiveReport::default());
    }

    let archive = folder.join(&config.archive_dir);
    std::fs::create_dir_all(&archive)
        .map_err(|e| LifecycleError::Io(format!("Create {}: {}", archive.display(), e)))?;

    let variants = list_variants(folder)?
        .into_iter()
        .filter(|v| !config.is_marker(&v.name));
    let groups = group_by_base_name(variants);

    let mut report = ArchiveReport::default();
    for (base, mut group) in groups {
        if is_exempt(&group, config) {
            tracing::debug!("Exempt group {}", base);
            report.exempt_groups.push(base);
            continue;
        }

        rank_variants(&mut group);
        for variant in group.into_iter().skip(keep_latest) {
            let destination = archive.join(&variant.name);
            match std::fs::rename(&variant.path, &destination) {
                Ok(()) => {
                    tracing::info!("Moved to {}: {}", config.archive_dir, variant.name);
                    report.moved.push(ArchivedFile {
                        group: base.clone(),
                        name: variant.name,
                        destination,
                    });
                }
                Err(e) => {
                    tracing::warn!("Cannot move {}: {}", variant.name, e);
                    report.failed.push(FailedMove {
                        name: variant.name,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        "Total files moved to {}: {}",
        config.archive_dir,
        report.moved_count()
    );
    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_aged(dir: &Path, name: &str, age_secs: u64) {
        let path = dir.join(name);
        std::fs::write(&path, name).expect("write");
        let file = std::fs::File::options()
            .write(true)
            .open(&path)
            .expect("open");
        let when = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(when).expect("set mtime");
    }

    fn exists(dir: &Path, name: &str) -> bool {
        dir.join(name).exists()
    }

    #[test]
    fn keeps_newest_and_moves_rest() {
        let dir = TempDir::new().expect("tempdir");
        let config = LifecycleConfig::default();
        write_aged(dir.path(), "A_B_C_D_2024-01-01_v01.txt", 300);
        write_aged(dir.path(), "A_B_C_D_2024-02-01_v02.txt", 200);
        write_aged(dir.path(), "A_B_C_D_2024-03-01_v03.txt", 100);

        let report = archive_superseded(dir.path(), 1, &config).expect("archive");
        assert_eq!(report.moved_count(), 2);
        assert!(exists(dir.path(), "A_B_C_D_2024-03-01_v03.txt"));
        let archive = dir.path().join("_SUPERSEDED");
        assert!(exists(&archive, "A_B_C_D_2024-01-01_v01.txt"));
        assert!(exists(&archive, "A_B_C_D_2024-02-01_v02.txt"));

        let again = archive_superseded(dir.path(), 1, &config).expect("archive");
        assert_eq!(again.moved_count(), 0);
    }

    #[test]
    fn final_group_exempt() {
        let dir = TempDir::new().expect("tempdir");
        let config = LifecycleConfig::default();
        write_aged(dir.path(), "A_B_C_D_2024-01-01_FINAL.pdf", 500);
        for (i, age) in [400, 300, 200, 100].iter().enumerate() {
            write_aged(dir.path(), &format!("A_B_C_D_2024-0{}-01_v0{}.pdf", i + 2, i + 2), *age);
        }

        let report = archive_superseded(dir.path(), 1, &config).expect("archive");
        assert_eq!(report.moved_count(), 0);
        assert_eq!(report.exempt_groups, vec!["A_B_C_D".to_string()]);
        assert!(exists(dir.path(), "A_B_C_D_2024-01-01_FINAL.pdf"));
    }

    #[test]
    fn exemption_is_case_sensitive() {
        let dir = TempDir::new().expect("tempdir");
        write_aged(dir.path(), "A_B_C_D_final_v01.pdf", 200);
        write_aged(dir.path(), "A_B_C_D_final_v02.pdf", 100);

        let report =
            archive_superseded(dir.path(), 1, &LifecycleConfig::default()).expect("archive");
        assert_eq!(report.moved_count(), 1);
        assert!(exists(dir.path(), "A_B_C_D_final_v02.pdf"));
    }

    #[test]
    fn keep_latest_two() {
        let dir = TempDir::new().expect("tempdir");
        write_aged(dir.path(), "A_B_C_D_d1_v01.txt", 300);
        write_aged(dir.path(), "A_B_C_D_d2_v02.txt", 200);
        write_aged(dir.path(), "A_B_C_D_d3_v03.txt", 100);

        let report =
            archive_superseded(dir.path(), 2, &LifecycleConfig::default()).expect("archive");
        assert_eq!(report.moved_count(), 1);
        assert_eq!(report.moved[0].name, "A_B_C_D_d1_v01.txt");
    }

    #[test]
    fn short_names_never_moved() {
        let dir = TempDir::new().expect("tempdir");
        write_aged(dir.path(), "notes_old.txt", 300);
        write_aged(dir.path(), "notes_new.txt", 100);

        let report =
            archive_superseded(dir.path(), 1, &LifecycleConfig::default()).expect("archive");
        assert_eq!(report.moved_count(), 0);
        assert!(dir.path().join("_SUPERSEDED").is_dir());
    }

    #[test]
    fn missing_folder_is_empty_result() {
        let dir = TempDir::new().expect("tempdir");
        let target = dir.path().join("02_FEASIBILITY");
        let report = archive_superseded(&target, 1, &LifecycleConfig::default()).expect("archive");
        assert_eq!(report, ArchiveReport::default());
        assert!(!target.exists());
    }

    #[test]
    fn markers_are_not_documents() {
        let dir = TempDir::new().expect("tempdir");
        write_aged(dir.path(), "_STATUS_03_UNDER_CONSTRUCTION.txt", 300);
        write_aged(dir.path(), "_STATUS_03_UNDER_CONSTRUCTION_old.txt", 100);

        let report =
            archive_superseded(dir.path(), 1, &LifecycleConfig::default()).expect("archive");
        assert_eq!(report.moved_count(), 0);
    }
}
