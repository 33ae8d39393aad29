//! # Portfolio Inventory
//!
//! Asset discovery over the assets root and the metrics derived from it.
//! Everything here is a read-only reduction over the folder tree.

use crate::config::LifecycleConfig;
use crate::naming::parse_asset_folder_name;
use crate::phase::infer_phase;
use crate::primitives::RECENT_ACTIVITY_DAYS;
use crate::types::{AssetIdentity, LifecycleError, PhaseCode};
use chrono::{DateTime, Days, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// =============================================================================
// FOLDER STATS
// =============================================================================

/// Recursive size statistics of a folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    pub file_count: u64,
    pub total_bytes: u64,
    pub last_modified: Option<NaiveDate>,
}

/// Walk `folder` and total its files. Unreadable entries are skipped.
pub fn folder_stats(folder: &Path) -> FolderStats {
    let mut stats = FolderStats::default();
    for entry in WalkDir::new(folder).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        stats.file_count += 1;
        stats.total_bytes = stats.total_bytes.saturating_add(metadata.len());
        if let Ok(modified) = metadata.modified() {
            let date = DateTime::<Local>::from(modified).date_naive();
            if stats.last_modified.is_none_or(|last| date > last) {
                stats.last_modified = Some(date);
            }
        }
    }
    stats
}

// =============================================================================
// DISCOVERY
// =============================================================================

/// One discovered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    #[serde(flatten)]
    pub identity: AssetIdentity,
    pub phase: PhaseCode,
    pub phase_name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub stats: FolderStats,
}

/// Discover every asset folder directly under `assets_root`, sorted by name.
///
/// Non-directories are ignored; folder names that do not parse are skipped
/// with a warning. A missing root yields an empty inventory.
pub fn discover_assets(
    assets_root: &Path,
    config: &LifecycleConfig,
) -> Result<Vec<AssetRecord>, LifecycleError> {
    let entries = match std::fs::read_dir(assets_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Assets root not found: {}", assets_root.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(LifecycleError::Io(format!(
                "List {}: {}",
                assets_root.display(),
                e
            )));
        }
    };

    let mut folders: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let mut assets = Vec::new();
    for path in folders {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let identity = match parse_asset_folder_name(&name) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Error parsing {}: {}", name, e);
                continue;
            }
        };
        let phase = infer_phase(&path, config);
        assets.push(AssetRecord {
            phase_name: config.phase_name(&phase).to_string(),
            phase,
            stats: folder_stats(&path),
            identity,
            path,
        });
    }

    tracing::info!("Discovered {} assets", assets.len());
    Ok(assets)
}

// =============================================================================
// FILTER
// =============================================================================

/// Criteria for selecting inventory records. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub asset_type: Option<String>,
    pub phase: Option<PhaseCode>,
    pub subcompany: Option<String>,
}

impl AssetFilter {
    #[must_use]
    pub fn matches(&self, record: &AssetRecord) -> bool {
        self.asset_type
            .as_ref()
            .is_none_or(|t| &record.identity.asset_type == t)
            && self.phase.as_ref().is_none_or(|p| &record.phase == p)
            && self
                .subcompany
                .as_ref()
                .is_none_or(|s| &record.identity.subcompany == s)
    }

    /// Records matching this filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [AssetRecord]) -> Vec<&'a AssetRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

// =============================================================================
// METRICS
// =============================================================================

/// Totals for one slice of the portfolio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    pub assets: usize,
    pub files: u64,
    pub bytes: u64,
}

impl GroupTotals {
    fn add(&mut self, record: &AssetRecord) {
        self.assets += 1;
        self.files = self.files.saturating_add(record.stats.file_count);
        self.bytes = self.bytes.saturating_add(record.stats.total_bytes);
    }
}

/// Assets and files touched within the recent-activity window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    pub window_days: u64,
    pub assets_modified: usize,
    pub files_modified: u64,
}

/// Portfolio-wide metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioMetrics {
    pub total_assets: usize,
    pub total_files: u64,
    pub total_bytes: u64,
    /// Keyed by asset type code.
    pub by_type: BTreeMap<String, GroupTotals>,
    /// Keyed by phase display name.
    pub by_phase: BTreeMap<String, GroupTotals>,
    pub by_subcompany: BTreeMap<String, GroupTotals>,
    /// Asset type -> phase name -> asset count.
    pub type_phase_matrix: BTreeMap<String, BTreeMap<String, usize>>,
    pub recent_activity: RecentActivity,
}

impl PortfolioMetrics {
    /// Compute metrics over an inventory.
    ///
    /// An asset counts as recently active when its last modification is
    /// strictly after `today` minus 30 days.
    #[must_use]
    pub fn from_records(records: &[AssetRecord], today: NaiveDate) -> Self {
        let cutoff = today
            .checked_sub_days(Days::new(RECENT_ACTIVITY_DAYS))
            .unwrap_or(NaiveDate::MIN);

        let mut metrics = Self {
            total_assets: records.len(),
            recent_activity: RecentActivity {
                window_days: RECENT_ACTIVITY_DAYS,
                ..RecentActivity::default()
            },
            ..Self::default()
        };

        for record in records {
            metrics.total_files = metrics.total_files.saturating_add(record.stats.file_count);
            metrics.total_bytes = metrics.total_bytes.saturating_add(record.stats.total_bytes);

            metrics
                .by_type
                .entry(record.identity.asset_type.clone())
                .or_default()
                .add(record);
            metrics
                .by_phase
                .entry(record.phase_name.clone())
                .or_default()
                .add(record);
            metrics
                .by_subcompany
                .entry(record.identity.subcompany.clone())
                .or_default()
                .add(record);
            *metrics
                .type_phase_matrix
                .entry(record.identity.asset_type.clone())
                .or_default()
                .entry(record.phase_name.clone())
                .or_default() += 1;

            if record.stats.last_modified.is_some_and(|d| d > cutoff) {
                metrics.recent_activity.assets_modified += 1;
                metrics.recent_activity.files_modified = metrics
                    .recent_activity
                    .files_modified
                    .saturating_add(record.stats.file_count);
            }
        }
        metrics
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(folder: &str, phase: &str, files: u64, bytes: u64, last: Option<NaiveDate>) -> AssetRecord {
        let config = LifecycleConfig::default();
        let phase = PhaseCode::new(phase);
        AssetRecord {
            identity: parse_asset_folder_name(folder).expect("parse"),
            phase_name: config.phase_name(&phase).to_string(),
            phase,
            path: PathBuf::from(folder),
            stats: FolderStats {
                file_count: files,
                total_bytes: bytes,
                last_modified: last,
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn discovery_skips_files_and_bad_names() {
        let dir = TempDir::new().expect("tempdir");
        let asset = dir.path().join("AEN_PV025_Sunfield_Athens");
        std::fs::create_dir(&asset).expect("mkdir");
        std::fs::write(asset.join("_STATUS_02_UNDER DEVELOPMENT.txt"), "").expect("write");
        std::fs::write(asset.join("doc.pdf"), vec![0u8; 10]).expect("write");
        std::fs::create_dir(dir.path().join("TEMPLATES")).expect("mkdir");
        std::fs::write(dir.path().join("AEN_PV1_File_X.txt"), "").expect("write");

        let assets = discover_assets(dir.path(), &LifecycleConfig::default()).expect("discover");
        assert_eq!(assets.len(), 1);
        let a = &assets[0];
        assert_eq!(a.identity.asset_type, "PV");
        assert_eq!(a.phase, PhaseCode::new("02"));
        assert_eq!(a.phase_name, "Under Development");
        assert_eq!(a.stats.file_count, 2);
        assert_eq!(a.stats.total_bytes, 10);
        assert!(a.stats.last_modified.is_some());
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let assets =
            discover_assets(&dir.path().join("ASSETS"), &LifecycleConfig::default()).expect("ok");
        assert!(assets.is_empty());
    }

    #[test]
    fn folder_stats_counts_nested_files() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("a/b")).expect("mkdir");
        std::fs::write(dir.path().join("a/b/x"), vec![0u8; 5]).expect("write");
        std::fs::write(dir.path().join("y"), vec![0u8; 7]).expect("write");

        let stats = folder_stats(dir.path());
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 12);
    }

    #[test]
    fn metrics_group_by_type_phase_and_subcompany() {
        let today = date(2024, 6, 30);
        let records = vec![
            record("AEN_PV1_A_X", "01", 10, 100, Some(date(2024, 6, 20))),
            record("AEN_PV2_B_X", "04", 5, 50, Some(date(2024, 1, 1))),
            record("BRK_HTL3_C_Y", "04", 1, 1, None),
        ];
        let metrics = PortfolioMetrics::from_records(&records, today);

        assert_eq!(metrics.total_assets, 3);
        assert_eq!(metrics.total_files, 16);
        assert_eq!(metrics.total_bytes, 151);
        assert_eq!(metrics.by_type["PV"].assets, 2);
        assert_eq!(metrics.by_type["PV"].files, 15);
        assert_eq!(metrics.by_phase["Operational"].assets, 2);
        assert_eq!(metrics.by_subcompany["BRK"].bytes, 1);
        assert_eq!(metrics.type_phase_matrix["PV"]["Pipeline"], 1);
        assert_eq!(metrics.type_phase_matrix["HTL"]["Operational"], 1);
        assert_eq!(metrics.recent_activity.assets_modified, 1);
        assert_eq!(metrics.recent_activity.files_modified, 10);
    }

    #[test]
    fn recent_window_is_exclusive() {
        let today = date(2024, 6, 30);
        let records = vec![record("AEN_PV1_A_X", "01", 1, 1, Some(date(2024, 5, 31)))];
        let metrics = PortfolioMetrics::from_records(&records, today);
        assert_eq!(metrics.recent_activity.assets_modified, 0);
    }

    #[test]
    fn filter_combines_criteria() {
        let records = vec![
            record("AEN_PV1_A_X", "01", 0, 0, None),
            record("AEN_PV2_B_X", "04", 0, 0, None),
            record("BRK_PV3_C_Y", "04", 0, 0, None),
        ];
        let filter = AssetFilter {
            asset_type: Some("PV".to_string()),
            phase: Some(PhaseCode::new("04")),
            subcompany: None,
        };
        let hits = filter.apply(&records);
        assert_eq!(hits.len(), 2);

        let narrower = AssetFilter {
            subcompany: Some("AEN".to_string()),
            ..filter
        };
        let hits = narrower.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identity.asset_name, "B");
        assert_eq!(AssetFilter::default().apply(&records).len(), 3);
    }
}
