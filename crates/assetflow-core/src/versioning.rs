//! # Version Grouping
//!
//! Groups document variants by base name (every token but the trailing date
//! and version) and ranks each group by recency.
//!
//! Grouping is structural only: `A_B_C_D_2024-01-01_v01.txt` and
//! `A_B_C_D_2024-02-01_v02.txt` share the base `A_B_C_D`. Names with fewer
//! than five tokens never group and are therefore never archived.

use crate::naming::base_name;
use crate::types::{FileVariant, LifecycleError};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;

/// Base name -> variants, in listing order.
pub type VersionGroups = BTreeMap<String, Vec<FileVariant>>;

/// Group variants by base name.
///
/// Variants keep the order in which they are supplied within their group.
/// Variants whose names have fewer than five tokens are dropped.
pub fn group_by_base_name(variants: impl IntoIterator<Item = FileVariant>) -> VersionGroups {
    let mut groups = VersionGroups::new();
    for variant in variants {
        if let Some(base) = base_name(&variant.name) {
            groups.entry(base).or_default().push(variant);
        }
    }
    groups
}

/// Sort a group newest first.
///
/// Ties on modification time are broken by file name, ascending, so the
/// ranking never depends on directory listing order.
pub fn rank_variants(group: &mut [FileVariant]) {
    group.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// List the regular files directly inside `folder`, sorted by name.
///
/// Entries whose metadata cannot be read are skipped with a warning; a
/// missing folder is an `AssetNotFound` error.
pub fn list_variants(folder: &Path) -> Result<Vec<FileVariant>, LifecycleError> {
    let entries = std::fs::read_dir(folder).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LifecycleError::AssetNotFound(folder.to_path_buf()),
        _ => LifecycleError::Io(format!("List {}: {}", folder.display(), e)),
    })?;

    let mut variants = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        variants.push(FileVariant::new(
            entry.file_name().to_string_lossy().into_owned(),
            entry.path(),
            modified,
        ));
    }

    variants.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(variants)
}

// =============================================================================
// TESTS
// =============================================================================
