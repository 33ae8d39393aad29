//! # New-Asset Creation
//!
//! Creates an asset folder, pre-populates its canonical tree and writes the
//! marker of the first phase. The tree comes from one of three sources:
//!
//! - `Template`: a folder copied recursively (markers in it are not copied)
//! - `Script`: an external program invoked with the new asset path
//! - `Bare`: an empty folder

use crate::config::LifecycleConfig;
use crate::marker::{MarkerDraft, write_marker};
use crate::naming::asset_folder_name;
use crate::primitives::DATE_FORMAT;
use crate::types::LifecycleError;
use chrono::{Days, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Where the canonical folder tree of a new asset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scaffold {
    Template(PathBuf),
    Script(PathBuf),
    Bare,
}

/// Identity and owner of an asset to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub subcompany: String,
    pub asset_type: String,
    pub asset_id: String,
    pub name: String,
    pub location: String,
    pub responsible: String,
}

impl NewAsset {
    /// Folder name this asset will live under.
    #[must_use]
    pub fn folder_name(&self) -> String {
        asset_folder_name(
            &self.subcompany,
            &self.asset_type,
            &self.asset_id,
            &self.name,
            &self.location,
        )
    }
}

/// Result of `create_asset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAsset {
    pub path: PathBuf,
    /// `true` when the folder was already there and nothing was written.
    pub already_existed: bool,
}

/// Create a new asset under `assets_root`.
///
/// An existing asset folder is returned untouched. On any scaffold or marker
/// failure the error is returned; a partly created folder is left in place
/// for the operator to inspect.
pub fn create_asset(
    assets_root: &Path,
    asset: &NewAsset,
    scaffold: &Scaffold,
    now: NaiveDateTime,
    config: &LifecycleConfig,
) -> Result<CreatedAsset, LifecycleError> {
    let path = assets_root.join(asset.folder_name());
    if path.exists() {
        tracing::info!("Asset already exists: {}", path.display());
        return Ok(CreatedAsset {
            path,
            already_existed: true,
        });
    }

    tracing::info!("Creating new asset: {}", asset.folder_name());
    match scaffold {
        Scaffold::Template(template) => copy_template(template, &path, config)?,
        Scaffold::Script(script) => run_scaffold_script(script, &path)?,
        Scaffold::Bare => {}
    }
    std::fs::create_dir_all(&path)
        .map_err(|e| LifecycleError::Io(format!("Create {}: {}", path.display(), e)))?;

    let initial = config.initial_phase()?;
    let marker_path = path.join(config.marker_filename(&initial.code));
    write_marker(&marker_path, &initial_draft(asset, now, config)?, config)?;

    tracing::info!("Asset created successfully: {}", path.display());
    Ok(CreatedAsset {
        path,
        already_existed: false,
    })
}

/// First-phase marker: target completion and milestones from the configured offsets.
fn initial_draft(
    asset: &NewAsset,
    now: NaiveDateTime,
    config: &LifecycleConfig,
) -> Result<MarkerDraft, LifecycleError> {
    let initial = config.initial_phase()?;
    let today = now.date();
    let offset = |days: u64| {
        today
            .checked_add_days(Days::new(days))
            .map(|d| d.format(DATE_FORMAT).to_string())
            .ok_or_else(|| LifecycleError::Config(format!("date offset of {} days overflows", days)))
    };
    let (site_visit, decision) = config.initial_milestone_days;

    let mut draft = MarkerDraft::placeholder(&initial.label, &asset.responsible, now, config);
    draft.target_completion = offset(config.initial_target_days)?;
    draft.activities = vec![
        "Initial site identification".to_string(),
        "Preliminary market research".to_string(),
        "High-level feasibility assessment".to_string(),
    ];
    draft.milestones = vec![
        format!("Site visit: {}", offset(site_visit)?),
        format!("Go/No-Go Decision: {}", offset(decision)?),
    ];
    Ok(draft)
}

/// Copy a template tree into `dest`, skipping status markers.
fn copy_template(
    template: &Path,
    dest: &Path,
    config: &LifecycleConfig,
) -> Result<(), LifecycleError> {
    if !template.is_dir() {
        return Err(LifecycleError::Scaffold(format!(
            "template not found: {}",
            template.display()
        )));
    }

    for entry in WalkDir::new(template) {
        let entry = entry.map_err(|e| LifecycleError::Scaffold(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(template)
            .map_err(|e| LifecycleError::Scaffold(e.to_string()))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| LifecycleError::Scaffold(format!("{}: {}", target.display(), e)))?;
        } else if !config.is_marker(&entry.file_name().to_string_lossy()) {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| LifecycleError::Scaffold(format!("{}: {}", target.display(), e)))?;
        }
    }
    Ok(())
}

/// Invoke the external scaffold script with the asset path as its only argument.
fn run_scaffold_script(script: &Path, dest: &Path) -> Result<(), LifecycleError> {
    let output = Command::new(script)
        .arg(dest)
        .output()
        .map_err(|e| LifecycleError::Scaffold(format!("{}: {}", script.display(), e)))?;

    if output.status.success() {
        tracing::debug!(
            "Scaffold script output: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        return Ok(());
    }

    Err(LifecycleError::Scaffold(format!(
        "{} exited with {}\nstderr: {}\nstdout: {}",
        script.display(),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim(),
        String::from_utf8_lossy(&output.stdout).trim()
    )))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::read_marker;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .expect("now")
    }

    fn solar() -> NewAsset {
        NewAsset {
            subcompany: "AEN".to_string(),
            asset_type: "PV".to_string(),
            asset_id: "030".to_string(),
            name: "New-Solar-Project".to_string(),
            location: "Crete".to_string(),
            responsible: "John Smith".to_string(),
        }
    }

    #[test]
    fn bare_asset_gets_initial_marker() {
        let root = TempDir::new().expect("tempdir");
        let config = LifecycleConfig::default();
        let created = create_asset(root.path(), &solar(), &Scaffold::Bare, now(), &config)
            .expect("create");

        assert!(!created.already_existed);
        assert!(created.path.ends_with("AEN_PV030_New-Solar-Project_Crete"));
        let marker = created.path.join("_STATUS_01_PIPELINE.txt");
        let body = read_marker(&marker).expect("read");
        assert_eq!(body.status.as_deref(), Some("PIPELINE"));
        assert_eq!(body.phase_started.as_deref(), Some("2024-01-10"));
        assert_eq!(body.target_completion.as_deref(), Some("2024-04-09"));
        assert_eq!(body.responsible.as_deref(), Some("John Smith"));
        assert!(body.is_open(&config));

        let text = std::fs::read_to_string(marker).expect("read");
        assert!(text.contains("- Site visit: 2024-01-24\n"));
        assert!(text.contains("- Go/No-Go Decision: 2024-03-10\n"));
    }

    #[test]
    fn existing_asset_untouched() {
        let root = TempDir::new().expect("tempdir");
        let existing = root.path().join(solar().folder_name());
        std::fs::create_dir(&existing).expect("mkdir");

        let created = create_asset(
            root.path(),
            &solar(),
            &Scaffold::Bare,
            now(),
            &LifecycleConfig::default(),
        )
        .expect("create");
        assert!(created.already_existed);
        assert!(!existing.join("_STATUS_01_PIPELINE.txt").exists());
    }

    #[test]
    fn template_tree_copied_without_markers() {
        let root = TempDir::new().expect("tempdir");
        let template = root.path().join("TEMPLATES/ASSET_LIFECYCLE_TEMPLATE");
        std::fs::create_dir_all(template.join("02_FEASIBILITY/Financial_Model")).expect("mkdir");
        std::fs::write(template.join("00_README.txt"), "hello").expect("write");
        std::fs::write(template.join("_STATUS_04_OPERATIONAL.txt"), "").expect("write");
        let assets = root.path().join("ASSETS");

        let created = create_asset(
            &assets,
            &solar(),
            &Scaffold::Template(template),
            now(),
            &LifecycleConfig::default(),
        )
        .expect("create");

        assert!(created.path.join("02_FEASIBILITY/Financial_Model").is_dir());
        assert!(created.path.join("00_README.txt").is_file());
        assert!(!created.path.join("_STATUS_04_OPERATIONAL.txt").exists());
    }

    #[test]
    fn missing_template_is_scaffold_error() {
        let root = TempDir::new().expect("tempdir");
        let result = create_asset(
            root.path(),
            &solar(),
            &Scaffold::Template(root.path().join("nope")),
            now(),
            &LifecycleConfig::default(),
        );
        assert!(matches!(result, Err(LifecycleError::Scaffold(_))));
    }

    #[test]
    fn missing_script_is_scaffold_error() {
        let root = TempDir::new().expect("tempdir");
        let result = create_asset(
            root.path(),
            &solar(),
            &Scaffold::Script(root.path().join("no-such-script")),
            now(),
            &LifecycleConfig::default(),
        );
        assert!(matches!(result, Err(LifecycleError::Scaffold(_))));
    }
}
