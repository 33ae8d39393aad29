//! # Lifecycle Engine
//!
//! `Lifecycle` bundles the configuration, the protection capability and the
//! assets root, and exposes every operation by asset folder name. It holds no
//! cached state: each call reads the file server again.

use crate::archive::{ArchiveReport, archive_superseded};
use crate::config::LifecycleConfig;
use crate::inventory::{AssetRecord, discover_assets};
use crate::marker::{TimelineEntry, asset_timeline};
use crate::phase::{PhaseReport, infer_phase, inspect_phase};
use crate::protect::{Protector, ReadOnlyProtector};
use crate::register::scan_documents;
use crate::scaffold::{CreatedAsset, NewAsset, Scaffold, create_asset};
use crate::transition::{TransitionReport, transition_phase};
use crate::types::{DocumentRecord, LifecycleError, PhaseCode};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Entry point for lifecycle operations over one assets root.
pub struct Lifecycle {
    assets_root: PathBuf,
    config: LifecycleConfig,
    protector: Box<dyn Protector>,
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("assets_root", &self.assets_root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Lifecycle {
    /// Create an engine with the read-only folder protector.
    #[must_use]
    pub fn new(assets_root: impl Into<PathBuf>, config: LifecycleConfig) -> Self {
        Self::with_protector(assets_root, config, Box::new(ReadOnlyProtector))
    }

    /// Create an engine with a custom protector.
    #[must_use]
    pub fn with_protector(
        assets_root: impl Into<PathBuf>,
        config: LifecycleConfig,
        protector: Box<dyn Protector>,
    ) -> Self {
        Self {
            assets_root: assets_root.into(),
            config,
            protector,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    #[must_use]
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Full path of an asset folder.
    #[must_use]
    pub fn asset_path(&self, asset: &str) -> PathBuf {
        self.assets_root.join(asset)
    }

    /// Current phase of an asset (`"00"` if unknown or missing).
    pub fn current_phase(&self, asset: &str) -> PhaseCode {
        infer_phase(&self.asset_path(asset), &self.config)
    }

    /// Current phase with open-marker consistency.
    pub fn phase_report(&self, asset: &str) -> Result<PhaseReport, LifecycleError> {
        let path = self.existing_asset(asset)?;
        Ok(inspect_phase(&path, &self.config))
    }

    /// Phase history of an asset.
    pub fn timeline(&self, asset: &str) -> Result<Vec<TimelineEntry>, LifecycleError> {
        let path = self.existing_asset(asset)?;
        Ok(asset_timeline(&path, &self.config))
    }

    /// All assets under the root.
    pub fn discover(&self) -> Result<Vec<AssetRecord>, LifecycleError> {
        discover_assets(&self.assets_root, &self.config)
    }

    /// Create a new asset in its first phase.
    pub fn create(
        &self,
        asset: &NewAsset,
        scaffold: &Scaffold,
    ) -> Result<CreatedAsset, LifecycleError> {
        create_asset(&self.assets_root, asset, scaffold, now(), &self.config)
    }

    /// Move an asset to `new_phase`.
    pub fn transition(
        &self,
        asset: &str,
        new_phase: &PhaseCode,
        responsible: &str,
    ) -> Result<TransitionReport, LifecycleError> {
        transition_phase(
            &self.asset_path(asset),
            new_phase,
            responsible,
            now(),
            &self.config,
            self.protector.as_ref(),
        )
    }

    /// Archive superseded variants in `<asset>/<phase_folder>[/<subfolder>]`.
    pub fn archive(
        &self,
        asset: &str,
        phase_folder: &str,
        subfolder: Option<&str>,
        keep_latest: usize,
    ) -> Result<ArchiveReport, LifecycleError> {
        let mut target = self.asset_path(asset).join(phase_folder);
        if let Some(sub) = subfolder {
            target = target.join(sub);
        }
        archive_superseded(&target, keep_latest, &self.config)
    }

    /// Document register of an asset.
    pub fn register(&self, asset: &str) -> Result<Vec<DocumentRecord>, LifecycleError> {
        let path = self.asset_path(asset);
        let documents = scan_documents(&path, &self.config)?;
        tracing::info!("Scanned {} documents in {}", documents.len(), asset);
        Ok(documents)
    }

    fn existing_asset(&self, asset: &str) -> Result<PathBuf, LifecycleError> {
        let path = self.asset_path(asset);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(LifecycleError::AssetNotFound(path))
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protect::NoopProtector;
    use tempfile::TempDir;

    fn engine(root: &Path) -> Lifecycle {
        Lifecycle::with_protector(root, LifecycleConfig::default(), Box::new(NoopProtector))
    }

    #[test]
    fn create_then_infer_is_first_phase() {
        let root = TempDir::new().expect("tempdir");
        let lifecycle = engine(root.path());
        let asset = NewAsset {
            subcompany: "AEN".to_string(),
            asset_type: "WF".to_string(),
            asset_id: "004".to_string(),
            name: "Ridge".to_string(),
            location: "Evia".to_string(),
            responsible: "Maria".to_string(),
        };

        lifecycle.create(&asset, &Scaffold::Bare).expect("create");
        assert_eq!(lifecycle.current_phase(&asset.folder_name()), PhaseCode::new("01"));
    }

    #[test]
    fn unknown_asset_reports_not_found() {
        let root = TempDir::new().expect("tempdir");
        let lifecycle = engine(root.path());
        assert!(lifecycle.current_phase("AEN_PV1_Nope_X").is_none());
        assert!(matches!(
            lifecycle.timeline("AEN_PV1_Nope_X"),
            Err(LifecycleError::AssetNotFound(_))
        ));
        assert!(matches!(
            lifecycle.register("AEN_PV1_Nope_X"),
            Err(LifecycleError::AssetNotFound(_))
        ));
    }

    #[test]
    fn archive_resolves_subfolder() {
        let root = TempDir::new().expect("tempdir");
        let lifecycle = engine(root.path());
        let target = root.path().join("AEN_PV1_A_X/02_FEASIBILITY/Financial_Model");
        std::fs::create_dir_all(&target).expect("mkdir");

        let report = lifecycle
            .archive("AEN_PV1_A_X", "02_FEASIBILITY", Some("Financial_Model"), 1)
            .expect("archive");
        assert_eq!(report.moved_count(), 0);
        assert!(target.join("_SUPERSEDED").is_dir());
    }
}
