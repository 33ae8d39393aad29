//! # assetflow-core
//!
//! The asset lifecycle engine - THE LOGIC.
//!
//! Assets live as folders on a shared file server. A folder name encodes the
//! asset identity; status marker files inside it encode the lifecycle phase.
//! This crate reads that state and performs the few controlled mutations the
//! portfolio needs.
//!
//! ## Components (leaf first)
//!
//! - `naming`: folder, marker and document name grammar
//! - `phase`: current phase as a pure function of the markers present
//! - `versioning`: document variants grouped by base name, ranked by recency
//! - `transition`: close current marker, open new marker, lock completed folders
//! - `archive`: superseded variants moved into `_SUPERSEDED`
//! - `register`: recursive document catalogue
//!
//! ## Architectural Constraints
//!
//! - The file server is the only store; nothing is cached between calls
//! - Synchronous, single writer; NO async, NO network
//! - Per-item failures inside a batch never abort the batch
//! - Configuration is an explicit value, never ambient state

// =============================================================================
// MODULES
// =============================================================================

pub mod archive;
pub mod config;
pub mod engine;
pub mod inventory;
pub mod marker;
pub mod naming;
pub mod phase;
pub mod primitives;
pub mod protect;
pub mod register;
pub mod scaffold;
pub mod transition;
pub mod types;
pub mod versioning;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AssetIdentity, DocumentRecord, FileVariant, LifecycleError, PhaseCode};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use archive::{ArchiveReport, archive_superseded};
pub use config::{LifecycleConfig, PhaseDef};
pub use engine::Lifecycle;
pub use naming::{parse_asset_folder_name, parse_marker_filename};
pub use phase::{PhaseReport, infer_phase, inspect_phase};
pub use protect::{NoopProtector, ProtectOutcome, Protector, ReadOnlyProtector};
pub use register::{RegisterSummary, scan_documents};
pub use scaffold::{CreatedAsset, NewAsset, Scaffold, create_asset};
pub use transition::{Direction, TransitionReport, transition_phase};
pub use versioning::{group_by_base_name, rank_variants};

// =============================================================================
// RE-EXPORTS: Inventory
// =============================================================================

pub use inventory::{AssetFilter, AssetRecord, FolderStats, PortfolioMetrics, discover_assets};
pub use marker::TimelineEntry;
