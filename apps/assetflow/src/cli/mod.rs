//! # assetflow CLI Module
//!
//! This module implements the CLI interface for assetflow.
//!
//! ## Available Commands
//!
//! - `inventory` - Discover assets and export the inventory CSV
//! - `metrics` - Portfolio dashboard and metrics JSON
//! - `find` - Select assets by type, phase or subcompany
//! - `phase` - Current phase and marker consistency of one asset
//! - `timeline` - Phase history of one asset
//! - `create` - Create a new asset in its first phase
//! - `transition` - Move an asset to another phase
//! - `archive` - Move superseded document versions aside
//! - `register` - Document register of one asset

mod commands;

use crate::settings::Settings;
use assetflow_core::LifecycleError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// assetflow - Asset portfolio lifecycle on a shared file server
///
/// Asset folders carry their identity in their name and their phase in
/// status marker files. assetflow reads and maintains both.
#[derive(Parser, Debug)]
#[command(name = "assetflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// File-server root (overrides FILESERVER_ROOT)
    #[arg(short = 'R', long, global = true)]
    pub root: Option<PathBuf>,

    /// Lifecycle configuration file (overrides ASSETFLOW_CONFIG)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover all assets and export the inventory
    Inventory {
        /// Output CSV path (default: <export dir>/Asset_Inventory_YYYYMMDD.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the portfolio dashboard and export metrics
    Metrics {
        /// Output JSON path (default: <export dir>/Portfolio_Metrics_YYYYMMDD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find assets matching all given criteria
    Find {
        /// Asset type code (PV, WF, ...)
        #[arg(short = 't', long)]
        asset_type: Option<String>,

        /// Phase code (01, 02, ...)
        #[arg(short, long)]
        phase: Option<String>,

        /// Subcompany code
        #[arg(short, long)]
        subco: Option<String>,
    },

    /// Show the current phase of an asset
    Phase {
        /// Asset folder name
        asset: String,
    },

    /// Show the phase history of an asset
    Timeline {
        /// Asset folder name
        asset: String,
    },

    /// Create a new asset in its first phase
    Create {
        /// Subcompany code
        #[arg(long)]
        subco: String,

        /// Asset type code
        #[arg(short = 't', long)]
        asset_type: String,

        /// Asset number
        #[arg(long)]
        id: String,

        /// Asset name
        #[arg(short, long)]
        name: String,

        /// Location
        #[arg(short, long)]
        location: String,

        /// Responsible project manager
        #[arg(long)]
        pm: String,

        /// Template tree to copy (default: <templates>/ASSET_LIFECYCLE_TEMPLATE)
        #[arg(long, conflicts_with_all = ["script", "bare"])]
        template: Option<PathBuf>,

        /// External scaffold script, invoked with the new asset path
        #[arg(long, conflicts_with = "bare")]
        script: Option<PathBuf>,

        /// Create an empty folder without any scaffold
        #[arg(long)]
        bare: bool,
    },

    /// Transition an asset to a new phase
    Transition {
        /// Asset folder name
        asset: String,

        /// Target phase code, two digits from the phase table (e.g. 03)
        #[arg(short, long)]
        phase: String,

        /// Responsible project manager for the new phase
        #[arg(long)]
        pm: String,
    },

    /// Move superseded document versions into the archive subfolder
    Archive {
        /// Asset folder name
        asset: String,

        /// Phase folder inside the asset (e.g. 02_FEASIBILITY)
        #[arg(short, long)]
        phase_folder: String,

        /// Subfolder inside the phase folder
        #[arg(short, long)]
        subfolder: Option<String>,

        /// Number of most recent versions to keep per document
        #[arg(short, long, default_value_t = assetflow_core::archive::DEFAULT_KEEP_LATEST)]
        keep: usize,
    },

    /// Generate the document register of an asset
    Register {
        /// Asset folder name
        asset: String,

        /// Output CSV path (default: inside the asset's document index)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), LifecycleError> {
    let settings = Settings::from_env().with_overrides(cli.root, cli.config);
    let config = settings.lifecycle_config()?;
    let ctx = Context {
        settings,
        config,
        json_mode: cli.json_mode,
    };

    match cli.command {
        Some(Commands::Inventory { output }) => cmd_inventory(&ctx, output),
        Some(Commands::Metrics { output }) => cmd_metrics(&ctx, output),
        Some(Commands::Find {
            asset_type,
            phase,
            subco,
        }) => cmd_find(&ctx, asset_type, phase, subco),
        Some(Commands::Phase { asset }) => cmd_phase(&ctx, &asset),
        Some(Commands::Timeline { asset }) => cmd_timeline(&ctx, &asset),
        Some(Commands::Create {
            subco,
            asset_type,
            id,
            name,
            location,
            pm,
            template,
            script,
            bare,
        }) => {
            let asset = assetflow_core::NewAsset {
                subcompany: subco,
                asset_type,
                asset_id: id,
                name,
                location,
                responsible: pm,
            };
            let scaffold = choose_scaffold(&ctx.settings, template, script, bare);
            cmd_create(&ctx, &asset, &scaffold)
        }
        Some(Commands::Transition { asset, phase, pm }) => {
            cmd_transition(&ctx, &asset, &phase, &pm)
        }
        Some(Commands::Archive {
            asset,
            phase_folder,
            subfolder,
            keep,
        }) => cmd_archive(&ctx, &asset, &phase_folder, subfolder.as_deref(), keep),
        Some(Commands::Register { asset, output }) => cmd_register(&ctx, &asset, output),
        None => {
            // No subcommand - show the dashboard without exporting
            cmd_dashboard(&ctx)
        }
    }
}
