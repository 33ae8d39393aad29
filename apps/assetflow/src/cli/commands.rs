//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::export::{
    INVENTORY_PREFIX, METRICS_PREFIX, REGISTER_PREFIX, REGISTER_SUBDIR, inventory_csv,
    metrics_json, register_csv, render_dashboard, render_register_summary, stamped_file_name,
    write_export,
};
use crate::settings::Settings;
use assetflow_core::primitives::format_mb;
use assetflow_core::{
    AssetFilter, AssetRecord, Lifecycle, LifecycleConfig, LifecycleError, NewAsset, PhaseCode,
    PortfolioMetrics, RegisterSummary, Scaffold,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// CONTEXT
// =============================================================================

/// Resolved settings and lifecycle configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub config: LifecycleConfig,
    pub json_mode: bool,
}

impl Context {
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::new(self.settings.assets_path(), self.config.clone())
    }

    /// `explicit`, or a dated file in the export folder.
    fn export_target(&self, explicit: Option<PathBuf>, prefix: &str, extension: &str) -> PathBuf {
        explicit.unwrap_or_else(|| {
            self.settings
                .export_path()
                .join(stamped_file_name(prefix, today(), extension))
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), LifecycleError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LifecycleError::Io(format!("Serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Pick the scaffold for a new asset.
///
/// Flags win over settings: `--script`, then `--template`, then `--bare`,
/// then the configured scaffold script, then the default template tree.
#[must_use]
pub fn choose_scaffold(
    settings: &Settings,
    template: Option<PathBuf>,
    script: Option<PathBuf>,
    bare: bool,
) -> Scaffold {
    if let Some(script) = script {
        return Scaffold::Script(script);
    }
    if let Some(template) = template {
        return Scaffold::Template(template);
    }
    if bare {
        return Scaffold::Bare;
    }
    match &settings.scaffold_script {
        Some(script) => Scaffold::Script(script.clone()),
        None => Scaffold::Template(settings.asset_template_path()),
    }
}

// =============================================================================
// INVENTORY COMMANDS
// =============================================================================

/// Discover assets and export the inventory CSV.
pub fn cmd_inventory(ctx: &Context, output: Option<PathBuf>) -> Result<(), LifecycleError> {
    let records = ctx.lifecycle().discover()?;
    let target = ctx.export_target(output, INVENTORY_PREFIX, "csv");
    write_export(&target, &inventory_csv(&records))?;
    tracing::info!("Asset inventory exported to: {}", target.display());

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "assets": records,
            "exported_to": target.to_string_lossy(),
        }))?;
        return Ok(());
    }

    print_asset_table(&records);
    println!();
    println!("Asset inventory exported to: {}", target.display());
    Ok(())
}

/// Print the dashboard and export the metrics JSON.
pub fn cmd_metrics(ctx: &Context, output: Option<PathBuf>) -> Result<(), LifecycleError> {
    let records = ctx.lifecycle().discover()?;
    let generated_on = today();
    let metrics = PortfolioMetrics::from_records(&records, generated_on);
    let json = metrics_json(&metrics, generated_on)?;
    let target = ctx.export_target(output, METRICS_PREFIX, "json");
    write_export(&target, &json)?;
    tracing::info!("Metrics exported to: {}", target.display());

    if ctx.json_mode {
        println!("{}", json);
        return Ok(());
    }

    print!("{}", render_dashboard(&metrics, &ctx.config));
    println!("Metrics exported to: {}", target.display());
    Ok(())
}

/// Print the dashboard only. Used when no subcommand is given.
pub fn cmd_dashboard(ctx: &Context) -> Result<(), LifecycleError> {
    let records = ctx.lifecycle().discover()?;
    let metrics = PortfolioMetrics::from_records(&records, today());

    if ctx.json_mode {
        print_json(&metrics)?;
    } else {
        print!("{}", render_dashboard(&metrics, &ctx.config));
    }
    Ok(())
}

/// List assets matching every given criterion.
pub fn cmd_find(
    ctx: &Context,
    asset_type: Option<String>,
    phase: Option<String>,
    subco: Option<String>,
) -> Result<(), LifecycleError> {
    let records = ctx.lifecycle().discover()?;
    let filter = AssetFilter {
        asset_type,
        phase: phase.as_deref().map(PhaseCode::parse).transpose()?,
        subcompany: subco,
    };
    let matches: Vec<AssetRecord> = filter.apply(&records).into_iter().cloned().collect();

    if ctx.json_mode {
        print_json(&matches)?;
        return Ok(());
    }

    if matches.is_empty() {
        println!("No assets match.");
    } else {
        print_asset_table(&matches);
    }
    Ok(())
}

fn print_asset_table(records: &[AssetRecord]) {
    println!(
        "{:45} {:6} {:20} {:>7} {:>12}",
        "Asset", "Phase", "Phase Name", "Files", "Size (MB)"
    );
    println!("{}", "-".repeat(94));
    for record in records {
        println!(
            "{:45} {:6} {:20} {:>7} {:>12}",
            record.identity.folder_name,
            record.phase.as_str(),
            record.phase_name,
            record.stats.file_count,
            format_mb(record.stats.total_bytes)
        );
    }
    println!();
    println!("Total: {} assets", records.len());
}

// =============================================================================
// PHASE COMMANDS
// =============================================================================

/// Show the current phase and marker consistency.
pub fn cmd_phase(ctx: &Context, asset: &str) -> Result<(), LifecycleError> {
    let report = ctx.lifecycle().phase_report(asset)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "asset": asset,
            "phase": report.current,
            "phase_name": ctx.config.phase_name(&report.current),
            "markers": report.markers,
            "open": report.open,
            "consistent": report.is_consistent(),
        }))?;
        return Ok(());
    }

    println!("Asset:  {}", asset);
    println!(
        "Phase:  {} ({})",
        report.current,
        ctx.config.phase_name(&report.current)
    );
    let markers: Vec<&str> = report.markers.iter().map(PhaseCode::as_str).collect();
    println!("Markers: {}", markers.join(", "));
    if !report.is_consistent() {
        let open: Vec<&str> = report.open.iter().map(PhaseCode::as_str).collect();
        println!(
            "WARNING: expected exactly one open marker, found [{}]",
            open.join(", ")
        );
    }
    Ok(())
}

/// Show the phase history.
pub fn cmd_timeline(ctx: &Context, asset: &str) -> Result<(), LifecycleError> {
    let timeline = ctx.lifecycle().timeline(asset)?;

    if ctx.json_mode {
        print_json(&timeline)?;
        return Ok(());
    }

    println!("Timeline for {}", asset);
    println!("{}", "=".repeat(60));
    for entry in &timeline {
        println!(
            "{} {:22} started {:12} {}",
            entry.code,
            entry.phase_name,
            entry.started.as_deref().unwrap_or("?"),
            match &entry.closed {
                Some(date) => format!("closed {}", date),
                None => "active".to_string(),
            }
        );
    }
    if timeline.is_empty() {
        println!("No status markers found.");
    }
    Ok(())
}

/// Create a new asset.
pub fn cmd_create(
    ctx: &Context,
    asset: &NewAsset,
    scaffold: &Scaffold,
) -> Result<(), LifecycleError> {
    let created = ctx.lifecycle().create(asset, scaffold)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "path": created.path.to_string_lossy(),
            "already_existed": created.already_existed,
        }))?;
        return Ok(());
    }

    if created.already_existed {
        println!("Asset already exists: {}", created.path.display());
    } else {
        println!("Asset created successfully: {}", created.path.display());
    }
    Ok(())
}

/// Transition an asset into a new phase.
pub fn cmd_transition(
    ctx: &Context,
    asset: &str,
    phase: &str,
    responsible: &str,
) -> Result<(), LifecycleError> {
    let report = ctx
        .lifecycle()
        .transition(asset, &PhaseCode::parse(phase)?, responsible)?;

    if ctx.json_mode {
        print_json(&report)?;
        return Ok(());
    }

    if !report.marker_written {
        println!(
            "{} is already in phase {}; kept {}",
            asset,
            report.to,
            report.new_marker.display()
        );
    } else {
        println!(
            "Transitioned {} from {} to {} ({:?})",
            asset, report.from, report.to, report.direction
        );
        if let Some(reason) = &report.close_failure {
            println!("WARNING: previous marker not closed: {}", reason);
        }
        println!("Created {}", report.new_marker.display());
    }
    for lock in &report.locks {
        if lock.outcome.is_applied() {
            println!("Locked {}", lock.folder);
        } else {
            println!("Could not lock {}", lock.folder);
        }
    }
    Ok(())
}

// =============================================================================
// DOCUMENT COMMANDS
// =============================================================================

/// Archive superseded versions.
pub fn cmd_archive(
    ctx: &Context,
    asset: &str,
    phase_folder: &str,
    subfolder: Option<&str>,
    keep_latest: usize,
) -> Result<(), LifecycleError> {
    let report = ctx
        .lifecycle()
        .archive(asset, phase_folder, subfolder, keep_latest)?;

    if ctx.json_mode {
        print_json(&report)?;
        return Ok(());
    }

    for moved in &report.moved {
        println!("Moved to {}: {}", ctx.config.archive_dir, moved.name);
    }
    for failed in &report.failed {
        println!("FAILED {}: {}", failed.name, failed.reason);
    }
    println!(
        "Total files moved to {}: {}",
        ctx.config.archive_dir,
        report.moved_count()
    );
    Ok(())
}

/// Scan an asset's documents and export the register CSV.
pub fn cmd_register(
    ctx: &Context,
    asset: &str,
    output: Option<PathBuf>,
) -> Result<(), LifecycleError> {
    let lifecycle = ctx.lifecycle();
    let documents = lifecycle.register(asset)?;
    let summary = RegisterSummary::from_documents(&documents);
    let target = output.unwrap_or_else(|| {
        lifecycle
            .asset_path(asset)
            .join(REGISTER_SUBDIR)
            .join(stamped_file_name(REGISTER_PREFIX, today(), "csv"))
    });
    write_export(&target, &register_csv(&documents))?;
    tracing::info!("Document register exported to: {}", target.display());

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "asset": asset,
            "summary": summary,
            "documents": documents,
            "exported_to": target.to_string_lossy(),
        }))?;
        return Ok(());
    }

    print!("{}", render_register_summary(asset, &summary));
    println!();
    println!("Document register exported to: {}", target.display());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
