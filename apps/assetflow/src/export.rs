//! # Exports
//!
//! Inventory and register CSV, metrics JSON and the text dashboard.
//!
//! Every renderer returns a `String`; only [`write_export`] touches the disk.
//! Sizes are rendered from fixed-point values, never from floats.

use assetflow_core::primitives::{FILE_STAMP_FORMAT, format_gb, format_mb};
use assetflow_core::{
    AssetRecord, DocumentRecord, LifecycleConfig, LifecycleError, PortfolioMetrics,
    RegisterSummary,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

// =============================================================================
// FILE NAMES
// =============================================================================

pub const INVENTORY_PREFIX: &str = "Asset_Inventory";
pub const METRICS_PREFIX: &str = "Portfolio_Metrics";
pub const REGISTER_PREFIX: &str = "Document_Register";

/// Default register location inside an asset.
pub const REGISTER_SUBDIR: &str = "00_ASSET_MASTER/Document_Index";

/// `<prefix>_<YYYYMMDD>.<extension>`
#[must_use]
pub fn stamped_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", prefix, date.format(FILE_STAMP_FORMAT), extension)
}

/// Write `contents` to `path`, creating parent folders.
pub fn write_export(path: &Path, contents: &str) -> Result<(), LifecycleError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| LifecycleError::Io(format!("Create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, contents)
        .map_err(|e| LifecycleError::Io(format!("Write {}: {}", path.display(), e)))
}

// =============================================================================
// CSV
// =============================================================================

const INVENTORY_HEADER: [&str; 12] = [
    "Asset_Folder",
    "Subcompany",
    "Asset_Type",
    "Asset_ID",
    "Asset_Name",
    "Location",
    "Current_Phase",
    "Phase_Name",
    "Folder_Path",
    "Total_Files",
    "Total_Size_MB",
    "Last_Modified",
];

const REGISTER_HEADER: [&str; 10] = [
    "Filename",
    "Folder",
    "Full_Path",
    "File_Size_MB",
    "Modified_Date",
    "Extension",
    "Phase_Code",
    "Doc_Type",
    "Version",
    "Status",
];

/// Quote a field when it holds a comma, quote or line break.
#[must_use]
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = Cow<'a, str>>) {
    let row: Vec<Cow<'a, str>> = fields.into_iter().collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn escaped(value: &str) -> Cow<'static, str> {
    Cow::Owned(csv_field(value).into_owned())
}

fn escaped_opt(value: Option<&str>) -> Cow<'static, str> {
    escaped(value.unwrap_or_default())
}

/// One row per asset, in inventory order.
#[must_use]
pub fn inventory_csv(records: &[AssetRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, INVENTORY_HEADER.map(Cow::Borrowed));
    for record in records {
        let id = &record.identity;
        let last_modified = record
            .stats
            .last_modified
            .map(|d| d.to_string())
            .unwrap_or_default();
        push_row(
            &mut out,
            [
                escaped(&id.folder_name),
                escaped(&id.subcompany),
                escaped(&id.asset_type),
                escaped_opt(id.asset_id.as_deref()),
                escaped(&id.asset_name),
                escaped_opt(id.location.as_deref()),
                escaped(record.phase.as_str()),
                escaped(&record.phase_name),
                escaped(&record.path.to_string_lossy()),
                Cow::Owned(record.stats.file_count.to_string()),
                Cow::Owned(format_mb(record.stats.total_bytes)),
                Cow::Owned(last_modified),
            ],
        );
    }
    out
}

/// One row per document, in register order.
#[must_use]
pub fn register_csv(documents: &[DocumentRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, REGISTER_HEADER.map(Cow::Borrowed));
    for doc in documents {
        push_row(
            &mut out,
            [
                escaped(&doc.filename),
                escaped(&doc.folder),
                escaped(&doc.path.to_string_lossy()),
                Cow::Owned(format_mb(doc.size_bytes)),
                Cow::Owned(doc.modified.to_string()),
                escaped(&doc.extension),
                escaped_opt(doc.phase_code.as_deref()),
                escaped_opt(doc.doc_type.as_deref()),
                escaped_opt(doc.version.as_deref()),
                escaped_opt(doc.status.as_deref()),
            ],
        );
    }
    out
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Serialize)]
struct MetricsDocument<'a> {
    generated_on: NaiveDate,
    total_size_gb: String,
    #[serde(flatten)]
    metrics: &'a PortfolioMetrics,
}

/// Pretty-printed metrics with the generation date and a GB total.
pub fn metrics_json(
    metrics: &PortfolioMetrics,
    generated_on: NaiveDate,
) -> Result<String, LifecycleError> {
    let document = MetricsDocument {
        generated_on,
        total_size_gb: format_gb(metrics.total_bytes),
        metrics,
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| LifecycleError::Io(format!("Serialize metrics: {}", e)))
}

// =============================================================================
// TEXT
// =============================================================================

const RULE_WIDTH: usize = 80;

/// The portfolio dashboard as printed to stdout.
#[must_use]
pub fn render_dashboard(metrics: &PortfolioMetrics, config: &LifecycleConfig) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{}\n PORTFOLIO DASHBOARD\n{}", rule, rule);

    let _ = writeln!(out, "\nOVERALL STATISTICS:");
    let _ = writeln!(out, "  Total Assets: {}", metrics.total_assets);
    let _ = writeln!(out, "  Total Files: {}", metrics.total_files);
    let _ = writeln!(out, "  Total Storage: {} GB", format_gb(metrics.total_bytes));

    let _ = writeln!(out, "\nBY ASSET TYPE:");
    for (code, totals) in &metrics.by_type {
        let _ = writeln!(
            out,
            "  {:30} {:3} assets | {:6} files | {:>6} GB",
            config.asset_type_name(code),
            totals.assets,
            totals.files,
            format_gb(totals.bytes)
        );
    }

    let _ = writeln!(out, "\nBY PHASE:");
    for (phase, totals) in &metrics.by_phase {
        let _ = writeln!(
            out,
            "  {:30} {:3} assets | {:6} files | {:>6} GB",
            phase,
            totals.assets,
            totals.files,
            format_gb(totals.bytes)
        );
    }

    let _ = writeln!(out, "\nBY SUBCOMPANY:");
    for (subco, totals) in &metrics.by_subcompany {
        let _ = writeln!(
            out,
            "  {:30} {:3} assets | {:6} files | {:>6} GB",
            subco,
            totals.assets,
            totals.files,
            format_gb(totals.bytes)
        );
    }

    let recent = &metrics.recent_activity;
    let _ = writeln!(out, "\nRECENT ACTIVITY (Last {} days):", recent.window_days);
    let _ = writeln!(out, "  Assets Modified: {}", recent.assets_modified);
    let _ = writeln!(out, "  Files Modified: {}", recent.files_modified);
    let _ = writeln!(out, "\n{}", rule);
    out
}

/// Register totals and per-field counts.
#[must_use]
pub fn render_register_summary(asset: &str, summary: &RegisterSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Document Register Summary for {}:", asset);
    let _ = writeln!(out, "Total Documents: {}", summary.total_documents);
    let _ = writeln!(out, "Total Size: {} MB", format_mb(summary.total_bytes));

    for (title, counts) in [
        ("By Phase", &summary.by_phase),
        ("By Document Type", &summary.by_doc_type),
        ("By Status", &summary.by_status),
    ] {
        let _ = writeln!(out, "\n{}:", title);
        if counts.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for (key, count) in counts {
            let _ = writeln!(out, "  {:20} {}", key, count);
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
