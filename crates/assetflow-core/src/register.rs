//! # Document Register
//!
//! Recursive catalogue of the documents in an asset tree, skipping archival
//! subfolders, status markers and dotfiles.

use crate::config::LifecycleConfig;
use crate::naming::parse_document_name;
use crate::primitives::mb_thousandths;
use crate::types::{DocumentRecord, LifecycleError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Scan an asset tree into register rows, ordered by folder then file name.
///
/// Entries that cannot be read are skipped with a warning. A missing asset
/// folder is an `AssetNotFound` error.
pub fn scan_documents(
    asset_folder: &Path,
    config: &LifecycleConfig,
) -> Result<Vec<DocumentRecord>, LifecycleError> {
    if !asset_folder.is_dir() {
        return Err(LifecycleError::AssetNotFound(asset_folder.to_path_buf()));
    }

    let archive_dir = config.archive_dir.as_str();
    let walker = WalkDir::new(asset_folder)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == archive_dir));

    let mut documents = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if config.is_marker(&filename) || filename.starts_with('.') {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let folder = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(asset_folder).ok())
            .map(|rel| {
                if rel.as_os_str().is_empty() {
                    ".".to_string()
                } else {
                    rel.to_string_lossy().into_owned()
                }
            })
            .unwrap_or_else(|| ".".to_string());

        let modified: DateTime<Local> = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH).into();
        let extension = entry
            .path()
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let parsed = parse_document_name(&filename, &config.status_keywords);

        documents.push(DocumentRecord {
            filename,
            folder,
            path: entry.path().to_path_buf(),
            size_bytes: metadata.len(),
            modified: modified.date_naive(),
            extension,
            phase_code: parsed.phase_code,
            doc_type: parsed.doc_type,
            version: parsed.version,
            status: parsed.status,
        });
    }

    documents.sort_by(|a, b| {
        a.folder
            .cmp(&b.folder)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    Ok(documents)
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Counts over a register. Documents without a parsed field are not counted
/// under that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterSummary {
    pub total_documents: usize,
    pub total_bytes: u64,
    pub by_phase: BTreeMap<String, usize>,
    pub by_doc_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

impl RegisterSummary {
    /// Reduce a register into its summary.
    #[must_use]
    pub fn from_documents(documents: &[DocumentRecord]) -> Self {
        let mut summary = Self {
            total_documents: documents.len(),
            ..Self::default()
        };
        for doc in documents {
            summary.total_bytes = summary.total_bytes.saturating_add(doc.size_bytes);
            if let Some(phase) = &doc.phase_code {
                *summary.by_phase.entry(phase.clone()).or_default() += 1;
            }
            if let Some(doc_type) = &doc.doc_type {
                *summary.by_doc_type.entry(doc_type.clone()).or_default() += 1;
            }
            if let Some(status) = &doc.status {
                *summary.by_status.entry(status.clone()).or_default() += 1;
            }
        }
        summary
    }

    /// Total size in thousandths of a MB.
    #[must_use]
    pub fn total_mb_thousandths(&self) -> u64 {
        mb_thousandths(self.total_bytes)
    }
}

// =============================================================================
// TESTS
// =============================================================================
