//! # Naming Grammar
//!
//! Positional, underscore-delimited parsing of asset folder names, status
//! marker names and document names.
//!
//! ```text
//! <SUBCO>_<TYPE+ID>_<NAME>_<LOCATION...>      asset folder
//! _STATUS_<code>_<LABEL>.txt                  status marker
//! <..>_<..>_<PHASE>_<DOCTYPE>_..._<DATE>_<vNN> document
//! ```
//!
//! Every parser here is total: malformed input yields `None` (or an
//! `InvalidFolderName` error the caller skips), never a panic.

use crate::primitives::{
    MAX_ASSET_TOKENS, MIN_ASSET_TOKENS, MIN_DOCUMENT_TOKENS, MIN_GROUPING_TOKENS,
    MIN_MARKER_TOKENS, TOKEN_SEPARATOR, VERSION_SUFFIX_TOKENS,
};
use crate::types::{AssetIdentity, LifecycleError, PhaseCode};

// =============================================================================
// ASSET FOLDER NAMES
// =============================================================================

/// Parse an asset folder name into its identity fields.
///
/// Splits on `_` into at most four parts; the fourth part keeps any further
/// separators as the location. Fewer than three parts is an
/// `InvalidFolderName` error.
pub fn parse_asset_folder_name(name: &str) -> Result<AssetIdentity, LifecycleError> {
    let parts: Vec<&str> = name.splitn(MAX_ASSET_TOKENS, TOKEN_SEPARATOR).collect();
    if parts.len() < MIN_ASSET_TOKENS {
        return Err(LifecycleError::InvalidFolderName(name.to_string()));
    }

    let type_and_id = parts[1];
    let asset_type: String = type_and_id
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    let digits: String = type_and_id.chars().filter(|c| c.is_ascii_digit()).collect();

    Ok(AssetIdentity {
        folder_name: name.to_string(),
        subcompany: parts[0].to_string(),
        asset_type,
        asset_id: if digits.is_empty() { None } else { Some(digits) },
        asset_name: parts[2].to_string(),
        location: parts.get(3).map(|s| (*s).to_string()),
    })
}

/// Compose an asset folder name: `<SUBCO>_<TYPE><ID>_<NAME>_<LOCATION>`.
#[must_use]
pub fn asset_folder_name(
    subcompany: &str,
    asset_type: &str,
    asset_id: &str,
    asset_name: &str,
    location: &str,
) -> String {
    format!(
        "{subcompany}{sep}{asset_type}{asset_id}{sep}{asset_name}{sep}{location}",
        sep = TOKEN_SEPARATOR
    )
}

// =============================================================================
// MARKER NAMES
// =============================================================================

/// Parse the phase code out of a marker filename.
///
/// The code is the token at index 2, truncated to two characters:
/// `_STATUS_03_UNDER CONSTRUCTION.txt` -> `03`. Names with fewer than three
/// tokens, or an empty code token, yield `None`.
#[must_use]
pub fn parse_marker_filename(name: &str) -> Option<PhaseCode> {
    let mut tokens = name.split(TOKEN_SEPARATOR);
    let token = tokens.nth(MIN_MARKER_TOKENS - 1)?;
    PhaseCode::from_token(token)
}

// =============================================================================
// DOCUMENT NAMES
// =============================================================================

/// Base name used to group document variants.
///
/// All tokens except the last two (date and version), re-joined with `_`.
/// Names with fewer than five tokens do not group.
#[must_use]
pub fn base_name(file_name: &str) -> Option<String> {
    let tokens: Vec<&str> = file_name.split(TOKEN_SEPARATOR).collect();
    if tokens.len() < MIN_GROUPING_TOKENS {
        return None;
    }
    let keep = tokens.len() - VERSION_SUFFIX_TOKENS;
    let separator = TOKEN_SEPARATOR.to_string();
    Some(tokens[..keep].join(separator.as_str()))
}

/// Fields parsed from a document name that follows the naming convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentName {
    pub phase_code: Option<String>,
    pub doc_type: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
}

/// Parse the convention fields of a document name.
///
/// Only names with at least four tokens are parsed; shorter names return an
/// empty `DocumentName`. The version is the first token shaped `v` + two
/// digits; the status is the first keyword from `status_keywords` found in
/// the upper-cased name.
#[must_use]
pub fn parse_document_name(file_name: &str, status_keywords: &[String]) -> DocumentName {
    let tokens: Vec<&str> = file_name.split(TOKEN_SEPARATOR).collect();
    if tokens.len() < MIN_DOCUMENT_TOKENS {
        return DocumentName::default();
    }

    let version = tokens
        .iter()
        .find(|t| is_version_token(t))
        .map(|t| (*t).to_string());

    let upper = file_name.to_uppercase();
    let status = status_keywords
        .iter()
        .find(|k| upper.contains(k.as_str()))
        .cloned();

    DocumentName {
        phase_code: Some(tokens[2].to_string()),
        doc_type: Some(tokens[3].to_string()),
        version,
        status,
    }
}

/// `v` followed by two digits, e.g. `v01`, `v12.pdf`.
fn is_version_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'v' && bytes[1].is_ascii_digit() && bytes[2].is_ascii_digit()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        crate::LifecycleConfig::default().status_keywords
    }

    #[test]
    fn parses_full_folder_name() {
        let id = parse_asset_folder_name("AEN_PV025_Sunfield-Solar_Athens_North").expect("parse");
        assert_eq!(id.subcompany, "AEN");
        assert_eq!(id.asset_type, "PV");
        assert_eq!(id.asset_id.as_deref(), Some("025"));
        assert_eq!(id.asset_name, "Sunfield-Solar");
        assert_eq!(id.location.as_deref(), Some("Athens_North"));
    }

    #[test]
    fn three_tokens_have_no_location() {
        let id = parse_asset_folder_name("AEN_HTL7_Seaview").expect("parse");
        assert_eq!(id.asset_type, "HTL");
        assert_eq!(id.asset_id.as_deref(), Some("7"));
        assert_eq!(id.location, None);
    }

    #[test]
    fn missing_digits_mean_unknown_id() {
        let id = parse_asset_folder_name("AEN_DC_Core_Berlin").expect("parse");
        assert_eq!(id.asset_type, "DC");
        assert_eq!(id.asset_id, None);
    }

    #[test]
    fn short_folder_name_rejected() {
        assert!(matches!(
            parse_asset_folder_name("AEN_PV025"),
            Err(LifecycleError::InvalidFolderName(_))
        ));
        assert!(parse_asset_folder_name("TEMPLATES").is_err());
    }

    #[test]
    fn composed_name_parses_back() {
        let name = asset_folder_name("AEN", "PV", "030", "New-Solar", "Crete");
        assert_eq!(name, "AEN_PV030_New-Solar_Crete");
        let id = parse_asset_folder_name(&name).expect("parse");
        assert_eq!(id.asset_id.as_deref(), Some("030"));
    }

    #[test]
    fn marker_code_is_third_token() {
        assert_eq!(
            parse_marker_filename("_STATUS_01_PIPELINE.txt"),
            Some(PhaseCode::new("01"))
        );
        assert_eq!(
            parse_marker_filename("_STATUS_03_UNDER CONSTRUCTION.txt"),
            Some(PhaseCode::new("03"))
        );
        assert_eq!(
            parse_marker_filename("_STATUS_042.txt"),
            Some(PhaseCode::new("04"))
        );
    }

    #[test]
    fn malformed_marker_skipped() {
        assert_eq!(parse_marker_filename("_STATUS"), None);
        assert_eq!(parse_marker_filename("_STATUS__x.txt"), None);
    }

    #[test]
    fn base_name_strips_date_and_version() {
        assert_eq!(
            base_name("A_B_C_D_2024-01-01_v01.txt").as_deref(),
            Some("A_B_C_D")
        );
        assert_eq!(base_name("A_B_C_2024-01-01_v01.txt").as_deref(), Some("A_B_C"));
        assert_eq!(base_name("short_name.txt"), None);
        assert_eq!(base_name("A_B_C_D.txt"), None);
    }

    #[test]
    fn document_name_fields() {
        let doc = parse_document_name("PV025_AEN_02_FIN_Model_2024-03-01_v03_DRAFT.xlsx", &keywords());
        assert_eq!(doc.phase_code.as_deref(), Some("02"));
        assert_eq!(doc.doc_type.as_deref(), Some("FIN"));
        assert_eq!(doc.version.as_deref(), Some("v03"));
        assert_eq!(doc.status.as_deref(), Some("DRAFT"));
    }

    #[test]
    fn status_scan_order_wins() {
        // "REVIEW" is scanned before "APPROVED"
        let doc = parse_document_name("A_B_03_LEG_approved_review.pdf", &keywords());
        assert_eq!(doc.status.as_deref(), Some("REVIEW"));
    }

    #[test]
    fn short_document_name_unparsed() {
        let doc = parse_document_name("notes_FINAL.txt", &keywords());
        assert_eq!(doc, DocumentName::default());
    }

    #[test]
    fn version_needs_two_digits() {
        assert!(is_version_token("v01"));
        assert!(is_version_token("v12.pdf"));
        assert!(!is_version_token("v1"));
        assert!(!is_version_token("v1a"));
        assert!(!is_version_token("V01"));
        assert!(!is_version_token("va1"));
    }
}
