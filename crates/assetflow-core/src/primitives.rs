//! # Fixed Primitives
//!
//! Naming constants and numeric helpers shared by every component.
//!
//! The tables that an operator may want to change (phase labels, asset types,
//! locked folders) live in [`crate::config::LifecycleConfig`]. What remains
//! here is the grammar itself: separators, token counts and the fixed-point
//! size representation.

/// Separator between tokens in asset folder names, marker names and document names.
pub const TOKEN_SEPARATOR: char = '_';

/// Phase code reported when no marker can be parsed.
pub const NO_PHASE: &str = "00";

/// Width of a phase code, in characters.
pub const PHASE_CODE_WIDTH: usize = 2;

/// Minimum tokens in an asset folder name (`SUBCO_TYPEID_NAME`).
pub const MIN_ASSET_TOKENS: usize = 3;

/// Maximum tokens in an asset folder name; the remainder is kept whole as the location.
pub const MAX_ASSET_TOKENS: usize = 4;

/// Minimum tokens in a marker filename (`_STATUS_<code>...`).
pub const MIN_MARKER_TOKENS: usize = 3;

/// Minimum tokens for a filename to take part in version grouping.
///
/// The last two tokens are conventionally the date and the version.
pub const MIN_GROUPING_TOKENS: usize = 5;

/// Number of trailing tokens stripped to form a base name.
pub const VERSION_SUFFIX_TOKENS: usize = 2;

/// Minimum tokens for a document name to be parsed for phase and type codes.
pub const MIN_DOCUMENT_TOKENS: usize = 4;

/// Date format written into markers and exported file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for the `Last Updated:` marker field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compact date stamp used in export file names.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d";

/// Bytes in one MB (binary megabyte).
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Window used for the "recent activity" portfolio metric.
pub const RECENT_ACTIVITY_DAYS: u64 = 30;

// =============================================================================
// FIXED-POINT SIZES
// =============================================================================

/// Convert a byte count to thousandths of a MB, rounding half up.
///
/// `1_572_864` bytes (1.5 MB) becomes `1500`.
#[must_use]
pub fn mb_thousandths(bytes: u64) -> u64 {
    let scaled = u128::from(bytes) * 1000 + u128::from(BYTES_PER_MB / 2);
    u64::try_from(scaled / u128::from(BYTES_PER_MB)).unwrap_or(u64::MAX)
}

/// Render a thousandths value with three decimals, e.g. `1500` -> `"1.500"`.
#[must_use]
pub fn format_thousandths(value: u64) -> String {
    format!("{}.{:03}", value / 1000, value % 1000)
}

/// Render a byte count as MB with three decimals.
#[must_use]
pub fn format_mb(bytes: u64) -> String {
    format_thousandths(mb_thousandths(bytes))
}

/// Render a byte count as GB with two decimals.
#[must_use]
pub fn format_gb(bytes: u64) -> String {
    let per_gb = u128::from(BYTES_PER_MB) * 1024;
    let hundredths = (u128::from(bytes) * 100 + per_gb / 2) / per_gb;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
