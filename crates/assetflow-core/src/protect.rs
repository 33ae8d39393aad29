//! # Folder Protection
//!
//! Locking completed phase folders is best-effort. The [`Protector`] trait is
//! the seam between the transition protocol and the platform permission
//! model; the protocol only logs what a protector reports.

use serde::Serialize;
use std::path::Path;

/// Result of a protection attempt. Never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ProtectOutcome {
    /// The folder is now read-only.
    Applied,
    /// The platform refused or cannot express the protection.
    Unsupported(String),
}

impl ProtectOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Capability to make a folder read-only.
pub trait Protector {
    /// Protect `path`. Implementations must not panic and must not fail the caller.
    fn protect(&self, path: &Path) -> ProtectOutcome;
}

/// Clears the write permission bits of the folder itself.
///
/// Contents keep their own permissions. On platforms where a directory
/// read-only flag is advisory the flag is still set and reported as applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyProtector;

impl Protector for ReadOnlyProtector {
    fn protect(&self, path: &Path) -> ProtectOutcome {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => return ProtectOutcome::Unsupported(e.to_string()),
        };
        let mut permissions = metadata.permissions();
        permissions.set_readonly(true);
        match std::fs::set_permissions(path, permissions) {
            Ok(()) => ProtectOutcome::Applied,
            Err(e) => ProtectOutcome::Unsupported(e.to_string()),
        }
    }
}

/// Protector that does nothing, for dry runs and read-only shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProtector;

impl Protector for NoopProtector {
    fn protect(&self, _path: &Path) -> ProtectOutcome {
        ProtectOutcome::Unsupported("protection disabled".to_string())
    }
}
