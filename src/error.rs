//! Typed error taxonomy for the orchestration engine.
//!
//! Only [`CreationFailure`] ever reaches the caller of `open()`, inside
//! `OpenResult::failures`. Resolution warnings are reported alongside the
//! result, persistence failures are logged and swallowed, and identity
//! conflicts are programming errors (panic in debug builds).

use crate::window::WindowId;
use thiserror::Error;

/// Why a target was dropped (or kept with a caveat) during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The path does not exist and `ignore_file_not_found` was not set
    NotFound,
    /// The input could not be parsed as a path or URI
    Malformed,
    /// A remote URI names a different authority than the one requested;
    /// the URI's own authority was kept
    AuthorityMismatch,
    /// A workspace config could not be read; the target fell back to a file
    /// or was dropped
    WorkspaceUnreadable,
    /// Add mode was requested without a suitable active window; the folders
    /// were opened normally
    AddModeUnavailable,
}

/// A target-level problem reported while resolving an open request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{target}: {message}")]
pub struct ResolutionWarning {
    pub kind: WarningKind,
    /// The raw target as supplied by the caller
    pub target: String,
    pub message: String,
}

impl ResolutionWarning {
    pub fn new(kind: WarningKind, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Host-level failure to materialize a window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("window creation failed: {0}")]
    CreationFailed(String),
}

/// A window that could not be created; the rest of the batch still opened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to open window for {target}: {source}")]
pub struct CreationFailure {
    /// Description of what the window would have shown
    pub target: String,
    #[source]
    pub source: HostError,
}

/// Two registry records claimed the same workspace or folder identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("windows {existing} and {incoming} both claim {identity}")]
pub struct IdentityConflict {
    pub identity: String,
    pub existing: WindowId,
    pub incoming: WindowId,
}
