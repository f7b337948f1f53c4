//! Open requests and their outcome.

use super::wait::{WaitHandle, WaitMarker};
use crate::error::{CreationFailure, ResolutionWarning};
use crate::paths::UriToOpen;
use crate::window::WindowId;
use std::path::PathBuf;

/// Where an open request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenContext {
    /// Command line invocation
    #[default]
    CommandLine,
    /// Dock or taskbar icon (including files dropped on it)
    Dock,
    /// Application menu
    Menu,
    /// Native open dialog
    Dialog,
    /// Desktop integration (file manager, "open with")
    Desktop,
    /// Programmatic API call
    Api,
}

impl OpenContext {
    /// Command line and API requests never reuse extension development hosts
    pub fn is_external(self) -> bool {
        matches!(self, OpenContext::CommandLine | OpenContext::Api)
    }
}

/// Raw targets: command-line strings or typed URIs, never both
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpenTargets {
    #[default]
    None,
    Cli(Vec<String>),
    Api(Vec<UriToOpen>),
}

impl OpenTargets {
    pub fn is_empty(&self) -> bool {
        match self {
            OpenTargets::None => true,
            OpenTargets::Cli(paths) => paths.is_empty(),
            OpenTargets::Api(uris) => uris.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OpenTargets::None => 0,
            OpenTargets::Cli(paths) => paths.len(),
            OpenTargets::Api(uris) => uris.len(),
        }
    }
}

/// One call to `Orchestrator::open`
#[derive(Debug, Clone, Default)]
pub struct OpenConfiguration {
    pub context: OpenContext,
    pub targets: OpenTargets,
    /// Base directory for relative command-line paths
    pub cwd: PathBuf,
    pub remote_authority: Option<String>,

    pub force_new_window: bool,
    pub force_reuse_window: bool,
    /// Open an empty window even when other targets are present
    pub force_empty: bool,
    /// Folders default to a new window unless settings say otherwise
    pub prefer_new_window: bool,
    /// Merge folders into the active window
    pub add_mode: bool,
    pub diff_mode: bool,
    pub goto_line_mode: bool,
    pub ignore_file_not_found: bool,
    pub force_open_as_file: bool,
    pub no_recent_entry: bool,
    pub initial_startup: bool,

    /// Completed when the window handling this request closes or reloads
    pub wait_marker: Option<WaitMarker>,

    /// Extension source folders; non-empty makes this an extension
    /// development host request
    pub extension_development_paths: Vec<String>,
    pub extension_test_mode: bool,
}

impl OpenConfiguration {
    pub fn new(context: OpenContext) -> Self {
        Self {
            context,
            ..Default::default()
        }
    }

    pub fn with_cli_paths<S: Into<String>>(mut self, paths: impl IntoIterator<Item = S>) -> Self {
        self.targets = OpenTargets::Cli(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_uris(mut self, uris: Vec<UriToOpen>) -> Self {
        self.targets = OpenTargets::Api(uris);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_remote_authority(mut self, authority: impl Into<String>) -> Self {
        self.remote_authority = Some(authority.into());
        self
    }

    /// Whether the caller named anything to open
    pub fn has_explicit_targets(&self) -> bool {
        !self.targets.is_empty() || self.force_empty
    }
}

/// A window touched by an open call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedWindow {
    pub id: WindowId,
    /// false when an existing window was reused
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct OpenResult {
    /// Windows created or reused, in the order they were used
    pub windows: Vec<OpenedWindow>,
    pub focused: Option<WindowId>,
    pub warnings: Vec<ResolutionWarning>,
    pub failures: Vec<CreationFailure>,
    /// Present when a wait marker was registered on the single resulting window
    pub wait: Option<WaitHandle>,
}

impl OpenResult {
    pub fn created(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.iter().filter(|w| w.created).map(|w| w.id)
    }

    pub fn reused(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.iter().filter(|w| !w.created).map(|w| w.id)
    }
}
