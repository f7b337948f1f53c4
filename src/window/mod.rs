//! Window records and the live window registry.

pub mod instruction;
pub mod registry;

pub use instruction::{FileBatch, FileToOpen, LoadPayload, WindowInstruction};
pub use registry::WindowRegistry;

use crate::backups::BackupSlot;
use crate::uri::ResourceUri;
use crate::workspace::{WorkspaceId, WorkspaceIdentity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, process-unique window identifier assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a window occupies its display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Normal,
    Maximized,
    Fullscreen,
}

/// Position, size and mode of a window (also persisted as its UI state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub mode: DisplayMode,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            mode: DisplayMode::Normal,
        }
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// What a window shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpenedContent {
    #[default]
    Empty,
    Folder(ResourceUri),
    Workspace(WorkspaceIdentity),
}

impl OpenedContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, OpenedContent::Empty)
    }

    pub fn folder(&self) -> Option<&ResourceUri> {
        match self {
            OpenedContent::Folder(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn workspace(&self) -> Option<&WorkspaceIdentity> {
        match self {
            OpenedContent::Workspace(identity) => Some(identity),
            _ => None,
        }
    }

    /// Key used to detect two windows claiming the same content
    pub(crate) fn identity_key(&self) -> Option<String> {
        match self {
            OpenedContent::Empty => None,
            OpenedContent::Folder(uri) => Some(format!("folder:{uri}")),
            OpenedContent::Workspace(identity) => Some(format!("workspace:{}", identity.id)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OpenedContent::Empty => "empty window".to_string(),
            OpenedContent::Folder(uri) => uri.to_string(),
            OpenedContent::Workspace(identity) => identity.config_path.to_string(),
        }
    }
}

/// Registry entry for one live window
#[derive(Debug, Clone)]
pub struct WindowRecord {
    pub id: WindowId,
    pub content: OpenedContent,
    pub remote_authority: Option<String>,
    pub backup_slot: Option<BackupSlot>,
    /// Extension source folders when this is an extension development host
    pub extension_development_paths: Vec<ResourceUri>,
    /// Extension development host started to run extension tests
    pub extension_test_mode: bool,
    pub ui_state: WindowGeometry,
    /// Registry-wide focus order; higher means focused more recently
    pub(crate) focus_seq: u64,
}

impl WindowRecord {
    pub fn new(id: WindowId, content: OpenedContent, ui_state: WindowGeometry) -> Self {
        Self {
            id,
            content,
            remote_authority: None,
            backup_slot: None,
            extension_development_paths: Vec::new(),
            extension_test_mode: false,
            ui_state,
            focus_seq: 0,
        }
    }

    pub fn with_remote_authority(mut self, authority: Option<String>) -> Self {
        self.remote_authority = authority;
        self
    }

    pub fn with_backup_slot(mut self, slot: Option<BackupSlot>) -> Self {
        self.backup_slot = slot;
        self
    }

    pub fn is_extension_development_host(&self) -> bool {
        !self.extension_development_paths.is_empty()
    }

    pub fn workspace_id(&self) -> Option<&WorkspaceId> {
        self.content.workspace().map(|w| &w.id)
    }

    pub fn focus_seq(&self) -> u64 {
        self.focus_seq
    }

    /// Whether this window's workspace or folder contains `file`
    pub fn contains(&self, file: &ResourceUri) -> bool {
        self.containing_root_depth(file).is_some()
    }

    /// Depth of the deepest root of this window containing `file`
    pub fn containing_root_depth(&self, file: &ResourceUri) -> Option<usize> {
        match &self.content {
            OpenedContent::Folder(folder) => folder
                .is_equal_or_parent_of(file)
                .then(|| folder.depth()),
            OpenedContent::Workspace(identity) => identity
                .folders
                .iter()
                .filter(|folder| folder.is_equal_or_parent_of(file))
                .map(ResourceUri::depth)
                .max(),
            OpenedContent::Empty => None,
        }
    }
}
