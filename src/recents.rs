//! Recently opened folders, workspaces and files.

use crate::traits::RecentsSink;
use crate::uri::ResourceUri;
use crate::workspace::WorkspaceIdentity;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// What a recent entry points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecentKind {
    Workspace { workspace: WorkspaceIdentity },
    Folder { uri: ResourceUri },
    File { uri: ResourceUri },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    #[serde(flatten)]
    pub kind: RecentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_authority: Option<String>,
}

impl RecentEntry {
    pub fn workspace(workspace: WorkspaceIdentity, remote_authority: Option<String>) -> Self {
        Self {
            kind: RecentKind::Workspace { workspace },
            label: None,
            remote_authority,
        }
    }

    pub fn folder(uri: ResourceUri, remote_authority: Option<String>) -> Self {
        Self {
            kind: RecentKind::Folder { uri },
            label: None,
            remote_authority,
        }
    }

    pub fn file(uri: ResourceUri, remote_authority: Option<String>) -> Self {
        Self {
            kind: RecentKind::File { uri },
            label: None,
            remote_authority,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }
}

/// Most-recent-first list, bounded, without duplicates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentlyOpened {
    entries: Vec<RecentEntry>,
    #[serde(skip)]
    max_entries: usize,
}

impl RecentlyOpened {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    pub fn workspaces(&self) -> impl Iterator<Item = &RecentEntry> {
        self.entries
            .iter()
            .filter(|e| !matches!(e.kind, RecentKind::File { .. }))
    }

    pub fn files(&self) -> impl Iterator<Item = &RecentEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, RecentKind::File { .. }))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load a list saved by [`save_to`](Self::save_to); a missing file is an
    /// empty list
    pub fn load_from(path: &Path, max_entries: usize) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(max_entries));
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recents from {:?}", path))?;
        let mut recents: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recents from {:?}", path))?;
        recents.max_entries = max_entries;
        if max_entries > 0 {
            recents.entries.truncate(max_entries);
        }
        Ok(recents)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create recents directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize recents")?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write recents to {:?}", temp_path))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move recents into place at {:?}", path))?;
        Ok(())
    }
}

/// Recents list shared between the orchestrator and whoever displays it
pub type SharedRecents = Arc<Mutex<RecentlyOpened>>;

impl RecentsSink for SharedRecents {
    fn add_recent(&mut self, entries: Vec<RecentEntry>) {
        self.lock().add_recent(entries);
    }
}

impl RecentsSink for RecentlyOpened {
    fn add_recent(&mut self, entries: Vec<RecentEntry>) {
        // Later entries in a batch end up on top
        for entry in entries {
            self.entries.retain(|e| e.kind != entry.kind);
            self.entries.insert(0, entry);
        }
        if self.max_entries > 0 {
            self.entries.truncate(self.max_entries);
        }
    }
}
