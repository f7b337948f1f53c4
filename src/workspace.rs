//! Workspace identities and the local workspace-config resolver.
//!
//! A workspace is a named, possibly multi-root grouping of folders stored in a
//! JSON config file. Its identity is a stable hash of the config file's URI,
//! so the same file always maps to the same id across restarts.

use crate::traits::WorkspaceResolver;
use crate::uri::ResourceUri;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Stable workspace identifier (hex digest)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub String);

impl WorkspaceId {
    /// Identifier of the workspace stored at `config_path`
    pub fn for_config(config_path: &ResourceUri) -> Self {
        Self(digest_hex([config_path.to_string()].iter()))
    }

    /// Identifier of an ad-hoc workspace made of `folders`, in order
    pub fn for_folders(folders: &[ResourceUri]) -> Self {
        let keys: Vec<String> = folders.iter().map(ToString::to_string).collect();
        Self(digest_hex(keys.iter()))
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn digest_hex<'a>(parts: impl Iterator<Item = &'a String>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .take(16)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// A workspace's identity: id plus the location of its config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceIdentity {
    pub id: WorkspaceId,
    pub config_path: ResourceUri,
    /// Root folders, when known; only used to route files into the window
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<ResourceUri>,
}

impl WorkspaceIdentity {
    /// Identity of the workspace stored at `config_path`
    pub fn from_config(config_path: ResourceUri) -> Self {
        Self {
            id: WorkspaceId::for_config(&config_path),
            config_path,
            folders: Vec::new(),
        }
    }

    pub fn with_folders(mut self, folders: Vec<ResourceUri>) -> Self {
        self.folders = folders;
        self
    }
}

// Identity is the id alone; the folder list is a cache.
impl PartialEq for WorkspaceIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WorkspaceIdentity {}

impl std::hash::Hash for WorkspaceIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// On-disk workspace config format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFile {
    #[serde(default)]
    pub folders: Vec<WorkspaceFolderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_authority: Option<String>,
}

/// One root of a workspace config: a path relative to the config file, or a URI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkspaceFolderEntry {
    Path { path: String },
    Uri { uri: String },
}

impl WorkspaceFolderEntry {
    /// Resolve this entry against the directory holding the config file
    pub fn resolve(&self, config_dir: &Path) -> Option<ResourceUri> {
        match self {
            WorkspaceFolderEntry::Path { path } => {
                ResourceUri::from_file_path(&config_dir.join(path))
            }
            WorkspaceFolderEntry::Uri { uri } => ResourceUri::parse(uri).ok(),
        }
    }
}

/// Resolves workspace configs on the local filesystem and stores ad-hoc
/// workspaces under a state directory.
pub struct LocalWorkspaceResolver {
    extension: String,
    ad_hoc_root: PathBuf,
}

impl LocalWorkspaceResolver {
    pub fn new(extension: &str, ad_hoc_root: PathBuf) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            ad_hoc_root,
        }
    }

    fn read_workspace_file(path: &Path) -> Result<WorkspaceFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workspace config {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse workspace config {:?}", path))
    }
}

impl WorkspaceResolver for LocalWorkspaceResolver {
    fn resolve_workspace_config(&self, uri: &ResourceUri) -> Option<WorkspaceIdentity> {
        if uri.extension() != Some(self.extension.as_str()) {
            return None;
        }
        // Remote configs cannot be read from here; the extension is the contract.
        let Some(path) = uri.to_file_path() else {
            return Some(WorkspaceIdentity::from_config(uri.clone()));
        };
        match Self::read_workspace_file(&path) {
            Ok(file) => {
                let config_dir = path.parent().unwrap_or(Path::new("/"));
                let folders: Vec<ResourceUri> = file
                    .folders
                    .iter()
                    .filter_map(|entry| entry.resolve(config_dir))
                    .collect();
                log::debug!(
                    "Resolved workspace {:?} with {} folders",
                    path,
                    folders.len()
                );
                Some(WorkspaceIdentity::from_config(uri.clone()).with_folders(folders))
            }
            Err(e) => {
                log::warn!("{:#}", e);
                None
            }
        }
    }

    fn create_ad_hoc_workspace(
        &mut self,
        folders: &[ResourceUri],
        remote_authority: Option<&str>,
    ) -> Result<WorkspaceIdentity> {
        let folder_key = WorkspaceId::for_folders(folders);
        let dir = self.ad_hoc_root.join(&folder_key.0);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create workspace directory {:?}", dir))?;

        let file = WorkspaceFile {
            folders: folders
                .iter()
                .map(|f| WorkspaceFolderEntry::Uri { uri: f.to_string() })
                .collect(),
            remote_authority: remote_authority.map(str::to_string),
        };
        let path = dir.join(format!("workspace.{}", self.extension));
        let contents =
            serde_json::to_string_pretty(&file).context("Failed to serialize workspace config")?;
        let temp_path = dir.join(format!("workspace.{}.tmp", self.extension));
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write workspace config to {:?}", temp_path))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move workspace config into place at {:?}", path))?;

        let config_path = ResourceUri::from_file_path(&path)
            .with_context(|| format!("Workspace path {:?} is not absolute", path))?;
        let identity = WorkspaceIdentity::from_config(config_path).with_folders(folders.to_vec());
        log::info!(
            "Created ad-hoc workspace {} with {} folders at {:?}",
            identity.id,
            folders.len(),
            path
        );
        Ok(identity)
    }
}
