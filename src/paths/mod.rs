//! Resolved open targets and the resolver that produces them.

pub mod line_col;
pub mod resolver;

pub use line_col::parse_line_column;
pub use resolver::{PathResolver, ResolveOptions};

use crate::backups::BackupSlot;
use crate::traits::{FileKind, FileSystem};
use crate::uri::ResourceUri;
use crate::window::FileToOpen;
use crate::workspace::WorkspaceIdentity;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTarget {
    pub uri: ResourceUri,
    pub remote_authority: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceTarget {
    pub workspace: WorkspaceIdentity,
    pub remote_authority: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub uri: ResourceUri,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub remote_authority: Option<String>,
    /// `None` when existence could not be checked (remote files)
    pub exists_on_disk: Option<bool>,
}

impl FileTarget {
    pub fn to_open(&self) -> FileToOpen {
        FileToOpen {
            uri: self.uri.clone(),
            line: self.line,
            column: self.column,
        }
    }
}

/// A typed target supplied through the programmatic API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriToOpen {
    Folder {
        uri: ResourceUri,
        label: Option<String>,
    },
    Workspace {
        uri: ResourceUri,
        label: Option<String>,
    },
    File {
        uri: ResourceUri,
    },
}

impl UriToOpen {
    pub fn folder(uri: ResourceUri) -> Self {
        UriToOpen::Folder { uri, label: None }
    }

    pub fn workspace(uri: ResourceUri) -> Self {
        UriToOpen::Workspace { uri, label: None }
    }

    pub fn file(uri: ResourceUri) -> Self {
        UriToOpen::File { uri }
    }

    pub fn uri(&self) -> &ResourceUri {
        match self {
            UriToOpen::Folder { uri, .. }
            | UriToOpen::Workspace { uri, .. }
            | UriToOpen::File { uri } => uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmptyTarget {
    pub backup_slot: Option<BackupSlot>,
    pub remote_authority: Option<String>,
}

/// A classified, validated open target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToOpen {
    Folder(FolderTarget),
    Workspace(WorkspaceTarget),
    File(FileTarget),
    Empty(EmptyTarget),
}

impl PathToOpen {
    pub fn remote_authority(&self) -> Option<&str> {
        match self {
            PathToOpen::Folder(t) => t.remote_authority.as_deref(),
            PathToOpen::Workspace(t) => t.remote_authority.as_deref(),
            PathToOpen::File(t) => t.remote_authority.as_deref(),
            PathToOpen::Empty(t) => t.remote_authority.as_deref(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, PathToOpen::File(_))
    }

    pub fn describe(&self) -> String {
        match self {
            PathToOpen::Folder(t) => t.uri.to_string(),
            PathToOpen::Workspace(t) => t.workspace.config_path.to_string(),
            PathToOpen::File(t) => t.uri.to_string(),
            PathToOpen::Empty(t) => match &t.backup_slot {
                Some(slot) => format!("empty window ({slot})"),
                None => "empty window".to_string(),
            },
        }
    }
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn stat(&self, path: &Path) -> Option<FileKind> {
        let metadata = std::fs::metadata(path).ok()?;
        if metadata.is_dir() {
            Some(FileKind::Directory)
        } else {
            Some(FileKind::File)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_file_system_stat() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let fs = LocalFileSystem;
        assert_eq!(fs.stat(temp.path()), Some(FileKind::Directory));
        assert_eq!(fs.stat(&file), Some(FileKind::File));
        assert_eq!(fs.stat(&temp.path().join("missing")), None);
    }
}
