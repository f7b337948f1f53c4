//! Normalized resource URIs for open targets and window identities.
//!
//! Every folder, workspace config and file the orchestrator deals with is
//! carried as a [`ResourceUri`]. Two URIs are equal when their normalized
//! forms are equal (scheme, authority and path with the trailing separator
//! removed), never by raw string identity.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// URI scheme marking a resource that lives behind a remote authority.
pub const REMOTE_SCHEME: &str = "remote";

/// Scheme of local filesystem URIs.
pub const FILE_SCHEME: &str = "file";

/// A parsed, normalized URI
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUri {
    url: Url,
}

impl ResourceUri {
    /// Parse and normalize a URI string
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self::normalized(Url::parse(input)?))
    }

    /// Build a `file://` URI from an absolute local path
    pub fn from_file_path(path: &Path) -> Option<Self> {
        let path = normalize_path(path);
        Url::from_file_path(&path).ok().map(Self::normalized)
    }

    /// Build a remote URI for `path` on `authority`
    pub fn remote(authority: &str, path: &str) -> Result<Self, url::ParseError> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self::parse(&format!("{REMOTE_SCHEME}://{authority}{path}"))
    }

    fn normalized(mut url: Url) -> Self {
        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
            let trimmed = trimmed.to_string();
            url.set_path(&trimmed);
        }
        url.set_fragment(None);
        Self { url }
    }

    /// URI scheme (`file`, `remote`, ...)
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Authority component, if any
    pub fn authority(&self) -> Option<&str> {
        self.url.host_str().filter(|h| !h.is_empty())
    }

    /// Path component
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// True for `file://` URIs
    pub fn is_local(&self) -> bool {
        self.scheme() == FILE_SCHEME
    }

    /// True when the scheme itself encodes a remote authority
    pub fn is_remote(&self) -> bool {
        self.scheme() == REMOTE_SCHEME
    }

    /// Local filesystem path for `file://` URIs
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.url.to_file_path().ok()
        } else {
            None
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> Option<&str> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
    }

    /// Extension of the last path segment, without the dot
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    /// Whether `self` is `other` or one of its ancestors
    pub fn is_equal_or_parent_of(&self, other: &ResourceUri) -> bool {
        if self.scheme() != other.scheme() || self.authority() != other.authority() {
            return false;
        }
        let parent = comparable_path(self.path());
        let child = comparable_path(other.path());
        if parent == child {
            return true;
        }
        let prefix = if parent.ends_with('/') {
            parent
        } else {
            format!("{parent}/")
        };
        child.starts_with(&prefix)
    }

    /// Number of path segments, used to rank ancestors by closeness
    pub fn depth(&self) -> usize {
        self.path().split('/').filter(|s| !s.is_empty()).count()
    }

    /// Underlying URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    fn comparison_key(&self) -> String {
        format!(
            "{}://{}{}",
            self.scheme(),
            self.authority().unwrap_or_default(),
            comparable_path(self.path())
        )
    }
}

/// Path case folding on platforms whose default filesystems ignore case
fn comparable_path(path: &str) -> String {
    if cfg!(any(windows, target_os = "macos")) {
        path.to_lowercase()
    } else {
        path.to_string()
    }
}

/// Lexically normalize a path: drop `.` components and fold `..`
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

impl PartialEq for ResourceUri {
    fn eq(&self, other: &Self) -> bool {
        self.comparison_key() == other.comparison_key()
    }
}

impl Eq for ResourceUri {}

impl Hash for ResourceUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparison_key().hash(state);
    }
}

impl PartialOrd for ResourceUri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResourceUri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparison_key().cmp(&other.comparison_key())
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl fmt::Debug for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceUri({})", self.url)
    }
}

impl TryFrom<String> for ResourceUri {
    type Error = url::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceUri> for String {
    fn from(value: ResourceUri) -> Self {
        value.url.to_string()
    }
}
