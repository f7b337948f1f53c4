//! Turns raw path strings and typed URIs into [`PathToOpen`] values.
//!
//! Local targets are classified by looking them up on the filesystem. Remote targets
//! are never checked: a workspace-extension match makes a workspace, any
//! other extension (or a goto-line position) makes a file, and everything
//! else is treated as a folder. Problems never abort resolution; the target
//! is dropped and a [`ResolutionWarning`] is recorded instead.

use super::{EmptyTarget, FileTarget, FolderTarget, PathToOpen, UriToOpen, WorkspaceTarget};
use crate::error::{ResolutionWarning, WarningKind};
use crate::paths::parse_line_column;
use crate::traits::{FileKind, FileSystem, WorkspaceResolver};
use crate::uri::{ResourceUri, normalize_path};
use std::path::{Path, PathBuf};

/// Per-request resolution flags
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Authority applied to plain paths and non-local URIs without one
    pub remote_authority: Option<String>,
    /// Keep missing local files instead of dropping them
    pub ignore_file_not_found: bool,
    /// Never treat a workspace-extension file as a workspace
    pub force_open_as_file: bool,
    /// Parse `:line[:column]` suffixes
    pub goto_line_mode: bool,
    /// Base for relative paths
    pub cwd: PathBuf,
}

/// What the caller declared the target to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Any,
    Folder,
    Workspace,
    File,
}

/// Position and label carried through classification
#[derive(Debug, Clone, Default)]
struct Extras {
    line: Option<u32>,
    column: Option<u32>,
    label: Option<String>,
}

pub struct PathResolver<'a> {
    fs: &'a dyn FileSystem,
    workspaces: &'a dyn WorkspaceResolver,
    workspace_extension: &'a str,
}

impl<'a> PathResolver<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        workspaces: &'a dyn WorkspaceResolver,
        workspace_extension: &'a str,
    ) -> Self {
        Self {
            fs,
            workspaces,
            workspace_extension: workspace_extension.trim_start_matches('.'),
        }
    }

    /// Resolve a raw command-line style target (path or URI string)
    pub fn resolve(
        &self,
        raw: &str,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        let input = raw.trim();
        if input.is_empty() {
            report(
                warnings,
                ResolutionWarning::new(
                    WarningKind::Malformed,
                    raw,
                    "empty path",
                ),
            );
            return None;
        }

        let (input, line, column) = if options.goto_line_mode {
            parse_line_column(input)
        } else {
            (input, None, None)
        };
        let extras = Extras {
            line,
            column,
            label: None,
        };

        if looks_like_uri(input) {
            let uri = match ResourceUri::parse(input) {
                Ok(uri) => uri,
                Err(e) => {
                    report(
                        warnings,
                        ResolutionWarning::new(
                            WarningKind::Malformed,
                            raw,
                            format!("invalid URI: {e}"),
                        ),
                    );
                    return None;
                }
            };
            return self.resolve_resource(raw, uri, Expect::Any, extras, options, warnings);
        }

        if let Some(authority) = &options.remote_authority {
            let path = input.replace('\\', "/");
            return match ResourceUri::remote(authority, &path) {
                Ok(uri) => self.classify_remote(
                    raw,
                    uri,
                    Some(authority.clone()),
                    Expect::Any,
                    extras,
                    options,
                    warnings,
                ),
                Err(e) => {
                    report(
                        warnings,
                        ResolutionWarning::new(
                            WarningKind::Malformed,
                            raw,
                            format!("invalid remote path: {e}"),
                        ),
                    );
                    None
                }
            };
        }

        let path = normalize_path(&options.cwd.join(expand_home(input)));
        let Some(uri) = ResourceUri::from_file_path(&path) else {
            report(
                warnings,
                ResolutionWarning::new(
                    WarningKind::Malformed,
                    raw,
                    "path is not absolute",
                ),
            );
            return None;
        };
        self.classify_local(raw, uri, &path, Expect::Any, extras, options, warnings)
    }

    /// Resolve a typed target from the programmatic API
    pub fn resolve_uri(
        &self,
        target: &UriToOpen,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        let (expect, label) = match target {
            UriToOpen::Folder { label, .. } => (Expect::Folder, label.clone()),
            UriToOpen::Workspace { label, .. } => (Expect::Workspace, label.clone()),
            UriToOpen::File { .. } => (Expect::File, None),
        };
        let uri = target.uri().clone();
        let raw = uri.to_string();
        let extras = Extras {
            label,
            ..Default::default()
        };
        self.resolve_resource(&raw, uri, expect, extras, options, warnings)
    }

    fn resolve_resource(
        &self,
        raw: &str,
        uri: ResourceUri,
        expect: Expect,
        extras: Extras,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        // file:// is local no matter what authority was requested
        if uri.is_local() {
            let Some(path) = uri.to_file_path() else {
                report(
                    warnings,
                    ResolutionWarning::new(
                        WarningKind::Malformed,
                        raw,
                        "URI does not name a local path",
                    ),
                );
                return None;
            };
            return self.classify_local(raw, uri, &path, expect, extras, options, warnings);
        }

        let authority = if uri.is_remote() {
            let own = uri.authority().map(str::to_string);
            if let Some(requested) = &options.remote_authority
                && own.as_deref() != Some(requested.as_str())
            {
                report(
                    warnings,
                    ResolutionWarning::new(
                        WarningKind::AuthorityMismatch,
                        raw,
                        format!(
                            "URI authority {:?} differs from requested {:?}; using the URI's",
                            own.as_deref().unwrap_or_default(),
                            requested
                        ),
                    ),
                );
            }
            own
        } else {
            options.remote_authority.clone()
        };
        self.classify_remote(raw, uri, authority, expect, extras, options, warnings)
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_local(
        &self,
        raw: &str,
        uri: ResourceUri,
        path: &Path,
        expect: Expect,
        extras: Extras,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        match self.fs.stat(path) {
            None => {
                if options.ignore_file_not_found && matches!(expect, Expect::Any | Expect::File) {
                    return Some(PathToOpen::File(FileTarget {
                        uri,
                        line: extras.line,
                        column: extras.column,
                        remote_authority: None,
                        exists_on_disk: Some(false),
                    }));
                }
                report(
                    warnings,
                    ResolutionWarning::new(
                        WarningKind::NotFound,
                        raw,
                        format!("{} does not exist", path.display()),
                    ),
                );
                None
            }
            Some(FileKind::Directory) => Some(PathToOpen::Folder(FolderTarget {
                uri,
                remote_authority: None,
                label: extras.label,
            })),
            Some(FileKind::File) if expect == Expect::Folder => {
                report(
                    warnings,
                    ResolutionWarning::new(
                        WarningKind::NotFound,
                        raw,
                        format!("{} is not a folder", path.display()),
                    ),
                );
                None
            }
            Some(FileKind::File) => {
                self.file_or_workspace(raw, uri, None, Some(true), expect, extras, options, warnings)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_remote(
        &self,
        raw: &str,
        uri: ResourceUri,
        authority: Option<String>,
        expect: Expect,
        extras: Extras,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        let is_folder = match expect {
            Expect::Folder => true,
            Expect::Workspace | Expect::File => false,
            Expect::Any => {
                extras.line.is_none()
                    && uri.extension().is_none()
                    && !self.is_workspace_file(&uri, options)
            }
        };
        if is_folder {
            return Some(PathToOpen::Folder(FolderTarget {
                uri,
                remote_authority: authority,
                label: extras.label,
            }));
        }
        self.file_or_workspace(raw, uri, authority, None, expect, extras, options, warnings)
    }

    #[allow(clippy::too_many_arguments)]
    fn file_or_workspace(
        &self,
        raw: &str,
        uri: ResourceUri,
        authority: Option<String>,
        exists_on_disk: Option<bool>,
        expect: Expect,
        extras: Extras,
        options: &ResolveOptions,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<PathToOpen> {
        if expect == Expect::Workspace || self.is_workspace_file(&uri, options) {
            match self.workspaces.resolve_workspace_config(&uri) {
                Some(workspace) => {
                    return Some(PathToOpen::Workspace(WorkspaceTarget {
                        workspace,
                        remote_authority: authority,
                        label: extras.label,
                    }));
                }
                None if expect == Expect::Workspace => {
                    report(
                        warnings,
                        ResolutionWarning::new(
                            WarningKind::WorkspaceUnreadable,
                            raw,
                            "not a readable workspace config",
                        ),
                    );
                    return None;
                }
                None => {
                    report(
                        warnings,
                        ResolutionWarning::new(
                            WarningKind::WorkspaceUnreadable,
                            raw,
                            "not a readable workspace config; opening as a file",
                        ),
                    );
                }
            }
        }

        Some(PathToOpen::File(FileTarget {
            uri,
            line: extras.line,
            column: extras.column,
            remote_authority: authority,
            exists_on_disk,
        }))
    }

    fn is_workspace_file(&self, uri: &ResourceUri, options: &ResolveOptions) -> bool {
        !options.force_open_as_file && uri.extension() == Some(self.workspace_extension)
    }
}

fn report(warnings: &mut Vec<ResolutionWarning>, warning: ResolutionWarning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}

/// An empty-window target on `remote_authority`
pub fn empty_target(remote_authority: Option<String>) -> PathToOpen {
    PathToOpen::Empty(EmptyTarget {
        backup_slot: None,
        remote_authority,
    })
}

/// `scheme://` with a scheme of at least two characters (so `C:\` is a path)
pub(crate) fn looks_like_uri(input: &str) -> bool {
    let Some(end) = input.find("://") else {
        return false;
    };
    let scheme = &input[..end];
    scheme.len() >= 2
        && scheme.chars().enumerate().all(|(i, c)| {
            c.is_ascii_alphabetic() || (i > 0 && (c.is_ascii_digit() || "+.-".contains(c)))
        })
}

pub(crate) fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(input)
}
