//! Turning the previous session and backups into open targets.

use super::Orchestrator;
use super::open::{Candidate, Origin};
use crate::backups::BackupSlot;
use crate::error::{ResolutionWarning, WarningKind};
use crate::paths::{EmptyTarget, FolderTarget, PathToOpen, WorkspaceTarget};
use crate::session::{WindowSnapshot, windows_to_restore};
use crate::traits::{FileKind, WindowHost};
use crate::uri::ResourceUri;
use par_windows_config::RestoreWindows;

impl<H: WindowHost> Orchestrator<H> {
    /// Restore policy in effect for this start
    pub fn effective_restore_policy(&self) -> RestoreWindows {
        if self.startup.relaunched_after_update {
            RestoreWindows::All
        } else {
            self.settings.restore_windows
        }
    }

    pub(super) fn restore_candidates(
        &self,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Vec<Candidate> {
        let policy = self.effective_restore_policy();
        let mut candidates: Vec<Candidate> = windows_to_restore(&self.previous_state, policy)
            .iter()
            .filter_map(|snapshot| self.snapshot_candidate(snapshot, Origin::Session, warnings))
            .collect();

        if policy != RestoreWindows::None {
            self.add_backup_candidates(&mut candidates, policy);
        }

        log::info!(
            "Restoring {} windows (policy: {})",
            candidates.len(),
            policy.display_name()
        );
        candidates
    }

    /// Candidate reopening what `snapshot` showed, if it still exists
    pub(super) fn snapshot_candidate(
        &self,
        snapshot: &WindowSnapshot,
        origin: Origin,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Option<Candidate> {
        let remote_authority = snapshot.remote_authority.clone();
        let path = if let Some(workspace) = &snapshot.workspace {
            if !self.local_entry_exists(&workspace.config_path, FileKind::File, warnings) {
                return None;
            }
            PathToOpen::Workspace(WorkspaceTarget {
                workspace: workspace.clone(),
                remote_authority,
                label: None,
            })
        } else if let Some(folder) = &snapshot.folder_uri {
            if !self.local_entry_exists(folder, FileKind::Directory, warnings) {
                return None;
            }
            PathToOpen::Folder(FolderTarget {
                uri: folder.clone(),
                remote_authority,
                label: None,
            })
        } else {
            let backup_slot = snapshot.backup_slot.clone()?;
            PathToOpen::Empty(EmptyTarget {
                backup_slot: Some(backup_slot),
                remote_authority,
            })
        };
        Some(Candidate {
            path,
            origin,
            ui_state: Some(snapshot.ui_state),
        })
    }

    fn add_backup_candidates(&self, candidates: &mut Vec<Candidate>, policy: RestoreWindows) {
        let backups = &self.services.backups;

        for workspace in backups.workspace_backups() {
            let known = candidates.iter().any(|c| {
                matches!(&c.path, PathToOpen::Workspace(t) if t.workspace.id == workspace.id)
            });
            if !known {
                let remote_authority = authority_of(&workspace.config_path);
                candidates.push(Candidate::new(
                    PathToOpen::Workspace(WorkspaceTarget {
                        workspace,
                        remote_authority,
                        label: None,
                    }),
                    Origin::Backup,
                ));
            }
        }

        for folder in backups.folder_backups() {
            let known = candidates
                .iter()
                .any(|c| matches!(&c.path, PathToOpen::Folder(t) if t.uri == folder));
            if !known {
                let remote_authority = authority_of(&folder);
                candidates.push(Candidate::new(
                    PathToOpen::Folder(FolderTarget {
                        uri: folder,
                        remote_authority,
                        label: None,
                    }),
                    Origin::Backup,
                ));
            }
        }

        // Empty windows only come back when restoring everything
        if policy == RestoreWindows::All {
            for slot in backups.empty_window_backups() {
                if !has_empty_slot(candidates, &slot) {
                    candidates.push(Candidate::new(
                        PathToOpen::Empty(EmptyTarget {
                            backup_slot: Some(slot),
                            remote_authority: None,
                        }),
                        Origin::Backup,
                    ));
                }
            }
        }
    }

    /// Remote entries are trusted; local ones must still exist as `kind`
    fn local_entry_exists(
        &self,
        uri: &ResourceUri,
        kind: FileKind,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> bool {
        let Some(path) = uri.to_file_path() else {
            return true;
        };
        if self.services.fs.stat(&path) == Some(kind) {
            return true;
        }
        log::warn!("Not restoring {}: no longer exists", uri);
        warnings.push(ResolutionWarning::new(
            WarningKind::NotFound,
            uri.to_string(),
            "previously open window no longer exists",
        ));
        false
    }
}

fn authority_of(uri: &ResourceUri) -> Option<String> {
    if uri.is_remote() {
        uri.authority().map(str::to_string)
    } else {
        None
    }
}

fn has_empty_slot(candidates: &[Candidate], slot: &BackupSlot) -> bool {
    candidates.iter().any(|c| {
        matches!(&c.path, PathToOpen::Empty(t) if t.backup_slot.as_ref() == Some(slot))
    })
}
