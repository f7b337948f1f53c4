//! The set of live windows, with lookup by identity and focus recency.
//!
//! Two regular windows never claim the same workspace or folder. Extension
//! development hosts are keyed by their development path set instead, so they
//! may show content that any other window also shows. Empty windows never
//! conflict with each other.

use super::{OpenedContent, WindowGeometry, WindowId, WindowRecord};
use crate::error::IdentityConflict;
use crate::uri::ResourceUri;
use crate::workspace::WorkspaceId;

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: Vec<WindowRecord>,
    focus_counter: u64,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a window. The new window counts as most recently focused.
    ///
    /// A record that claims an identity already held by another window is a
    /// programming error: debug builds panic, release builds log it and evict
    /// the older record, which is returned.
    pub fn add(&mut self, mut record: WindowRecord) -> Option<WindowRecord> {
        let evicted = match self.conflict_for(record.id, &record) {
            Some(conflict) => self.resolve_conflict(conflict),
            None => None,
        };
        if let Some(existing) = self.windows.iter().position(|w| w.id == record.id) {
            log::warn!("Window {} registered twice, replacing record", record.id);
            self.windows.remove(existing);
        }
        self.focus_counter += 1;
        record.focus_seq = self.focus_counter;
        log::debug!(
            "Registered window {} ({})",
            record.id,
            record.content.describe()
        );
        self.windows.push(record);
        evicted
    }

    /// Change what an existing window shows (after a reload instruction)
    pub fn replace_content(
        &mut self,
        id: WindowId,
        content: OpenedContent,
        remote_authority: Option<String>,
    ) -> Option<WindowRecord> {
        let mut updated = self.get(id)?.clone();
        updated.content = content;
        updated.remote_authority = remote_authority;
        let evicted = match self.conflict_for(id, &updated) {
            Some(conflict) => self.resolve_conflict(conflict),
            None => None,
        };
        if let Some(record) = self.get_mut(id) {
            record.content = updated.content;
            record.remote_authority = updated.remote_authority;
        }
        evicted
    }

    pub fn remove(&mut self, id: WindowId) -> Option<WindowRecord> {
        let index = self.windows.iter().position(|w| w.id == id)?;
        Some(self.windows.remove(index))
    }

    /// Record that `id` received focus; returns false for unknown windows
    pub fn mark_focused(&mut self, id: WindowId) -> bool {
        self.focus_counter += 1;
        let seq = self.focus_counter;
        match self.get_mut(id) {
            Some(record) => {
                record.focus_seq = seq;
                true
            }
            None => false,
        }
    }

    pub fn update_ui_state(&mut self, id: WindowId, ui_state: WindowGeometry) {
        if let Some(record) = self.get_mut(id) {
            record.ui_state = ui_state;
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// All windows in creation order
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Regular (non extension development) window showing `workspace`
    pub fn find_by_workspace(&self, workspace: &WorkspaceId) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_extension_development_host())
            .find(|w| w.workspace_id() == Some(workspace))
    }

    /// Regular (non extension development) window showing `folder`
    pub fn find_by_folder(&self, folder: &ResourceUri) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_extension_development_host())
            .find(|w| w.content.folder() == Some(folder))
    }

    /// Extension development host running exactly the set `paths`
    pub fn find_by_extension_development_path(
        &self,
        paths: &[ResourceUri],
    ) -> Option<&WindowRecord> {
        if paths.is_empty() {
            return None;
        }
        self.windows.iter().find(|w| {
            let own = &w.extension_development_paths;
            own.iter().all(|p| paths.contains(p)) && paths.iter().all(|p| own.contains(p))
        })
    }

    /// Most recently focused window
    pub fn last_active(&self) -> Option<&WindowRecord> {
        self.last_active_where(|_| true)
    }

    /// Most recently focused window on `remote_authority` (`None` = local)
    pub fn last_active_with_authority(
        &self,
        remote_authority: Option<&str>,
    ) -> Option<&WindowRecord> {
        self.last_active_where(|w| w.remote_authority.as_deref() == remote_authority)
    }

    /// Most recently focused window satisfying `predicate`
    pub fn last_active_where(
        &self,
        predicate: impl Fn(&WindowRecord) -> bool,
    ) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| predicate(w))
            .max_by_key(|w| w.focus_seq)
    }

    fn conflict_for(&self, incoming: WindowId, record: &WindowRecord) -> Option<IdentityConflict> {
        if record.is_extension_development_host() {
            return None;
        }
        let key = record.content.identity_key()?;
        self.windows
            .iter()
            .filter(|w| w.id != incoming)
            .filter(|w| !w.is_extension_development_host())
            .find(|w| w.content.identity_key().as_deref() == Some(key.as_str()))
            .map(|existing| IdentityConflict {
                identity: key.clone(),
                existing: existing.id,
                incoming,
            })
    }

    fn resolve_conflict(&mut self, conflict: IdentityConflict) -> Option<WindowRecord> {
        if cfg!(debug_assertions) {
            panic!("window registry invariant violated: {conflict}");
        }
        log::error!("{}; evicting the older window", conflict);
        self.remove(conflict.existing)
    }
}
