//! The open pipeline.
//!
//! One call runs these phases in order: resolve targets, restore the previous
//! session (initial startup only), coalesce folders into an ad-hoc workspace,
//! classify, match against live windows, open what is left, focus, update
//! recents and register the wait marker.

use super::Orchestrator;
use super::focus::select_focus;
use super::policy::decide_new_window;
use super::request::{OpenConfiguration, OpenResult, OpenTargets, OpenedWindow};
use crate::backups::BackupSlot;
use crate::error::{CreationFailure, ResolutionWarning, WarningKind};
use crate::paths::{
    EmptyTarget, FileTarget, PathResolver, PathToOpen, ResolveOptions, WorkspaceTarget,
};
use crate::placement::PlacementHints;
use crate::recents::RecentEntry;
use crate::traits::WindowHost;
use crate::uri::ResourceUri;
use crate::window::{
    FileBatch, LoadPayload, OpenedContent, WindowGeometry, WindowId, WindowInstruction,
    WindowRecord,
};

/// Where a candidate target came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Origin {
    Request,
    Session,
    Backup,
}

#[derive(Debug, Clone)]
pub(super) struct Candidate {
    pub(super) path: PathToOpen,
    pub(super) origin: Origin,
    /// Persisted UI state when reopening a previous window
    pub(super) ui_state: Option<WindowGeometry>,
}

impl Candidate {
    pub(super) fn new(path: PathToOpen, origin: Origin) -> Self {
        Self {
            path,
            origin,
            ui_state: None,
        }
    }

    fn empty(remote_authority: Option<String>) -> Self {
        Self::new(
            PathToOpen::Empty(EmptyTarget {
                backup_slot: None,
                remote_authority,
            }),
            Origin::Request,
        )
    }

    /// Brought back from a backup rather than asked for
    fn from_backup(&self) -> bool {
        self.origin == Origin::Backup
            || (self.origin == Origin::Session && matches!(self.path, PathToOpen::Empty(_)))
    }

    fn remote_authority(&self) -> Option<String> {
        self.path.remote_authority().map(str::to_string)
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct UsedWindow {
    pub(super) id: WindowId,
    pub(super) created: bool,
    pub(super) from_backup: bool,
}

/// Extension development host being opened by this pass
#[derive(Debug, Clone)]
pub(super) struct DevHost {
    pub(super) paths: Vec<ResourceUri>,
    pub(super) test_mode: bool,
}

/// Accumulated outcome of one open call
#[derive(Debug, Default)]
pub(super) struct OpenPass {
    pub(super) warnings: Vec<ResolutionWarning>,
    failures: Vec<CreationFailure>,
    used: Vec<UsedWindow>,
    recents: Vec<RecentEntry>,
    pub(super) dev: Option<DevHost>,
}

impl OpenPass {
    pub(super) fn use_window(&mut self, id: WindowId, created: bool, from_backup: bool) {
        if let Some(existing) = self.used.iter_mut().find(|w| w.id == id) {
            existing.created |= created;
            existing.from_backup &= from_backup;
            return;
        }
        self.used.push(UsedWindow {
            id,
            created,
            from_backup,
        });
    }
}

/// Targets sorted into what happens to them
#[derive(Debug, Default)]
struct Plan {
    workspaces: Vec<Candidate>,
    folders: Vec<Candidate>,
    folders_to_add: Vec<(ResourceUri, Option<String>)>,
    add_target: Option<WindowId>,
    empties_to_restore: Vec<Candidate>,
    /// Empty windows the caller asked for explicitly
    empty_requested: usize,
    empty_to_open: usize,
    files: Option<FileBatch>,
    /// Recents for the file batch, recorded once the batch is delivered
    file_recents: Vec<RecentEntry>,
}

impl Plan {
    fn contains(&self, candidate: &Candidate) -> bool {
        match &candidate.path {
            PathToOpen::Workspace(t) => self.workspaces.iter().any(|c| {
                matches!(&c.path, PathToOpen::Workspace(o) if o.workspace.id == t.workspace.id)
            }),
            PathToOpen::Folder(t) => self
                .folders
                .iter()
                .any(|c| matches!(&c.path, PathToOpen::Folder(o) if o.uri == t.uri)),
            PathToOpen::Empty(t) if t.backup_slot.is_some() => {
                self.empties_to_restore.iter().any(|c| {
                    matches!(&c.path, PathToOpen::Empty(o) if o.backup_slot == t.backup_slot)
                })
            }
            _ => false,
        }
    }
}

/// Take the batch if it belongs on `remote_authority`
fn take_files_for(files: &mut Option<FileBatch>, remote_authority: Option<&str>) -> Option<FileBatch> {
    if files
        .as_ref()
        .is_some_and(|b| b.remote_authority.as_deref() == remote_authority)
    {
        files.take()
    } else {
        None
    }
}

fn backup_slot_for(content: &OpenedContent) -> BackupSlot {
    match content {
        OpenedContent::Workspace(workspace) => BackupSlot::for_workspace(&workspace.id),
        OpenedContent::Folder(folder) => BackupSlot::for_folder(folder),
        OpenedContent::Empty => BackupSlot::generate(),
    }
}

impl<H: WindowHost> Orchestrator<H> {
    /// Open whatever `config` asks for. Never fails as a whole: dropped
    /// targets come back as warnings and failed windows as failures.
    pub fn open(&mut self, config: OpenConfiguration) -> OpenResult {
        log::info!(
            "Open request from {:?} with {} targets{}",
            config.context,
            config.targets.len(),
            if config.initial_startup {
                " (initial startup)"
            } else {
                ""
            }
        );
        let mut pass = OpenPass::default();

        if !config.extension_development_paths.is_empty() {
            return self.open_extension_development_host(config, pass);
        }

        let mut candidates = self.resolve_targets(&config, &mut pass.warnings);
        if config.initial_startup
            && config.targets.is_empty()
            && !config.force_empty
            && !config.extension_test_mode
        {
            candidates.extend(self.restore_candidates(&mut pass.warnings));
        }
        if config.force_empty {
            candidates.push(Candidate::empty(config.remote_authority.clone()));
        }

        self.run(&config, candidates, pass)
    }

    pub(super) fn resolve_targets(
        &self,
        config: &OpenConfiguration,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Vec<Candidate> {
        let options = ResolveOptions {
            remote_authority: config.remote_authority.clone(),
            ignore_file_not_found: config.ignore_file_not_found,
            force_open_as_file: config.force_open_as_file,
            goto_line_mode: config.goto_line_mode,
            cwd: config.cwd.clone(),
        };
        let resolver = PathResolver::new(
            self.services.fs.as_ref(),
            self.services.workspaces.as_ref(),
            self.settings.workspace_extension(),
        );
        let resolved: Vec<PathToOpen> = match &config.targets {
            OpenTargets::None => Vec::new(),
            OpenTargets::Cli(paths) => paths
                .iter()
                .filter_map(|raw| resolver.resolve(raw, &options, warnings))
                .collect(),
            OpenTargets::Api(uris) => uris
                .iter()
                .filter_map(|uri| resolver.resolve_uri(uri, &options, warnings))
                .collect(),
        };
        resolved
            .into_iter()
            .map(|path| Candidate::new(path, Origin::Request))
            .collect()
    }

    pub(super) fn run(
        &mut self,
        config: &OpenConfiguration,
        mut candidates: Vec<Candidate>,
        mut pass: OpenPass,
    ) -> OpenResult {
        if candidates.is_empty() {
            if !config.targets.is_empty() && !config.initial_startup {
                log::warn!(
                    "Nothing to open: all {} targets were dropped",
                    config.targets.len()
                );
                return self.finish(config, pass);
            }
            if !self.opens_empty_without_arguments(config)
                && let Some(id) = self
                    .registry
                    .last_active_where(|w| !w.is_extension_development_host())
                    .map(|w| w.id)
            {
                log::info!("No targets; focusing last active window {}", id);
                pass.use_window(id, false, false);
                return self.finish(config, pass);
            }
            candidates.push(Candidate::empty(config.remote_authority.clone()));
        }

        self.coalesce_folders(config, &mut candidates);
        let mut plan = self.classify(config, candidates, &mut pass);

        let decision = decide_new_window(config, &self.settings, self.startup.platform);
        let match_existing = pass.dev.is_none();
        let mut open_folder_in_new_window = decision.folders || !match_existing;
        log::debug!(
            "Window policy: folders in new window: {}, files in new window: {}",
            decision.folders,
            decision.files
        );

        // Folders merged into the active window
        if let Some(target) = plan.add_target
            && !plan.folders_to_add.is_empty()
        {
            let folders = std::mem::take(&mut plan.folders_to_add);
            log::info!("Adding {} folders to window {}", folders.len(), target);
            self.deliver(
                target,
                WindowInstruction::AddFolders(folders.iter().map(|(uri, _)| uri.clone()).collect()),
            );
            pass.recents.extend(
                folders
                    .into_iter()
                    .map(|(uri, authority)| RecentEntry::folder(uri, authority)),
            );
            pass.use_window(target, false, false);
        }

        // Only files: route them to the best existing window
        let potential_windows = plan.workspaces.len()
            + plan.folders.len()
            + plan.empties_to_restore.len()
            + plan.empty_requested
            + plan.empty_to_open;
        if potential_windows == 0
            && match_existing
            && let Some(batch) = plan.files.take()
        {
            match self.best_window_for_files(config, &batch, decision.files) {
                Some(id) => {
                    log::info!("Opening {} files in window {}", batch.len(), id);
                    self.deliver(id, WindowInstruction::OpenFiles(batch));
                    pass.recents.append(&mut plan.file_recents);
                    pass.use_window(id, false, false);
                }
                None => plan.files = Some(batch),
            }
        }

        // Workspaces, then folders: focus those already open, open the rest
        let groups = [
            std::mem::take(&mut plan.workspaces),
            std::mem::take(&mut plan.folders),
        ];
        for group in groups {
            let mut matched = false;
            let mut remaining = Vec::new();
            for candidate in group {
                let existing = if match_existing {
                    self.window_showing(&candidate.path)
                } else {
                    None
                };
                match existing {
                    Some(id) if !matched => {
                        matched = true;
                        let files = take_files_for(&mut plan.files, candidate.path.remote_authority());
                        self.reuse_window(&mut pass, &mut plan.file_recents, id, &candidate, files);
                    }
                    Some(id) => {
                        log::debug!("{} is already open in window {}", candidate.path.describe(), id);
                        self.record_recent(&mut pass, &candidate.path);
                    }
                    None => remaining.push(candidate),
                }
            }
            if matched {
                // The matched window took the "current window" slot
                open_folder_in_new_window = true;
            }
            for candidate in remaining {
                let files = take_files_for(&mut plan.files, candidate.path.remote_authority());
                self.open_folder_or_workspace(
                    config,
                    &mut pass,
                    &mut plan.file_recents,
                    &candidate,
                    open_folder_in_new_window,
                    files,
                );
                open_folder_in_new_window = true;
            }
        }

        // Empty windows with unsaved state always get their own window
        for candidate in std::mem::take(&mut plan.empties_to_restore) {
            let files = take_files_for(&mut plan.files, candidate.path.remote_authority());
            self.open_empty(config, &mut pass, &mut plan.file_recents, &candidate, true, files);
            open_folder_in_new_window = true;
        }

        // Plain empty windows, which also carry files nobody else took.
        // Requested empties open even when other targets already opened.
        let mut empties = plan.empty_requested;
        if pass.used.is_empty() || plan.files.is_some() {
            empties += plan.empty_to_open;
            if plan.files.is_some() && empties == 0 {
                empties = 1;
            }
        }
        if empties > 0 {
            let remote_authority = match &plan.files {
                Some(batch) => batch.remote_authority.clone(),
                None => config.remote_authority.clone(),
            };
            for _ in 0..empties {
                let candidate = Candidate::empty(remote_authority.clone());
                let files = plan.files.take();
                self.open_empty(
                    config,
                    &mut pass,
                    &mut plan.file_recents,
                    &candidate,
                    open_folder_in_new_window,
                    files,
                );
                open_folder_in_new_window = true;
            }
        }

        self.finish(config, pass)
    }

    /// Focus, recents and wait marker; builds the result
    pub(super) fn finish(&mut self, config: &OpenConfiguration, mut pass: OpenPass) -> OpenResult {
        let focused = select_focus(
            &pass.used,
            &self.registry,
            self.previous_state.last_active_window.as_ref(),
            config.has_explicit_targets(),
        );
        if let Some(id) = focused {
            self.host.focus(id);
            self.registry.mark_focused(id);
            log::info!("Focused window {}", id);
        }

        if !config.no_recent_entry && pass.dev.is_none() && !pass.recents.is_empty() {
            self.services
                .recents
                .add_recent(std::mem::take(&mut pass.recents));
        }

        let wait = match &config.wait_marker {
            Some(marker) if pass.used.len() == 1 => {
                Some(self.waiters.register(pass.used[0].id, marker.clone()))
            }
            Some(marker) => {
                log::warn!(
                    "Not waiting on {:?}: {} windows resulted",
                    marker.path(),
                    pass.used.len()
                );
                None
            }
            None => None,
        };

        OpenResult {
            windows: pass
                .used
                .iter()
                .map(|w| OpenedWindow {
                    id: w.id,
                    created: w.created,
                })
                .collect(),
            focused,
            warnings: pass.warnings,
            failures: pass.failures,
            wait,
        }
    }

    fn opens_empty_without_arguments(&self, config: &OpenConfiguration) -> bool {
        config.initial_startup
            || config.force_new_window
            || self.registry.is_empty()
            || (self.settings.open_without_arguments_in_new_window && !config.force_reuse_window)
    }

    /// Replace several requested folders by one ad-hoc workspace
    fn coalesce_folders(&mut self, config: &OpenConfiguration, candidates: &mut Vec<Candidate>) {
        if config.add_mode || config.targets.is_empty() {
            return;
        }
        let indices: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.origin == Origin::Request && matches!(c.path, PathToOpen::Folder(_)))
            .map(|(i, _)| i)
            .collect();
        if indices.len() < 2 {
            return;
        }

        let mut folders: Vec<ResourceUri> = Vec::new();
        let mut authorities: Vec<Option<String>> = Vec::new();
        for &i in &indices {
            if let PathToOpen::Folder(t) = &candidates[i].path {
                if !folders.contains(&t.uri) {
                    folders.push(t.uri.clone());
                }
                authorities.push(t.remote_authority.clone());
            }
        }
        let remote_authority = authorities.first().cloned().flatten();
        if authorities.iter().any(|a| *a != remote_authority) {
            log::debug!("Folders span several remote authorities; opening them separately");
            return;
        }
        if folders.len() < 2 {
            return;
        }

        match self
            .services
            .workspaces
            .create_ad_hoc_workspace(&folders, remote_authority.as_deref())
        {
            Ok(workspace) => {
                log::info!(
                    "Opening {} folders as workspace {}",
                    folders.len(),
                    workspace.id
                );
                candidates[indices[0]] = Candidate::new(
                    PathToOpen::Workspace(WorkspaceTarget {
                        workspace,
                        remote_authority,
                        label: None,
                    }),
                    Origin::Request,
                );
                for &i in indices[1..].iter().rev() {
                    candidates.remove(i);
                }
            }
            Err(e) => log::warn!(
                "Could not create a workspace for {} folders, opening them separately: {:#}",
                folders.len(),
                e
            ),
        }
    }

    fn classify(
        &self,
        config: &OpenConfiguration,
        candidates: Vec<Candidate>,
        pass: &mut OpenPass,
    ) -> Plan {
        let mut plan = Plan::default();
        let mut files: Vec<FileTarget> = Vec::new();

        for candidate in candidates {
            if plan.contains(&candidate) {
                log::debug!("Skipping duplicate target {}", candidate.path.describe());
                continue;
            }
            let restorable_empty = matches!(
                &candidate.path,
                PathToOpen::Empty(t) if t.backup_slot.is_some()
            );
            let requested = candidate.origin == Origin::Request;
            match candidate.path {
                PathToOpen::Workspace(_) => plan.workspaces.push(candidate),
                PathToOpen::Folder(_) => plan.folders.push(candidate),
                PathToOpen::File(file) => {
                    if !files.iter().any(|f| f.uri == file.uri) {
                        files.push(file);
                    }
                }
                PathToOpen::Empty(_) if restorable_empty => plan.empties_to_restore.push(candidate),
                PathToOpen::Empty(_) if requested => plan.empty_requested += 1,
                PathToOpen::Empty(_) => plan.empty_to_open += 1,
            }
        }

        if let Some(first) = files.first() {
            let remote_authority = first.remote_authority.clone();
            if files.iter().any(|f| f.remote_authority != remote_authority) {
                log::debug!(
                    "Files span several remote authorities; all go to {:?}",
                    remote_authority
                );
            }
            let batch = if config.diff_mode && files.len() == 2 {
                FileBatch {
                    files: Vec::new(),
                    diff: Some((files[0].to_open(), files[1].to_open())),
                    remote_authority,
                    wait_marker: config.wait_marker.clone(),
                }
            } else {
                plan.file_recents = files
                    .iter()
                    .map(|f| RecentEntry::file(f.uri.clone(), f.remote_authority.clone()))
                    .collect();
                FileBatch {
                    files: files.iter().map(FileTarget::to_open).collect(),
                    diff: None,
                    remote_authority,
                    wait_marker: config.wait_marker.clone(),
                }
            };
            plan.files = Some(batch);
        }

        if config.add_mode && !plan.folders.is_empty() {
            self.plan_add_mode(&mut plan, pass);
        }
        plan
    }

    /// Move folders that can join the active window into `folders_to_add`
    fn plan_add_mode(&self, plan: &mut Plan, pass: &mut OpenPass) {
        let remote_authority = plan.folders[0].remote_authority();
        let active = self
            .registry
            .last_active_where(|w| {
                !w.is_extension_development_host() && w.remote_authority == remote_authority
            })
            .map(|w| w.id);

        let Some(active) = active else {
            for candidate in &plan.folders {
                let warning = ResolutionWarning::new(
                    WarningKind::AddModeUnavailable,
                    candidate.path.describe(),
                    "no active window to add the folder to; opening it instead",
                );
                log::warn!("{}", warning);
                pass.warnings.push(warning);
            }
            return;
        };

        let (to_add, rest): (Vec<Candidate>, Vec<Candidate>) = std::mem::take(&mut plan.folders)
            .into_iter()
            .partition(|c| c.remote_authority() == remote_authority);
        plan.folders = rest;
        plan.folders_to_add = to_add
            .into_iter()
            .filter_map(|c| match c.path {
                PathToOpen::Folder(t) => Some((t.uri, t.remote_authority)),
                _ => None,
            })
            .collect();
        plan.add_target = Some(active);
    }

    /// Regular window already showing the workspace or folder of `path`
    fn window_showing(&self, path: &PathToOpen) -> Option<WindowId> {
        match path {
            PathToOpen::Workspace(t) => self.registry.find_by_workspace(&t.workspace.id),
            PathToOpen::Folder(t) => self.registry.find_by_folder(&t.uri),
            _ => None,
        }
        .map(|w| w.id)
    }

    /// Existing window for a file-only request.
    ///
    /// A window whose folders contain the file wins (closest root first);
    /// otherwise the last active window when files may reuse windows.
    fn best_window_for_files(
        &self,
        config: &OpenConfiguration,
        batch: &FileBatch,
        open_files_in_new_window: bool,
    ) -> Option<WindowId> {
        if config.force_new_window {
            return None;
        }
        let remote_authority = batch.remote_authority.as_deref();
        let external = config.context.is_external();
        let eligible = |w: &WindowRecord| {
            w.remote_authority.as_deref() == remote_authority
                && !(external && w.is_extension_development_host())
        };

        let first_file = batch
            .files
            .first()
            .or(batch.diff.as_ref().map(|(left, _)| left));
        if let Some(file) = first_file {
            let containing = self
                .registry
                .windows()
                .iter()
                .filter(|w| eligible(w))
                .filter_map(|w| w.containing_root_depth(&file.uri).map(|depth| (w, depth)))
                .max_by_key(|(w, depth)| (*depth, w.focus_seq()))
                .map(|(w, _)| w.id);
            if containing.is_some() {
                return containing;
            }
        }

        if open_files_in_new_window {
            return None;
        }
        self.registry.last_active_where(&eligible).map(|w| w.id)
    }

    fn reuse_window(
        &mut self,
        pass: &mut OpenPass,
        file_recents: &mut Vec<RecentEntry>,
        id: WindowId,
        candidate: &Candidate,
        files: Option<FileBatch>,
    ) {
        log::info!(
            "{} is already open in window {}",
            candidate.path.describe(),
            id
        );
        if let Some(batch) = files {
            self.deliver(id, WindowInstruction::OpenFiles(batch));
            pass.recents.append(file_recents);
        }
        self.record_recent(pass, &candidate.path);
        pass.use_window(id, false, candidate.from_backup());
    }

    fn open_folder_or_workspace(
        &mut self,
        config: &OpenConfiguration,
        pass: &mut OpenPass,
        file_recents: &mut Vec<RecentEntry>,
        candidate: &Candidate,
        force_new_window: bool,
        files: Option<FileBatch>,
    ) {
        let content = match &candidate.path {
            PathToOpen::Workspace(t) => OpenedContent::Workspace(t.workspace.clone()),
            PathToOpen::Folder(t) => OpenedContent::Folder(t.uri.clone()),
            _ => return,
        };
        let backup_slot = backup_slot_for(&content);
        let has_files = files.is_some();
        let payload = self.payload(
            config,
            pass,
            content,
            candidate.remote_authority(),
            Some(backup_slot),
            files,
        );

        // Never take over a window that is developing an extension
        let reuse = if force_new_window || pass.dev.is_some() {
            None
        } else {
            self.registry
                .last_active_where(|w| !w.is_extension_development_host())
                .map(|w| w.id)
        };

        let opened = match reuse {
            Some(id) => {
                self.reload_window(id, payload);
                Some((id, false))
            }
            None => self
                .create_window(pass, payload, candidate.ui_state, candidate.path.describe())
                .map(|id| (id, true)),
        };
        if let Some((id, created)) = opened {
            if has_files {
                pass.recents.append(file_recents);
            }
            self.record_recent(pass, &candidate.path);
            pass.use_window(id, created, candidate.from_backup());
        }
    }

    fn open_empty(
        &mut self,
        config: &OpenConfiguration,
        pass: &mut OpenPass,
        file_recents: &mut Vec<RecentEntry>,
        candidate: &Candidate,
        force_new_window: bool,
        files: Option<FileBatch>,
    ) {
        let PathToOpen::Empty(target) = &candidate.path else {
            return;
        };
        let remote_authority = target.remote_authority.clone();
        let backup_slot = target
            .backup_slot
            .clone()
            .unwrap_or_else(BackupSlot::generate);
        let has_files = files.is_some();
        let payload = self.payload(
            config,
            pass,
            OpenedContent::Empty,
            remote_authority.clone(),
            Some(backup_slot),
            files,
        );

        let reuse = if !force_new_window && config.force_reuse_window && pass.dev.is_none() {
            self.registry
                .last_active_where(|w| {
                    !w.is_extension_development_host() && w.remote_authority == remote_authority
                })
                .map(|w| w.id)
        } else {
            None
        };

        let opened = match reuse {
            Some(id) => {
                self.reload_window(id, payload);
                Some((id, false))
            }
            None => self
                .create_window(pass, payload, candidate.ui_state, candidate.path.describe())
                .map(|id| (id, true)),
        };
        if let Some((id, created)) = opened {
            if has_files {
                pass.recents.append(file_recents);
            }
            pass.use_window(id, created, candidate.from_backup());
        }
    }

    pub(super) fn payload(
        &self,
        config: &OpenConfiguration,
        pass: &OpenPass,
        content: OpenedContent,
        remote_authority: Option<String>,
        backup_slot: Option<BackupSlot>,
        files: Option<FileBatch>,
    ) -> LoadPayload {
        LoadPayload {
            content,
            remote_authority,
            backup_slot,
            files,
            extension_development_paths: pass
                .dev
                .as_ref()
                .map(|d| d.paths.clone())
                .unwrap_or_default(),
            extension_test_mode: pass.dev.as_ref().is_some_and(|d| d.test_mode),
            initial_startup: config.initial_startup,
        }
    }

    /// Load new content into an existing window
    pub(super) fn reload_window(&mut self, id: WindowId, payload: LoadPayload) {
        log::info!(
            "Reusing window {} for {}",
            id,
            payload.content.describe()
        );
        self.registry
            .replace_content(id, payload.content.clone(), payload.remote_authority.clone());
        if let Some(record) = self.registry.get_mut(id) {
            record.backup_slot = payload.backup_slot.clone();
        }
        self.deliver(id, WindowInstruction::Load(payload));
        self.waiters.fire(id, "reloaded");
    }

    /// Place and create a window; registers it only once the host succeeded
    fn create_window(
        &mut self,
        pass: &mut OpenPass,
        payload: LoadPayload,
        restored: Option<WindowGeometry>,
        target: String,
    ) -> Option<WindowId> {
        let displays = self.host.displays();
        let cursor = self.host.cursor_position();
        let host = &self.host;
        let bounds_of = |r: &WindowRecord| host.current_bounds(r.id).unwrap_or(r.ui_state);
        let last_active = self.registry.last_active().map(bounds_of);
        let occupied: Vec<(i32, i32)> = self
            .registry
            .windows()
            .iter()
            .map(|r| bounds_of(r).top_left())
            .collect();

        let geometry = self.placement.place_new_window(&PlacementHints {
            displays: &displays,
            cursor,
            last_active,
            occupied: &occupied,
            restored,
        });

        match self.host.create(&geometry, &payload) {
            Ok(id) => {
                let mut record = WindowRecord::new(id, payload.content, geometry)
                    .with_remote_authority(payload.remote_authority)
                    .with_backup_slot(payload.backup_slot);
                if let Some(dev) = &pass.dev {
                    record.extension_development_paths = dev.paths.clone();
                    record.extension_test_mode = dev.test_mode;
                }
                self.registry.add(record);
                self.capture.window_opened();
                log::info!("Created window {} for {} at {:?}", id, target, geometry);
                Some(id)
            }
            Err(source) => {
                log::error!("Failed to create window for {}: {}", target, source);
                pass.failures.push(CreationFailure { target, source });
                None
            }
        }
    }

    fn deliver(&mut self, id: WindowId, instruction: WindowInstruction) {
        if !self.host.is_ready(id) {
            log::debug!("Window {} is still loading; host queues the instruction", id);
        }
        self.host.send(id, instruction);
    }

    fn record_recent(&self, pass: &mut OpenPass, path: &PathToOpen) {
        let entry = match path {
            PathToOpen::Workspace(t) => {
                RecentEntry::workspace(t.workspace.clone(), t.remote_authority.clone())
                    .with_label(t.label.clone())
            }
            PathToOpen::Folder(t) => RecentEntry::folder(t.uri.clone(), t.remote_authority.clone())
                .with_label(t.label.clone()),
            _ => return,
        };
        pass.recents.push(entry);
    }
}
