//! Extension development host requests.
//!
//! A development host is keyed by its set of extension source folders. Asking
//! for the same set again reloads the existing host instead of creating a
//! second one; otherwise the host always gets a fresh window.

use super::Orchestrator;
use super::open::{Candidate, DevHost, OpenPass, Origin};
use super::request::{OpenConfiguration, OpenResult};
use crate::error::{ResolutionWarning, WarningKind};
use crate::paths::PathToOpen;
use crate::paths::resolver::{expand_home, looks_like_uri};
use crate::traits::WindowHost;
use crate::uri::ResourceUri;
use crate::window::{FileBatch, OpenedContent, WindowId};

impl<H: WindowHost> Orchestrator<H> {
    pub(super) fn open_extension_development_host(
        &mut self,
        config: OpenConfiguration,
        mut pass: OpenPass,
    ) -> OpenResult {
        let paths = extension_development_uris(&config, &mut pass.warnings);
        if paths.is_empty() {
            log::warn!("No usable extension development path; nothing opened");
            return self.finish(&config, pass);
        }
        pass.dev = Some(DevHost {
            paths: paths.clone(),
            test_mode: config.extension_test_mode,
        });

        let mut candidates = self.resolve_targets(&config, &mut pass.warnings);

        if let Some(existing) = self
            .registry
            .find_by_extension_development_path(&paths)
            .map(|w| w.id)
        {
            return self.reload_extension_development_host(config, pass, existing, candidates);
        }

        // Without targets the host reopens what the last one showed
        if config.targets.is_empty()
            && let Some(snapshot) = self
                .previous_state
                .last_extension_development_host_window
                .clone()
            && let Some(candidate) =
                self.snapshot_candidate(&snapshot, Origin::Session, &mut pass.warnings)
            && !matches!(candidate.path, PathToOpen::Empty(_))
        {
            log::info!(
                "Extension development host reopens {}",
                candidate.path.describe()
            );
            candidates.push(candidate);
        }

        let config = OpenConfiguration {
            force_new_window: true,
            force_reuse_window: false,
            add_mode: false,
            ..config
        };
        self.run(&config, candidates, pass)
    }

    /// Reload a running host, switching it to the first requested folder or
    /// workspace and handing it the requested files
    fn reload_extension_development_host(
        &mut self,
        config: OpenConfiguration,
        mut pass: OpenPass,
        id: WindowId,
        candidates: Vec<Candidate>,
    ) -> OpenResult {
        let Some(record) = self.registry.get(id) else {
            return self.finish(&config, pass);
        };
        let mut content = record.content.clone();
        let mut remote_authority = record.remote_authority.clone();
        let backup_slot = record.backup_slot.clone();

        let mut replaced = false;
        let mut files = Vec::new();
        for candidate in candidates {
            match candidate.path {
                PathToOpen::Workspace(t) if !replaced => {
                    content = OpenedContent::Workspace(t.workspace);
                    remote_authority = t.remote_authority;
                    replaced = true;
                }
                PathToOpen::Folder(t) if !replaced => {
                    content = OpenedContent::Folder(t.uri);
                    remote_authority = t.remote_authority;
                    replaced = true;
                }
                PathToOpen::File(file) => files.push(file.to_open()),
                _ => {}
            }
        }

        let batch = (!files.is_empty()).then(|| FileBatch {
            files,
            diff: None,
            remote_authority: remote_authority.clone(),
            wait_marker: config.wait_marker.clone(),
        });
        log::info!("Reloading extension development host {}", id);
        let payload = self.payload(&config, &pass, content, remote_authority, backup_slot, batch);
        self.reload_window(id, payload);
        pass.use_window(id, false, false);
        self.finish(&config, pass)
    }
}

/// Extension source folders as URIs; relative paths resolve against the cwd
fn extension_development_uris(
    config: &OpenConfiguration,
    warnings: &mut Vec<ResolutionWarning>,
) -> Vec<ResourceUri> {
    let mut uris: Vec<ResourceUri> = Vec::new();
    for raw in &config.extension_development_paths {
        let uri = if looks_like_uri(raw) {
            ResourceUri::parse(raw).ok()
        } else {
            let path = expand_home(raw);
            let path = if path.is_absolute() {
                path
            } else {
                config.cwd.join(path)
            };
            ResourceUri::from_file_path(&path)
        };
        match uri {
            Some(uri) if !uris.contains(&uri) => uris.push(uri),
            Some(_) => {}
            None => {
                let warning = ResolutionWarning::new(
                    WarningKind::Malformed,
                    raw.clone(),
                    "not a valid extension development path",
                );
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }
    uris
}
