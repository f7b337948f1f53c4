//! Pick the windows to reconstruct at startup

use super::{WindowSnapshot, WindowsState};
use par_windows_config::RestoreWindows;

/// Snapshots to reopen under `policy`, deduplicated by identity.
///
/// The previously last active window comes last so it ends up on top.
/// Snapshots without any restorable identity are skipped.
pub fn windows_to_restore(state: &WindowsState, policy: RestoreWindows) -> Vec<WindowSnapshot> {
    let mut selected: Vec<WindowSnapshot> = Vec::new();
    match policy {
        RestoreWindows::None => {}
        RestoreWindows::One => {
            selected.extend(state.last_active_window.iter().cloned());
        }
        RestoreWindows::Folders | RestoreWindows::All => {
            let last_active = state.last_active_window.as_ref();
            for snapshot in &state.opened_windows {
                if last_active.is_some_and(|last| last.same_identity(snapshot)) {
                    continue;
                }
                if !selected.iter().any(|s| s.same_identity(snapshot)) {
                    selected.push(snapshot.clone());
                }
            }
            selected.extend(last_active.cloned());
        }
    }

    selected.retain(|s| s.has_identity());
    if policy == RestoreWindows::Folders {
        selected.retain(|s| s.workspace.is_some() || s.folder_uri.is_some());
    }
    selected
}
