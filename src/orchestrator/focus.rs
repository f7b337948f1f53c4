//! Which of the windows touched by one open call ends up focused.

use super::open::UsedWindow;
use crate::session::WindowSnapshot;
use crate::window::{WindowId, WindowRegistry};

/// Pick the window to focus.
///
/// With several windows the previous session's last active window wins when
/// the call named no paths, then the latest window not restored from a
/// backup, then simply the latest window.
pub(super) fn select_focus(
    used: &[UsedWindow],
    registry: &WindowRegistry,
    previous_last_active: Option<&WindowSnapshot>,
    explicit_targets: bool,
) -> Option<WindowId> {
    match used {
        [] => None,
        [only] => Some(only.id),
        _ => {
            if !explicit_targets
                && let Some(previous) = previous_last_active
                && let Some(found) = used.iter().find(|w| {
                    registry
                        .get(w.id)
                        .is_some_and(|r| WindowSnapshot::from_record(r, None).same_identity(previous))
                })
            {
                log::debug!("Focusing previously active window {}", found.id);
                return Some(found.id);
            }
            if let Some(found) = used.iter().rev().find(|w| !w.from_backup) {
                return Some(found.id);
            }
            used.last().map(|w| w.id)
        }
    }
}
