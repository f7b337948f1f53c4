//! New-window versus reuse decisions for unmatched targets.

use super::request::{OpenConfiguration, OpenContext};
use par_windows_config::Config;

/// Platform traits that change window behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    /// One menu bar shared by all windows (the application stays alive
    /// without windows and new windows follow the pointer)
    pub global_menu_bar: bool,
}

impl PlatformCapabilities {
    pub fn current() -> Self {
        Self {
            global_menu_bar: cfg!(target_os = "macos"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewWindowDecision {
    pub folders: bool,
    pub files: bool,
}

/// Decide whether folders and files that matched no window get a new one.
///
/// Explicit force flags win. Otherwise the context sets a default that an
/// `on`/`off` setting overrides.
pub fn decide_new_window(
    config: &OpenConfiguration,
    settings: &Config,
    platform: PlatformCapabilities,
) -> NewWindowDecision {
    let forced = config.force_new_window || config.force_reuse_window;

    let mut folders =
        (config.prefer_new_window || config.force_new_window) && !config.force_reuse_window;
    if !forced && let Some(on) = settings.open_folders_in_new_window.explicit() {
        folders = on;
    }

    let files = if forced {
        config.force_new_window && !config.force_reuse_window
    } else {
        let default = if platform.global_menu_bar {
            config.context == OpenContext::Dock
        } else {
            !matches!(config.context, OpenContext::Dialog | OpenContext::Menu)
        };
        match settings.open_files_in_new_window.explicit() {
            Some(on) if config.extension_development_paths.is_empty() => on,
            _ => default,
        }
    };

    NewWindowDecision { folders, files }
}
