//! Default values referenced from `#[serde(default = "...")]` attributes.

use crate::types::WindowReusePolicy;

pub fn bool_true() -> bool {
    true
}

pub fn open_files_in_new_window() -> WindowReusePolicy {
    WindowReusePolicy::Off
}

pub fn default_window_width() -> u32 {
    1024
}

pub fn default_window_height() -> u32 {
    768
}

pub fn workspace_file_extension() -> String {
    "code-workspace".to_string()
}

pub fn max_recent_entries() -> usize {
    50
}
