//! Enumerations used by the configuration struct.

use serde::{Deserialize, Serialize};

// ============================================================================
// Window reuse
// ============================================================================

/// Whether opening a folder or file should create a new window.
///
/// `Default` defers to the orchestrator's built-in rules (open context,
/// platform family, `prefer_new_window`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowReusePolicy {
    /// Always open in a new window
    On,
    /// Always reuse the last active window
    Off,
    /// Let the open context decide
    #[default]
    Default,
}

impl WindowReusePolicy {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            WindowReusePolicy::On => "On",
            WindowReusePolicy::Off => "Off",
            WindowReusePolicy::Default => "Default",
        }
    }

    /// Resolve the policy to an explicit choice, if it makes one
    pub fn explicit(self) -> Option<bool> {
        match self {
            WindowReusePolicy::On => Some(true),
            WindowReusePolicy::Off => Some(false),
            WindowReusePolicy::Default => None,
        }
    }
}

// ============================================================================
// Restore
// ============================================================================

/// How many previously open windows are reconstructed on launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestoreWindows {
    /// Reopen every window, including empty windows with unsaved state
    #[default]
    All,
    /// Reopen windows that had a folder or workspace
    Folders,
    /// Reopen only the last active window
    One,
    /// Never reopen windows
    None,
}

impl RestoreWindows {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            RestoreWindows::All => "All",
            RestoreWindows::Folders => "Folders",
            RestoreWindows::One => "One",
            RestoreWindows::None => "None",
        }
    }
}

// ============================================================================
// New window geometry
// ============================================================================

/// Size and mode of a brand-new window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NewWindowDimensions {
    /// Default size centered on the chosen display
    #[default]
    Default,
    /// Copy the last active window's geometry
    Inherit,
    /// Start maximized
    Maximized,
    /// Start fullscreen
    Fullscreen,
}

// ============================================================================
// Logging
// ============================================================================

/// Log level for the debug log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
