//! State slot I/O for window session persistence
//!
//! The slot is stored in `<data dir>/par-windows/windows_state.json`. A
//! missing, empty or corrupt slot reads as an empty state; write failures
//! are logged and never surface to the caller.

use super::WindowsState;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// One durable key holding the serialized [`WindowsState`]
pub trait StateSlot {
    /// Raw payload, `None` when the slot was never written
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, contents: &str) -> Result<()>;
}

/// Slot backed by a JSON file, written atomically
#[derive(Debug, Clone)]
pub struct FileStateSlot {
    path: PathBuf,
}

impl FileStateSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Slot at the default location under `state_dir`
    pub fn in_dir(state_dir: PathBuf) -> Self {
        Self::new(state_dir.join("windows_state.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateSlot for FileStateSlot {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read window state from {:?}", self.path))?;
        Ok(Some(contents))
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory {:?}", parent))?;
        }
        // Write to a temp file then rename so a crash never leaves half a file
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write window state to {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to move window state into place at {:?}", self.path))?;
        Ok(())
    }
}

/// In-memory slot; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryStateSlot {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryStateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl StateSlot for MemoryStateSlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.lock().clone())
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        *self.contents.lock() = Some(contents.to_string());
        Ok(())
    }
}

/// Loads and saves [`WindowsState`] through a [`StateSlot`]
pub struct SessionStore {
    slot: Box<dyn StateSlot>,
}

impl SessionStore {
    pub fn new(slot: Box<dyn StateSlot>) -> Self {
        Self { slot }
    }

    /// Read the persisted state; any failure yields an empty state
    pub fn load(&self) -> WindowsState {
        match self.try_load() {
            Ok(Some(state)) => {
                log::info!(
                    "Loaded window state ({} opened windows, last active: {})",
                    state.opened_windows.len(),
                    state.last_active_window.is_some()
                );
                state
            }
            Ok(None) => WindowsState::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable window state: {:#}", e);
                WindowsState::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<WindowsState>> {
        let Some(contents) = self.slot.read()? else {
            return Ok(None);
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let mut state: WindowsState =
            serde_json::from_str(&contents).context("Failed to parse window state")?;
        for snapshot in state
            .last_active_window
            .iter_mut()
            .chain(state.last_extension_development_host_window.iter_mut())
            .chain(state.opened_windows.iter_mut())
        {
            snapshot.normalize();
        }
        Ok(Some(state))
    }

    /// Persist `state`; failures are logged and swallowed
    pub fn save(&mut self, state: &WindowsState) {
        if let Err(e) = self.try_save(state) {
            log::error!("Failed to persist window state: {:#}", e);
        }
    }

    fn try_save(&mut self, state: &WindowsState) -> Result<()> {
        let mut state = state.clone();
        state.saved_at = Some(chrono::Utc::now().to_rfc3339());
        let contents =
            serde_json::to_string_pretty(&state).context("Failed to serialize window state")?;
        self.slot.write(&contents)?;
        log::info!(
            "Saved window state ({} opened windows)",
            state.opened_windows.len()
        );
        Ok(())
    }
}
