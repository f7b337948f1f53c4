//! A window host without a window system.
//!
//! Windows exist only as in-memory records and every call is kept as a
//! [`HostEvent`]. The `par-windows` binary prints those events as the plan
//! for an open request; integration tests assert on them.

use crate::error::HostError;
use crate::placement::{Display, fallback_display};
use crate::traits::WindowHost;
use crate::window::{LoadPayload, WindowGeometry, WindowId, WindowInstruction};
use std::collections::BTreeMap;
use std::fmt;

/// Something the orchestrator asked the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Created {
        window: WindowId,
        geometry: WindowGeometry,
        payload: LoadPayload,
    },
    Sent {
        window: WindowId,
        instruction: WindowInstruction,
    },
    Focused(WindowId),
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::Created {
                window,
                geometry,
                payload,
            } => {
                write!(
                    f,
                    "create {} {} at {},{} {}x{} ({:?})",
                    window,
                    payload.content.describe(),
                    geometry.x,
                    geometry.y,
                    geometry.width,
                    geometry.height,
                    geometry.mode
                )?;
                if let Some(files) = &payload.files {
                    write!(f, " with {} files", files.len())?;
                }
                Ok(())
            }
            HostEvent::Sent {
                window,
                instruction,
            } => match instruction {
                WindowInstruction::Load(payload) => {
                    write!(f, "reload {} with {}", window, payload.content.describe())
                }
                WindowInstruction::OpenFiles(batch) => {
                    write!(f, "open {} files in {}", batch.len(), window)
                }
                WindowInstruction::AddFolders(folders) => {
                    write!(f, "add {} folders to {}", folders.len(), window)
                }
            },
            HostEvent::Focused(window) => write!(f, "focus {}", window),
        }
    }
}

#[derive(Debug, Clone)]
struct HostWindow {
    geometry: WindowGeometry,
    ready: bool,
}

pub struct HeadlessHost {
    next_id: u64,
    windows: BTreeMap<WindowId, HostWindow>,
    displays: Vec<Display>,
    cursor: Option<(i32, i32)>,
    events: Vec<HostEvent>,
    /// Creations left before `create` starts failing (`None` = unlimited)
    creation_budget: Option<usize>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(vec![fallback_display()])
    }
}

impl HeadlessHost {
    pub fn new(displays: Vec<Display>) -> Self {
        Self {
            next_id: 1,
            windows: BTreeMap::new(),
            displays,
            cursor: None,
            events: Vec::new(),
            creation_budget: None,
        }
    }

    pub fn with_cursor(mut self, cursor: (i32, i32)) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Let only `count` more windows be created; later creations fail
    pub fn limit_creations(&mut self, count: usize) {
        self.creation_budget = Some(count);
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Simulate the user moving or resizing a window
    pub fn set_bounds(&mut self, window: WindowId, geometry: WindowGeometry) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.geometry = geometry;
        }
    }

    pub fn set_ready(&mut self, window: WindowId, ready: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.ready = ready;
        }
    }

    /// Forget a window the user closed
    pub fn close(&mut self, window: WindowId) {
        self.windows.remove(&window);
    }
}

impl WindowHost for HeadlessHost {
    fn create(
        &mut self,
        geometry: &WindowGeometry,
        payload: &LoadPayload,
    ) -> Result<WindowId, HostError> {
        if let Some(budget) = self.creation_budget.as_mut() {
            if *budget == 0 {
                crate::debug_error!(
                    "HOST",
                    "Refusing to create window for {}",
                    payload.content.describe()
                );
                return Err(HostError::CreationFailed(
                    "window limit reached".to_string(),
                ));
            }
            *budget -= 1;
        }

        let window = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            window,
            HostWindow {
                geometry: *geometry,
                ready: true,
            },
        );
        crate::debug_info!(
            "HOST",
            "Created window {} for {}",
            window,
            payload.content.describe()
        );
        self.events.push(HostEvent::Created {
            window,
            geometry: *geometry,
            payload: payload.clone(),
        });
        Ok(window)
    }

    fn send(&mut self, window: WindowId, instruction: WindowInstruction) {
        if !self.windows.contains_key(&window) {
            log::warn!("Instruction for unknown window {} dropped", window);
            return;
        }
        crate::debug_trace!("HOST", "Instruction for {}: {:?}", window, instruction);
        self.events.push(HostEvent::Sent {
            window,
            instruction,
        });
    }

    fn focus(&mut self, window: WindowId) {
        crate::debug_log!("HOST", "Focus {}", window);
        self.events.push(HostEvent::Focused(window));
    }

    fn current_bounds(&self, window: WindowId) -> Option<WindowGeometry> {
        self.windows.get(&window).map(|w| w.geometry)
    }

    fn is_ready(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.ready)
    }

    fn displays(&self) -> Vec<Display> {
        self.displays.clone()
    }

    fn cursor_position(&self) -> Option<(i32, i32)> {
        self.cursor
    }
}
