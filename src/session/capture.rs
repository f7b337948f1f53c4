//! Capture window state while the application shuts down
//!
//! Shutdown arrives as a sequence of events: windows may close one by one
//! before or after the global "before shutdown" signal, and some platforms
//! close the last window before the application quits. Captures are keyed
//! by window so replaying an event overwrites rather than duplicates.

use super::{WindowSnapshot, WindowsState};
use crate::window::{WindowGeometry, WindowId, WindowRecord};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct CapturedWindow {
    snapshot: WindowSnapshot,
    focus_seq: u64,
    order: u64,
}

#[derive(Debug, Default)]
pub struct ShutdownCapture {
    shutting_down: bool,
    captured: BTreeMap<WindowId, CapturedWindow>,
    /// The last remaining window, closed while the application kept running
    last_closed: Option<WindowSnapshot>,
    /// Most recent non-test extension development host
    extension_development_host: Option<WindowSnapshot>,
    order: u64,
}

impl ShutdownCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// The application is quitting; windows that close from now on are
    /// captured instead of forgotten
    pub fn begin_quit(&mut self) {
        self.shutting_down = true;
    }

    /// Enter the shutdown phase and capture every window still open
    pub fn begin_shutdown<'a>(
        &mut self,
        windows: impl IntoIterator<Item = (&'a WindowRecord, Option<WindowGeometry>)>,
    ) {
        self.shutting_down = true;
        for (record, bounds) in windows {
            self.capture(record, bounds);
        }
    }

    /// A window is about to close; `remaining` counts windows still open,
    /// including this one.
    pub fn window_closing(
        &mut self,
        record: &WindowRecord,
        bounds: Option<WindowGeometry>,
        remaining: usize,
    ) {
        if self.shutting_down {
            self.capture(record, bounds);
            return;
        }

        self.remember_extension_development_host(record, bounds);
        if record.is_extension_development_host() {
            return;
        }
        if remaining <= 1 {
            // Closing the last window without quitting (some platforms keep
            // the application alive); remember it as the one to restore.
            self.last_closed = Some(WindowSnapshot::from_record(record, bounds));
        }
        self.captured.remove(&record.id);
    }

    /// A new window appeared, so the last closed one is no longer last active
    pub fn window_opened(&mut self) {
        if !self.shutting_down {
            self.last_closed = None;
        }
    }

    /// State to persist given what has been captured so far.
    ///
    /// `previous` supplies the extension development host snapshot when none
    /// was seen during this run.
    pub fn build_state(&self, previous: &WindowsState) -> WindowsState {
        let mut regular: Vec<&CapturedWindow> = self.captured.values().collect();
        regular.sort_by_key(|c| c.order);

        let last_active = regular
            .iter()
            .max_by_key(|c| c.focus_seq)
            .map(|c| c.snapshot.clone())
            .or_else(|| self.last_closed.clone());

        let opened_windows = if regular.len() >= 2 {
            regular.iter().map(|c| c.snapshot.clone()).collect()
        } else {
            Vec::new()
        };

        WindowsState {
            saved_at: None,
            last_active_window: last_active,
            last_extension_development_host_window: self
                .extension_development_host
                .clone()
                .or_else(|| previous.last_extension_development_host_window.clone()),
            opened_windows,
        }
    }

    fn capture(&mut self, record: &WindowRecord, bounds: Option<WindowGeometry>) {
        self.remember_extension_development_host(record, bounds);
        if record.is_extension_development_host() {
            return;
        }
        let order = match self.captured.get(&record.id) {
            Some(existing) => existing.order,
            None => {
                self.order += 1;
                self.order
            }
        };
        self.captured.insert(
            record.id,
            CapturedWindow {
                snapshot: WindowSnapshot::from_record(record, bounds),
                focus_seq: record.focus_seq(),
                order,
            },
        );
    }

    fn remember_extension_development_host(
        &mut self,
        record: &WindowRecord,
        bounds: Option<WindowGeometry>,
    ) {
        if record.is_extension_development_host() && !record.extension_test_mode {
            self.extension_development_host = Some(WindowSnapshot::from_record(record, bounds));
        }
    }
}
