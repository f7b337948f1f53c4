//! One-shot listeners that complete `--wait` style requests.
//!
//! A listener belongs to exactly one window. It fires once, on that window's
//! close or reload, and is dropped as soon as it fires.

use crate::window::WindowId;
use std::path::PathBuf;
use tokio::sync::oneshot;

/// Opaque token (a marker file path) the caller waits on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaitMarker(pub PathBuf);

impl WaitMarker {
    pub fn path(&self) -> &PathBuf {
        &self.0
    }
}

/// Caller side of a registered wait
#[derive(Debug)]
pub struct WaitHandle {
    window: WindowId,
    marker: WaitMarker,
    receiver: oneshot::Receiver<WaitMarker>,
}

impl WaitHandle {
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn marker(&self) -> &WaitMarker {
        &self.marker
    }

    /// The marker, once the window closed or reloaded
    pub fn try_completed(&mut self) -> Option<WaitMarker> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the window to close or reload; `None` if the orchestrator
    /// went away first
    pub async fn completed(self) -> Option<WaitMarker> {
        self.receiver.await.ok()
    }
}

struct Listener {
    window: WindowId,
    marker: WaitMarker,
    sender: oneshot::Sender<WaitMarker>,
}

#[derive(Default)]
pub(crate) struct WaitListeners {
    listeners: Vec<Listener>,
}

impl WaitListeners {
    pub(crate) fn register(&mut self, window: WindowId, marker: WaitMarker) -> WaitHandle {
        let (sender, receiver) = oneshot::channel();
        log::debug!("Waiting on window {} for {:?}", window, marker.path());
        self.listeners.push(Listener {
            window,
            marker: marker.clone(),
            sender,
        });
        WaitHandle {
            window,
            marker,
            receiver,
        }
    }

    /// Complete and drop every listener on `window`; returns how many fired
    pub(crate) fn fire(&mut self, window: WindowId, reason: &str) -> usize {
        let (fired, kept): (Vec<Listener>, Vec<Listener>) = std::mem::take(&mut self.listeners)
            .into_iter()
            .partition(|l| l.window == window);
        self.listeners = kept;
        for listener in &fired {
            log::info!(
                "Window {} {}; releasing wait marker {:?}",
                window,
                reason,
                listener.marker.path()
            );
        }
        let count = fired.len();
        for listener in fired {
            // The caller may have stopped waiting
            let _ = listener.sender.send(listener.marker);
        }
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
