// Library exports for the binary, the integration tests and embedders
//
// # Single-threaded model
//
// The orchestrator is owned by one thread and every call into it runs to
// completion before the next one starts. Collaborators (host, filesystem,
// workspace resolver) are synchronous trait objects. The only cross-thread
// pieces are:
//
//   - `tokio::sync::oneshot`  — wait-marker completion handed to the caller
//                               of `open()`, which may await it elsewhere.
//   - `parking_lot::Mutex`    — the process-wide debug logger and the
//                               in-memory session state slot shared with tests.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod backups;
pub mod cli;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod paths;
pub mod placement;
pub mod recents;
pub mod session;
pub mod traits;
pub mod uri;
pub mod window;
pub mod workspace;

pub use error::{CreationFailure, HostError, ResolutionWarning, WarningKind};
pub use orchestrator::{
    OpenConfiguration, OpenContext, OpenResult, OpenTargets, Orchestrator, Services,
    StartupContext,
};
pub use uri::ResourceUri;
pub use window::{WindowId, WindowRegistry};
