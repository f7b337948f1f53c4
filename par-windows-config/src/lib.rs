//! Configuration system for the par-windows orchestration engine.
//!
//! This crate provides configuration loading, saving, and default values
//! for the window orchestrator. It includes:
//!
//! - Window reuse policies for folders and files
//! - The restore-windows policy consulted at startup
//! - New-window dimension policy and default window size
//! - Logging level

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{LogLevel, NewWindowDimensions, RestoreWindows, WindowReusePolicy};
