//! Command-line interface for par-windows.
//!
//! Turns command-line arguments into an [`OpenConfiguration`] for one
//! startup open request, plus the runtime options the binary needs.

use crate::orchestrator::{OpenConfiguration, OpenContext, OpenTargets, WaitMarker};
use crate::paths::UriToOpen;
use crate::uri::ResourceUri;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// par-windows - decide which windows to open, reuse, place and restore
#[derive(Parser, Debug)]
#[command(name = "par-windows")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Files, folders or workspace files to open (`path:line:col` with --goto)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Force a new window
    #[arg(short = 'n', long, conflicts_with = "reuse_window")]
    pub new_window: bool,

    /// Force opening in the last active window
    #[arg(short = 'r', long)]
    pub reuse_window: bool,

    /// Add folders to the last active window
    #[arg(short = 'a', long)]
    pub add: bool,

    /// Compare two files with each other
    #[arg(short = 'd', long)]
    pub diff: bool,

    /// Open a file at the line and column given as `path:line[:col]`
    #[arg(short = 'g', long)]
    pub goto: bool,

    /// Wait for the window to be closed before exiting
    #[arg(short = 'w', long)]
    pub wait: bool,

    /// Do not add the opened entries to the recently opened list
    #[arg(long)]
    pub skip_add_to_recently_opened: bool,

    /// Open an empty window in addition to anything else
    #[arg(long)]
    pub empty_window: bool,

    /// Remote authority for plain paths
    #[arg(long, value_name = "AUTHORITY")]
    pub remote: Option<String>,

    /// Folder URI to open (repeatable)
    #[arg(long, value_name = "URI")]
    pub folder_uri: Vec<String>,

    /// Workspace config URI to open (repeatable)
    #[arg(long, value_name = "URI")]
    pub workspace_uri: Vec<String>,

    /// File URI to open (repeatable)
    #[arg(long, value_name = "URI")]
    pub file_uri: Vec<String>,

    /// Extension source folder for an extension development host (repeatable)
    #[arg(long, value_name = "PATH")]
    pub extension_development_path: Vec<String>,

    /// Run the extension development host in test mode
    #[arg(long, requires = "extension_development_path")]
    pub extension_tests: bool,

    /// Directory holding the session state (default: platform state dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the persisted session state and exit
    ShowState,

    /// Delete the persisted session state
    ClearState,
}

/// Runtime options passed from the CLI to the binary
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// The startup open request
    pub open: OpenConfiguration,
    /// Session state directory override
    pub state_dir: Option<PathBuf>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with the open request
    Continue(RuntimeOptions),
    /// Run a state subcommand
    State(Commands, Option<PathBuf>),
    /// Exit with the given code
    Exit(i32),
}

/// Process CLI arguments
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();
    let state_dir = cli.state_dir.clone();

    if let Some(command) = cli.command {
        return CliResult::State(command, state_dir);
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("par-windows: error: cannot read current directory: {e}");
            return CliResult::Exit(1);
        }
    };
    match cli.to_open_configuration(cwd) {
        Ok(open) => CliResult::Continue(RuntimeOptions {
            open,
            state_dir,
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
        }),
        Err(e) => {
            eprintln!("par-windows: error: {e:#}");
            CliResult::Exit(2)
        }
    }
}

impl Cli {
    /// Startup open request described by these arguments
    pub fn to_open_configuration(&self, cwd: PathBuf) -> Result<OpenConfiguration> {
        let targets = if self.has_uri_targets() {
            let mut uris = Vec::new();
            for raw in &self.folder_uri {
                uris.push(UriToOpen::folder(parse_uri("--folder-uri", raw)?));
            }
            for raw in &self.workspace_uri {
                uris.push(UriToOpen::workspace(parse_uri("--workspace-uri", raw)?));
            }
            for raw in &self.file_uri {
                uris.push(UriToOpen::file(parse_uri("--file-uri", raw)?));
            }
            if !self.paths.is_empty() {
                log::warn!(
                    "Ignoring {} plain paths given together with URI options",
                    self.paths.len()
                );
            }
            OpenTargets::Api(uris)
        } else if self.paths.is_empty() {
            OpenTargets::None
        } else {
            OpenTargets::Cli(self.paths.clone())
        };

        let wait_marker = if self.wait {
            Some(WaitMarker(std::env::temp_dir().join(format!(
                "par-windows-wait-{}",
                uuid::Uuid::new_v4()
            ))))
        } else {
            None
        };

        Ok(OpenConfiguration {
            context: OpenContext::CommandLine,
            targets,
            cwd,
            remote_authority: self.remote.clone(),
            force_new_window: self.new_window,
            force_reuse_window: self.reuse_window,
            force_empty: self.empty_window,
            prefer_new_window: !self.reuse_window && !self.wait,
            add_mode: self.add,
            diff_mode: self.diff,
            goto_line_mode: self.goto,
            // Missing files from the command line are opened as new files
            ignore_file_not_found: true,
            force_open_as_file: false,
            no_recent_entry: self.skip_add_to_recently_opened,
            initial_startup: true,
            wait_marker,
            extension_development_paths: self.extension_development_path.clone(),
            extension_test_mode: self.extension_tests,
        })
    }

    fn has_uri_targets(&self) -> bool {
        !(self.folder_uri.is_empty() && self.workspace_uri.is_empty() && self.file_uri.is_empty())
    }
}

fn parse_uri(flag: &str, raw: &str) -> Result<ResourceUri> {
    ResourceUri::parse(raw).with_context(|| format!("Invalid {} value {:?}", flag, raw))
}
