use anyhow::{Context, Result};
use par_windows::backups::InMemoryBackups;
use par_windows::cli::{self, Commands};
use par_windows::host::HeadlessHost;
use par_windows::orchestrator::{OpenResult, PlatformCapabilities, WaitMarker};
use par_windows::paths::LocalFileSystem;
use par_windows::recents::{RecentlyOpened, SharedRecents};
use par_windows::session::{FileStateSlot, SessionStore, StateSlot};
use par_windows::workspace::LocalWorkspaceResolver;
use par_windows::{Orchestrator, Services, StartupContext, WindowId};
use par_windows_config::Config;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => std::process::exit(code),
        cli::CliResult::State(command, state_dir) => {
            return run_state_command(command, state_dir.unwrap_or_else(Config::state_dir));
        }
        cli::CliResult::Continue(options) => options,
    };
    // CLI --log-level takes precedence, then RUST_LOG, then config (applied below)
    par_windows::debug::init_log_bridge(options.log_level);
    log::info!("Starting par-windows {}", par_windows::VERSION);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{:#}; using default settings", e);
            Config::default()
        }
    };
    par_windows::debug::apply_config_level(
        config.log_level.to_level_filter(),
        options.log_level.is_some(),
    );

    let state_dir = options.state_dir.clone().unwrap_or_else(Config::state_dir);
    let recents_path = state_dir.join("recent.json");
    let recents: SharedRecents = Arc::new(Mutex::new(
        RecentlyOpened::load_from(&recents_path, config.max_recent_entries).unwrap_or_else(|e| {
            log::warn!("{:#}; starting with an empty recents list", e);
            RecentlyOpened::new(config.max_recent_entries)
        }),
    ));

    let services = Services {
        fs: Box::new(LocalFileSystem),
        workspaces: Box::new(LocalWorkspaceResolver::new(
            config.workspace_extension(),
            state_dir.join("workspaces"),
        )),
        backups: Box::new(InMemoryBackups::default()),
        recents: Box::new(recents.clone()),
    };
    let session = SessionStore::new(Box::new(FileStateSlot::in_dir(state_dir.clone())));
    let startup = StartupContext {
        relaunched_after_update: false,
        platform: PlatformCapabilities::current(),
    };
    let mut orchestrator =
        Orchestrator::new(config, HeadlessHost::default(), services, session, startup);

    let wait_marker = options.open.wait_marker.clone();
    if let Some(marker) = &wait_marker {
        std::fs::write(marker.path(), b"")
            .with_context(|| format!("Failed to create wait marker {:?}", marker.path()))?;
    }

    let mut result = orchestrator.open(options.open);
    print_plan(&mut orchestrator, &result);

    if let Some(handle) = result.wait.take() {
        println!(
            "waiting on {} (press Ctrl-C to close it)",
            handle.window()
        );
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
        });
        shutdown(&mut orchestrator);
        match runtime.block_on(handle.completed()) {
            Some(marker) => log::info!("Wait on {:?} completed", marker.path()),
            None => log::warn!("Wait listener dropped before completing"),
        }
    } else {
        shutdown(&mut orchestrator);
    }

    if let Some(marker) = &wait_marker {
        remove_wait_marker(marker);
    }
    if let Err(e) = recents.lock().save_to(&recents_path) {
        log::error!("{:#}", e);
    }
    log::info!("par-windows finished");
    Ok(())
}

/// Capture every window, persist, then close them one by one
fn shutdown(orchestrator: &mut Orchestrator<HeadlessHost>) {
    orchestrator.on_quit_requested();
    orchestrator.on_before_shutdown();
    let windows: Vec<WindowId> = orchestrator
        .registry()
        .windows()
        .iter()
        .map(|w| w.id)
        .collect();
    for window in windows {
        orchestrator.on_before_window_close(window);
        orchestrator.host_mut().close(window);
    }
}

fn print_plan(orchestrator: &mut Orchestrator<HeadlessHost>, result: &OpenResult) {
    for event in orchestrator.host_mut().take_events() {
        println!("{event}");
    }
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    for failure in &result.failures {
        println!("failed: {failure}");
    }
    let created = result.created().count();
    let reused = result.reused().count();
    match result.focused {
        Some(window) => println!("{created} created, {reused} reused, {window} focused"),
        None => println!("{created} created, {reused} reused, nothing focused"),
    }
}

fn remove_wait_marker(marker: &WaitMarker) {
    if let Err(e) = std::fs::remove_file(marker.path())
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove wait marker {:?}: {}", marker.path(), e);
    }
}

fn run_state_command(command: Commands, state_dir: PathBuf) -> Result<()> {
    let slot = FileStateSlot::in_dir(state_dir);
    match command {
        Commands::ShowState => match slot.read()? {
            Some(contents) => println!("{contents}"),
            None => println!("No saved session at {:?}", slot.path()),
        },
        Commands::ClearState => clear_state(slot.path())?,
    }
    Ok(())
}

fn clear_state(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove session state {:?}", path))?;
        println!("Removed {:?}", path);
    } else {
        println!("No saved session at {:?}", path);
    }
    Ok(())
}
