//! Integration tests for session capture at shutdown and restore at startup.

mod common;

use common::{FakeFs, FakeWorkspaces, Harness, cli, startup, uri};
use par_windows::ResourceUri;
use par_windows::backups::{BackupSlot, InMemoryBackups};
use par_windows::host::HostEvent;
use par_windows::session::MemoryStateSlot;
use par_windows::window::{OpenedContent, WindowGeometry, WindowId};
use par_windows::{OpenConfiguration, StartupContext, WarningKind};
use par_windows_config::{Config, RestoreWindows};

fn prefer_new(paths: &[&str]) -> OpenConfiguration {
    OpenConfiguration {
        prefer_new_window: true,
        ..cli(paths)
    }
}

fn only_window_on(h: &Harness, folder: &str) -> WindowId {
    let windows = h.windows_on(folder);
    assert_eq!(windows.len(), 1, "expected one window on {folder}");
    windows[0]
}

#[test]
fn test_restores_every_window_with_geometry_and_focus() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let a = h.open(prefer_new(&["/a"])).windows[0].id;
    h.open(prefer_new(&["/b"]));
    h.orchestrator
        .host_mut()
        .set_bounds(a, WindowGeometry::new(100, 100, 800, 600));
    h.orchestrator.notify_window_focused(a);

    let mut h = h.restart();
    let saved = h.saved_state();
    assert_eq!(saved.opened_windows.len(), 2);
    assert_eq!(
        saved.last_active_window.as_ref().and_then(|s| s.folder_uri.clone()),
        Some(uri("/a"))
    );

    let result = h.open(startup());

    assert_eq!(result.windows.len(), 2);
    assert!(result.windows.iter().all(|w| w.created));
    let a = only_window_on(&h, "/a");
    let b = only_window_on(&h, "/b");
    assert_eq!(h.record(a).ui_state, WindowGeometry::new(100, 100, 800, 600));
    assert_eq!(h.record(b).ui_state, WindowGeometry::new(478, 186, 1024, 768));
    assert_eq!(result.focused, Some(a));
}

#[test]
fn test_restored_windows_keep_their_remote_authority() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    h.open(prefer_new(&["/a"]));
    h.open(prefer_new(&["/srv/app"]).with_remote_authority("box"));
    let remote_folder = ResourceUri::remote("box", "/srv/app").unwrap();

    let mut h = h.restart();
    let saved = h.saved_state();
    assert_eq!(saved.opened_windows.len(), 2);
    for snapshot in &saved.opened_windows {
        let expected = (snapshot.folder_uri == Some(remote_folder.clone())).then_some("box");
        assert_eq!(snapshot.remote_authority.as_deref(), expected);
    }

    h.open(startup());

    let created: Vec<(OpenedContent, Option<String>)> = h
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            HostEvent::Created { payload, .. } => Some((payload.content, payload.remote_authority)),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), 2);
    assert!(created.contains(&(OpenedContent::Folder(uri("/a")), None)));
    assert!(created.contains(&(OpenedContent::Folder(remote_folder), Some("box".to_string()))));
}

#[test]
fn test_quit_saves_same_session_whichever_signal_fires_first() {
    let session = |closing_windows_first: bool| {
        let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
        let a = h.open(prefer_new(&["/a"])).windows[0].id;
        h.open(prefer_new(&["/b"]));
        h.orchestrator
            .host_mut()
            .set_bounds(a, WindowGeometry::new(100, 100, 800, 600));
        h.orchestrator.notify_window_focused(a);
        if closing_windows_first {
            h.quit_closing_windows_first();
        } else {
            h.shutdown();
        }
        h
    };

    let shutdown_first = session(false).saved_state();
    let h = session(true);
    let closing_first = h.saved_state();

    assert_eq!(closing_first.opened_windows.len(), 2);
    assert_eq!(closing_first.opened_windows, shutdown_first.opened_windows);
    assert_eq!(closing_first.last_active_window, shutdown_first.last_active_window);
    assert_eq!(
        closing_first.last_active_window.and_then(|s| s.folder_uri),
        Some(uri("/a"))
    );

    let mut h = h.relaunch(StartupContext::default());
    let result = h.open(startup());
    assert_eq!(result.windows.len(), 2);
    assert_eq!(result.focused, Some(only_window_on(&h, "/a")));
}

#[test]
fn test_single_window_is_saved_as_last_active_only() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    h.open(cli(&["/a"]));

    let mut h = h.restart();
    let saved = h.saved_state();
    assert!(saved.opened_windows.is_empty());
    assert_eq!(
        saved.last_active_window.and_then(|s| s.folder_uri),
        Some(uri("/a"))
    );

    let result = h.open(startup());
    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.content(result.windows[0].id), OpenedContent::Folder(uri("/a")));
}

#[test]
fn test_saved_state_is_camel_case_json() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    h.open(cli(&["/a"]));
    h.shutdown();

    let json = h.state.contents().expect("state should be saved at shutdown");
    assert!(json.contains("\"lastActiveWindow\""));
    assert!(json.contains("\"folderUri\""));
    assert!(json.contains("\"uiState\""));
    assert!(json.contains("\"savedAt\""));
}

#[test]
fn test_window_closed_before_quit_is_not_restored() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let a = h.open(prefer_new(&["/a"])).windows[0].id;
    h.open(prefer_new(&["/b"]));
    h.close(a);

    let mut h = h.restart();
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 1);
    assert!(h.windows_on("/a").is_empty());
    assert_eq!(h.windows_on("/b").len(), 1);
}

#[test]
fn test_last_window_closed_is_remembered() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    let a = h.open(cli(&["/a"])).windows[0].id;
    // The application keeps running with no windows
    h.close(a);
    assert!(h.window_ids().is_empty());

    let mut h = h.restart();
    assert_eq!(
        h.saved_state().last_active_window.and_then(|s| s.folder_uri),
        Some(uri("/a"))
    );
    h.open(startup());
    assert_eq!(h.windows_on("/a").len(), 1);
}

#[test]
fn test_new_window_clears_last_closed() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let a = h.open(cli(&["/a"])).windows[0].id;
    h.close(a);
    h.open(cli(&["/b"]));

    let h = h.restart();
    assert_eq!(
        h.saved_state().last_active_window.and_then(|s| s.folder_uri),
        Some(uri("/b"))
    );
}

#[test]
fn test_restore_policy_none_opens_empty_window() {
    let config = Config {
        restore_windows: RestoreWindows::None,
        ..Config::default()
    };
    let mut h = Harness::with_config(FakeFs::with_dirs(&["/a"]), config);
    h.open(cli(&["/a"]));

    let mut h = h.restart();
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.content(result.windows[0].id), OpenedContent::Empty);
}

#[test]
fn test_restore_policy_one_reopens_last_active() {
    let config = Config {
        restore_windows: RestoreWindows::One,
        ..Config::default()
    };
    let mut h = Harness::with_config(FakeFs::with_dirs(&["/a", "/b"]), config);
    h.open(prefer_new(&["/a"]));
    h.open(prefer_new(&["/b"]));

    let mut h = h.restart();
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.windows_on("/b").len(), 1);
}

#[test]
fn test_relaunch_after_update_restores_everything() {
    let config = Config {
        restore_windows: RestoreWindows::One,
        ..Config::default()
    };
    let mut h = Harness::with_config(FakeFs::with_dirs(&["/a", "/b"]), config);
    h.open(prefer_new(&["/a"]));
    h.open(prefer_new(&["/b"]));
    h.shutdown();

    let mut h = h.relaunch(StartupContext {
        relaunched_after_update: true,
        ..StartupContext::default()
    });
    assert_eq!(h.orchestrator.effective_restore_policy(), RestoreWindows::All);
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 2);
}

#[test]
fn test_deleted_folder_is_not_restored() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    h.open(cli(&["/a"]));

    let mut h = h.restart();
    h.fs.remove("/a");
    let result = h.open(startup());

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::NotFound);
    assert!(result.warnings[0].target.contains("/a"));
    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.content(result.windows[0].id), OpenedContent::Empty);
}

#[test]
fn test_backup_windows_restore_without_taking_focus() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    h.open(prefer_new(&["/a"]));
    h.open(prefer_new(&["/b"]));
    let slot = BackupSlot("empty-unsaved".to_string());
    h.backups.empty_windows.push(slot.clone());

    let mut h = h.restart();
    // The previously active folder is gone, so nothing matches it
    h.fs.remove("/b");
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 2);
    let a = only_window_on(&h, "/a");
    let empty = h
        .window_ids()
        .into_iter()
        .find(|id| *id != a)
        .expect("backup window should be open");
    assert_eq!(h.content(empty), OpenedContent::Empty);
    assert_eq!(h.record(empty).backup_slot, Some(slot));
    assert_eq!(result.focused, Some(a));
}

#[test]
fn test_folder_backups_reopen_with_policy_folders() {
    let config = Config {
        restore_windows: RestoreWindows::Folders,
        ..Config::default()
    };
    let backups = InMemoryBackups {
        folders: vec![uri("/dirty")],
        empty_windows: vec![BackupSlot("empty-unsaved".to_string())],
        ..InMemoryBackups::default()
    };
    let mut h = Harness::build(
        FakeFs::with_dirs(&["/dirty"]),
        FakeWorkspaces::default(),
        backups,
        MemoryStateSlot::new(),
        config,
        StartupContext::default(),
    );

    let result = h.open(startup());

    // Empty-window backups only come back when restoring everything
    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.windows_on("/dirty").len(), 1);
}

#[test]
fn test_explicit_targets_at_startup_skip_restore() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    h.open(cli(&["/a"]));

    let mut h = h.restart();
    let result = h.open(OpenConfiguration {
        initial_startup: true,
        ..cli(&["/b"])
    });

    assert_eq!(result.windows.len(), 1);
    assert!(h.windows_on("/a").is_empty());
    assert_eq!(h.windows_on("/b").len(), 1);
}

#[test]
fn test_restored_workspace_reopens_when_config_exists() {
    let fs = FakeFs::with_dirs(&["/a", "/b"]);
    let mut h = Harness::new(fs.clone());
    let id = h.open(cli(&["/a", "/b"])).windows[0].id;
    let OpenedContent::Workspace(workspace) = h.content(id) else {
        panic!("folders should coalesce into a workspace");
    };
    let config_path = workspace
        .config_path
        .to_file_path()
        .expect("ad-hoc workspaces are local");
    fs.add_file(&config_path.to_string_lossy());

    let mut h = h.restart();
    let result = h.open(startup());

    assert_eq!(result.windows.len(), 1);
    match h.content(result.windows[0].id) {
        OpenedContent::Workspace(restored) => assert_eq!(restored.id, workspace.id),
        other => panic!("expected the workspace back, got {other:?}"),
    }
}
