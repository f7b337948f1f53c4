//! Integration tests for the open pipeline: matching, reuse, coalescing,
//! file routing and failure reporting.

mod common;

use common::{FakeFs, FakeWorkspaces, Harness, cli, uri};
use par_windows::backups::InMemoryBackups;
use par_windows::host::HostEvent;
use par_windows::recents::RecentEntry;
use par_windows::session::MemoryStateSlot;
use par_windows::window::{OpenedContent, WindowInstruction};
use par_windows::{OpenConfiguration, StartupContext, WarningKind, WindowId};
use par_windows_config::{Config, WindowReusePolicy};

fn sent_to(events: &[HostEvent], window: WindowId) -> Vec<&WindowInstruction> {
    events
        .iter()
        .filter_map(|e| match e {
            HostEvent::Sent {
                window: w,
                instruction,
            } if *w == window => Some(instruction),
            _ => None,
        })
        .collect()
}

fn prefer_new(config: OpenConfiguration) -> OpenConfiguration {
    OpenConfiguration {
        prefer_new_window: true,
        ..config
    }
}

#[test]
fn test_opens_folder_in_new_window() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    let result = h.open(cli(&["/a"]));

    assert_eq!(result.windows.len(), 1);
    assert!(result.windows[0].created);
    let id = result.windows[0].id;
    assert_eq!(result.focused, Some(id));
    assert!(result.warnings.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(h.content(id), OpenedContent::Folder(uri("/a")));
    assert_eq!(
        h.recents.lock().entries(),
        &[RecentEntry::folder(uri("/a"), None)]
    );
}

#[test]
fn test_reopening_open_folder_focuses_existing_window() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    let first = h.open(cli(&["/a"])).windows[0].id;
    h.take_events();

    let result = h.open(prefer_new(cli(&["/a"])));

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, first);
    assert!(!result.windows[0].created);
    assert_eq!(h.window_ids(), vec![first]);
    let events = h.take_events();
    assert_eq!(Harness::created_count(&events), 0);
    assert!(events.contains(&HostEvent::Focused(first)));
}

#[test]
fn test_folder_reuses_last_active_window_by_default() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let first = h.open(cli(&["/a"])).windows[0].id;
    h.take_events();

    let result = h.open(cli(&["/b"]));

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, first);
    assert!(!result.windows[0].created);
    assert_eq!(h.content(first), OpenedContent::Folder(uri("/b")));
    let events = h.take_events();
    assert!(matches!(
        sent_to(&events, first).as_slice(),
        [WindowInstruction::Load(payload)] if payload.content == OpenedContent::Folder(uri("/b"))
    ));
}

#[test]
fn test_prefer_new_window_opens_separate_window() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    h.open(cli(&["/a"]));
    let result = h.open(prefer_new(cli(&["/b"])));

    assert!(result.windows[0].created);
    assert_eq!(h.window_ids().len(), 2);
    assert_eq!(h.windows_on("/a").len(), 1);
    assert_eq!(h.windows_on("/b").len(), 1);
}

#[test]
fn test_folder_setting_on_forces_new_window() {
    let config = Config {
        open_folders_in_new_window: WindowReusePolicy::On,
        ..Config::default()
    };
    let mut h = Harness::with_config(FakeFs::with_dirs(&["/a", "/b"]), config);
    h.open(cli(&["/a"]));
    h.open(cli(&["/b"]));
    assert_eq!(h.window_ids().len(), 2);
}

#[test]
fn test_multiple_folders_coalesce_into_one_workspace() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let result = h.open(cli(&["/a", "/b"]));

    assert_eq!(result.windows.len(), 1);
    let id = result.windows[0].id;
    match h.content(id) {
        OpenedContent::Workspace(workspace) => {
            assert_eq!(workspace.folders, vec![uri("/a"), uri("/b")]);
        }
        other => panic!("expected a workspace window, got {other:?}"),
    }
    assert_eq!(h.workspaces.created(), 1);

    // Same folder set, same workspace, same window
    let again = h.open(prefer_new(cli(&["/a", "/b"])));
    assert_eq!(again.windows[0].id, id);
    assert!(!again.windows[0].created);
    assert_eq!(h.window_ids().len(), 1);
}

#[test]
fn test_failed_coalescing_opens_folders_separately() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    h.workspaces.fail_ad_hoc();

    let result = h.open(cli(&["/a", "/b"]));

    assert_eq!(result.windows.len(), 2);
    assert!(result.windows.iter().all(|w| w.created));
    assert_eq!(h.windows_on("/a").len(), 1);
    assert_eq!(h.windows_on("/b").len(), 1);
    assert_eq!(result.focused, Some(result.windows[1].id));
}

#[test]
fn test_duplicate_targets_open_once() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    let result = h.open(cli(&["/a", "/a/"]));
    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.window_ids().len(), 1);
    assert_eq!(h.workspaces.created(), 0);
}

#[test]
fn test_add_mode_merges_folders_into_active_window() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    let first = h.open(cli(&["/a"])).windows[0].id;
    h.take_events();

    let result = h.open(OpenConfiguration {
        add_mode: true,
        ..cli(&["/b"])
    });

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, first);
    assert!(!result.windows[0].created);
    let events = h.take_events();
    assert_eq!(Harness::created_count(&events), 0);
    assert_eq!(
        sent_to(&events, first),
        vec![&WindowInstruction::AddFolders(vec![uri("/b")])]
    );
}

#[test]
fn test_add_mode_without_window_warns_and_opens() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/b"]));
    let result = h.open(OpenConfiguration {
        add_mode: true,
        ..cli(&["/b"])
    });

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::AddModeUnavailable);
    assert_eq!(result.windows.len(), 1);
    assert_eq!(h.windows_on("/b").len(), 1);
}

#[test]
fn test_file_goes_to_window_containing_it() {
    let fs = FakeFs::with_dirs(&["/proj", "/other"]);
    fs.add_file("/proj/src/main.rs");
    let mut h = Harness::new(fs);
    let proj = h.open(prefer_new(cli(&["/proj"]))).windows[0].id;
    let other = h.open(prefer_new(cli(&["/other"]))).windows[0].id;
    assert_ne!(proj, other);
    h.take_events();

    let result = h.open(cli(&["/proj/src/main.rs"]));

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, proj);
    assert_eq!(result.focused, Some(proj));
    let events = h.take_events();
    match sent_to(&events, proj).as_slice() {
        [WindowInstruction::OpenFiles(batch)] => {
            assert_eq!(batch.files.len(), 1);
            assert_eq!(batch.files[0].uri, uri("/proj/src/main.rs"));
        }
        other => panic!("unexpected instructions {other:?}"),
    }
    assert!(sent_to(&events, other).is_empty());
}

#[test]
fn test_closest_workspace_root_wins() {
    let fs = FakeFs::with_dirs(&["/repo", "/repo/crates/core"]);
    fs.add_file("/repo/crates/core/lib.rs");
    let mut h = Harness::new(fs);
    let outer = h.open(prefer_new(cli(&["/repo"]))).windows[0].id;
    let inner = h.open(prefer_new(cli(&["/repo/crates/core"]))).windows[0].id;
    // Make the outer window the most recently focused one
    h.orchestrator.notify_window_focused(outer);

    let result = h.open(cli(&["/repo/crates/core/lib.rs"]));
    assert_eq!(result.windows[0].id, inner);
}

#[test]
fn test_file_with_line_and_column() {
    let fs = FakeFs::default();
    fs.add_file("/proj/src/main.rs");
    let mut h = Harness::new(fs);

    let result = h.open(OpenConfiguration {
        goto_line_mode: true,
        ..cli(&["/proj/src/main.rs:12:4"])
    });

    assert_eq!(result.windows.len(), 1);
    let events = h.take_events();
    match &events[0] {
        HostEvent::Created { payload, .. } => {
            assert_eq!(payload.content, OpenedContent::Empty);
            let batch = payload.files.as_ref().expect("files travel with the window");
            assert_eq!(batch.files[0].uri, uri("/proj/src/main.rs"));
            assert_eq!(batch.files[0].line, Some(12));
            assert_eq!(batch.files[0].column, Some(4));
        }
        other => panic!("expected a created window, got {other:?}"),
    }
}

#[test]
fn test_diff_mode_pairs_two_files() {
    let fs = FakeFs::default();
    fs.add_file("/x.txt");
    fs.add_file("/y.txt");
    let mut h = Harness::new(fs);

    h.open(OpenConfiguration {
        diff_mode: true,
        ..cli(&["/x.txt", "/y.txt"])
    });

    let events = h.take_events();
    match &events[0] {
        HostEvent::Created { payload, .. } => {
            let batch = payload.files.as_ref().expect("diff travels with the window");
            assert!(batch.files.is_empty());
            let (left, right) = batch.diff.as_ref().expect("two files form a diff");
            assert_eq!(left.uri, uri("/x.txt"));
            assert_eq!(right.uri, uri("/y.txt"));
        }
        other => panic!("expected a created window, got {other:?}"),
    }
    // Files compared in a diff are not recent entries
    assert!(h.recents.lock().entries().is_empty());
}

#[test]
fn test_files_reuse_last_active_window_when_setting_off() {
    let fs = FakeFs::with_dirs(&["/a"]);
    fs.add_file("/notes.txt");
    let mut h = Harness::new(fs);
    let first = h.open(cli(&["/a"])).windows[0].id;
    h.take_events();

    let result = h.open(cli(&["/notes.txt"]));

    assert_eq!(result.windows[0].id, first);
    let events = h.take_events();
    assert_eq!(Harness::created_count(&events), 0);
    assert!(matches!(
        sent_to(&events, first).as_slice(),
        [WindowInstruction::OpenFiles(_)]
    ));
    assert_eq!(
        h.recents.lock().entries()[0],
        RecentEntry::file(uri("/notes.txt"), None)
    );
}

#[test]
fn test_files_open_new_window_when_setting_on() {
    let fs = FakeFs::with_dirs(&["/a"]);
    fs.add_file("/notes.txt");
    let config = Config {
        open_files_in_new_window: WindowReusePolicy::On,
        ..Config::default()
    };
    let mut h = Harness::with_config(fs, config);
    h.open(cli(&["/a"]));

    let result = h.open(cli(&["/notes.txt"]));

    assert!(result.windows[0].created);
    assert_eq!(h.window_ids().len(), 2);
}

#[test]
fn test_remote_windows_never_take_local_files() {
    let fs = FakeFs::default();
    fs.add_file("/notes.txt");
    let mut h = Harness::new(fs);

    let remote = h.open(cli(&["/srv/app"]).with_remote_authority("box"));
    let remote_id = remote.windows[0].id;
    assert_eq!(
        h.record(remote_id).remote_authority.as_deref(),
        Some("box")
    );
    assert_eq!(
        h.content(remote_id),
        OpenedContent::Folder(par_windows::ResourceUri::remote("box", "/srv/app").unwrap())
    );

    let local = h.open(cli(&["/notes.txt"]));
    assert!(local.windows[0].created);
    assert_ne!(local.windows[0].id, remote_id);
    assert_eq!(h.record(local.windows[0].id).remote_authority, None);
}

#[test]
fn test_workspace_file_opens_workspace_and_receives_its_files() {
    let fs = FakeFs::with_dirs(&["/ws/src", "/other"]);
    fs.add_file("/ws/app.code-workspace");
    fs.add_file("/ws/src/lib.rs");
    let workspaces = FakeWorkspaces::default();
    workspaces.add_config("/ws/app.code-workspace", &["/ws/src"]);
    let mut h = Harness::build(
        fs,
        workspaces,
        InMemoryBackups::default(),
        MemoryStateSlot::new(),
        Config::default(),
        StartupContext::default(),
    );

    let ws = h.open(cli(&["/ws/app.code-workspace"])).windows[0].id;
    assert!(matches!(h.content(ws), OpenedContent::Workspace(_)));
    h.open(prefer_new(cli(&["/other"])));

    let result = h.open(cli(&["/ws/src/lib.rs"]));
    assert_eq!(result.windows[0].id, ws);
}

#[test]
fn test_creation_failure_is_reported_and_rest_opens() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/b"]));
    h.workspaces.fail_ad_hoc();
    h.orchestrator.host_mut().limit_creations(1);

    let result = h.open(cli(&["/a", "/b"]));

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].target.contains("/b"));
    assert_eq!(h.window_ids().len(), 1);
    assert_eq!(result.focused, Some(result.windows[0].id));
}

#[test]
fn test_missing_paths_are_dropped_with_warning() {
    let mut h = Harness::new(FakeFs::default());
    let result = h.open(cli(&["/missing"]));

    assert!(result.windows.is_empty());
    assert_eq!(result.focused, None);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::NotFound);
    assert_eq!(Harness::created_count(&h.take_events()), 0);
}

#[test]
fn test_no_arguments_focuses_existing_window_when_setting_off() {
    let config = Config {
        open_without_arguments_in_new_window: false,
        ..Config::default()
    };
    let mut h = Harness::with_config(FakeFs::with_dirs(&["/a"]), config);
    let first = h.open(cli(&["/a"])).windows[0].id;
    h.take_events();

    let result = h.open(cli(&[]));
    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, first);
    assert!(!result.windows[0].created);
    assert_eq!(Harness::created_count(&h.take_events()), 0);

    // An explicit empty window is opened regardless
    let forced = h.open(OpenConfiguration {
        force_empty: true,
        ..cli(&[])
    });
    assert!(forced.windows[0].created);
    assert_eq!(h.content(forced.windows[0].id), OpenedContent::Empty);
}

#[test]
fn test_forced_empty_window_opens_alongside_targets() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/repo", "/other"]));

    let result = h.open(OpenConfiguration {
        force_empty: true,
        ..cli(&["/repo"])
    });

    assert_eq!(result.windows.len(), 2);
    assert!(result.windows.iter().all(|w| w.created));
    let contents: Vec<OpenedContent> = result.windows.iter().map(|w| h.content(w.id)).collect();
    assert!(contents.contains(&OpenedContent::Folder(uri("/repo"))));
    assert!(contents.contains(&OpenedContent::Empty));

    // Also when the folder reuses an existing window
    h.take_events();
    let result = h.open(OpenConfiguration {
        force_empty: true,
        ..cli(&["/other"])
    });
    assert_eq!(result.windows.len(), 2);
    assert_eq!(Harness::created_count(&h.take_events()), 1);
    assert_eq!(h.window_ids().len(), 3);
}

#[test]
fn test_no_arguments_opens_empty_window_by_default() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a"]));
    h.open(cli(&["/a"]));

    let result = h.open(cli(&[]));
    assert!(result.windows[0].created);
    assert_eq!(h.content(result.windows[0].id), OpenedContent::Empty);
    assert!(h.record(result.windows[0].id).backup_slot.is_some());
}
