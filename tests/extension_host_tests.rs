//! Integration tests for extension development host windows.

mod common;

use common::{FakeFs, Harness, cli, uri};
use par_windows::host::HostEvent;
use par_windows::window::{OpenedContent, WindowInstruction};
use par_windows::{OpenConfiguration, OpenContext, StartupContext};

fn dev_host(extension: &str, paths: &[&str]) -> OpenConfiguration {
    OpenConfiguration {
        extension_development_paths: vec![extension.to_string()],
        ..cli(paths)
    }
}

#[test]
fn test_development_host_gets_its_own_window() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/a", "/proj"]));
    let regular = h.open(cli(&["/a"])).windows[0].id;

    let result = h.open(dev_host("/ext", &["/proj"]));

    assert_eq!(result.windows.len(), 1);
    assert!(result.windows[0].created);
    let host = result.windows[0].id;
    assert_ne!(host, regular);
    let record = h.record(host);
    assert!(record.is_extension_development_host());
    assert_eq!(record.extension_development_paths, vec![uri("/ext")]);
    assert_eq!(record.content, OpenedContent::Folder(uri("/proj")));
    // The regular window kept its folder
    assert_eq!(h.content(regular), OpenedContent::Folder(uri("/a")));
    // Development hosts stay out of the recents list
    assert_eq!(h.recents.lock().entries().len(), 1);
}

#[test]
fn test_same_extension_paths_reload_existing_host() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/proj", "/proj2"]));
    let host = h.open(dev_host("/ext", &["/proj"])).windows[0].id;
    h.take_events();

    let result = h.open(dev_host("/ext/", &["/proj2"]));

    assert_eq!(result.windows.len(), 1);
    assert_eq!(result.windows[0].id, host);
    assert!(!result.windows[0].created);
    assert_eq!(h.window_ids(), vec![host]);
    assert_eq!(h.content(host), OpenedContent::Folder(uri("/proj2")));
    let events = h.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        HostEvent::Sent { window, instruction: WindowInstruction::Load(payload) }
            if *window == host && payload.extension_development_paths == vec![uri("/ext")]
    )));
}

#[test]
fn test_regular_requests_never_use_development_host() {
    let fs = FakeFs::with_dirs(&["/proj", "/other"]);
    fs.add_file("/proj/main.rs");
    let mut h = Harness::new(fs);
    let host = h.open(dev_host("/ext", &["/proj"])).windows[0].id;

    // A folder does not replace the host's content
    let folder = h.open(cli(&["/other"]));
    assert!(folder.windows[0].created);
    assert_ne!(folder.windows[0].id, host);
    assert_eq!(h.content(host), OpenedContent::Folder(uri("/proj")));

    // A file from the command line is not routed into the host either
    let file = h.open(cli(&["/proj/main.rs"]));
    assert_ne!(file.windows[0].id, host);
}

#[test]
fn test_in_app_file_can_go_to_development_host() {
    let fs = FakeFs::with_dirs(&["/proj"]);
    fs.add_file("/proj/main.rs");
    let mut h = Harness::new(fs);
    let host = h.open(dev_host("/ext", &["/proj"])).windows[0].id;

    let result = h.open(
        OpenConfiguration::new(OpenContext::Dialog)
            .with_cli_paths(["/proj/main.rs"])
            .with_cwd("/"),
    );

    assert_eq!(result.windows[0].id, host);
}

#[test]
fn test_development_host_is_remembered_across_restarts() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/proj"]));
    h.open(dev_host("/ext", &["/proj"]));

    let h = h.restart();
    let saved = h.saved_state();
    assert!(saved.last_active_window.is_none());
    assert_eq!(
        saved
            .last_extension_development_host_window
            .and_then(|s| s.folder_uri),
        Some(uri("/proj"))
    );

    // A new host without targets reopens what the last one showed
    let mut h = h.relaunch(StartupContext::default());
    let result = h.open(dev_host("/ext", &[]));
    assert_eq!(result.windows.len(), 1);
    assert_eq!(
        h.content(result.windows[0].id),
        OpenedContent::Folder(uri("/proj"))
    );
}

#[test]
fn test_test_mode_hosts_are_not_remembered() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/proj"]));
    h.open(OpenConfiguration {
        extension_test_mode: true,
        ..dev_host("/ext", &["/proj"])
    });

    let h = h.restart();
    assert!(h.saved_state().last_extension_development_host_window.is_none());
}

#[test]
fn test_development_hosts_with_different_extensions_share_a_folder() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/proj", "/other"]));
    let first = h.open(dev_host("/ext1", &["/proj"])).windows[0].id;
    let second = h.open(dev_host("/ext2", &["/proj"]));

    assert!(second.windows[0].created);
    let second = second.windows[0].id;
    assert_ne!(first, second);
    assert_eq!(h.window_ids(), vec![first, second]);
    assert_eq!(h.content(first), OpenedContent::Folder(uri("/proj")));
    assert_eq!(h.content(second), OpenedContent::Folder(uri("/proj")));
}

#[test]
fn test_reloading_development_host_onto_folder_of_another_host() {
    let mut h = Harness::new(FakeFs::with_dirs(&["/proj", "/other"]));
    let first = h.open(dev_host("/ext1", &["/proj"])).windows[0].id;
    let second = h.open(dev_host("/ext2", &["/other"])).windows[0].id;

    let result = h.open(dev_host("/ext2", &["/proj"]));

    assert_eq!(result.windows[0].id, second);
    assert!(!result.windows[0].created);
    assert_eq!(h.window_ids(), vec![first, second]);
    assert_eq!(h.content(first), OpenedContent::Folder(uri("/proj")));
    assert_eq!(h.content(second), OpenedContent::Folder(uri("/proj")));
}
