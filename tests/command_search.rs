//! End-to-end behavior of the command search mode against an in-memory host.

use std::rc::Rc;

use command_search::host::memory::{HostEvent, MemoryHost};
use command_search::host::{AppMenu, Host, KeyBinding, Platform};
use command_search::matcher::SubstringMatcher;
use command_search::ui::line_text;
use command_search::{activate, CommandSearch, HostError, MatchResult, PaletteConfig, SearchMode};
use tokio::task::LocalSet;

fn editor_host() -> Rc<MemoryHost> {
    editor_host_on(Platform::Win)
}

fn editor_host_on(platform: Platform) -> Rc<MemoryHost> {
    let host = MemoryHost::new();
    host.set_platform(platform);
    host.add_command("file.save", Some("Save"));
    host.bind_key("file.save", KeyBinding::new("Ctrl-S"));
    host.add_command("file.saveAs", Some("Save As"));
    host.add_to_menu(AppMenu::File, "file.saveAs");
    host.add_command("file.close", Some("Close"));
    host.add_to_menu(AppMenu::File, "file.close");
    host.add_editor("main");
    host.add_editor("inline");
    host.focus("inline");
    Rc::new(host)
}

fn names(results: &[MatchResult]) -> Vec<&str> {
    results.iter().map(|r| r.name.as_str()).collect()
}

/// Search without the mode's own command in the way.
fn file_search(host: &Rc<MemoryHost>) -> CommandSearch<MemoryHost> {
    CommandSearch::new(Rc::clone(host), PaletteConfig::default())
}

#[test]
fn test_trigger_gate() {
    let search = file_search(&editor_host());
    assert!(search.matches("?"));
    assert!(search.matches("?foo"));
    assert!(!search.matches("foo"));
    assert!(!search.matches(""));
}

#[test]
fn test_empty_query_browses_sorted_catalog() {
    let search = file_search(&editor_host());
    assert_eq!(names(&search.search("?")), vec!["Close", "Save", "Save As"]);
}

#[test]
fn test_filter_excludes_non_matches() {
    let search = file_search(&editor_host());
    let results = search.search("?sav");
    let mut got = names(&results);
    got.sort();
    assert_eq!(got, vec!["Save", "Save As"]);
}

#[test]
fn test_substring_variant_sorts_alphabetically() {
    let search = file_search(&editor_host()).with_matcher(Box::new(SubstringMatcher));
    assert_eq!(names(&search.search("?save")), vec!["Save", "Save As"]);
    assert!(search.search("?xyz").is_empty());
}

#[test]
fn test_catalog_is_built_once_across_searches() {
    let host = editor_host();
    let search = file_search(&host);
    search.search("?");
    search.search("?s");
    search.done();
    search.search("?sa");
    assert_eq!(host.list_calls(), 1);

    host.add_command("file.open", Some("Open"));
    host.add_to_menu(AppMenu::File, "file.open");
    assert_eq!(search.search("?").len(), 3);

    search.invalidate_catalog();
    assert_eq!(search.search("?").len(), 4);
    assert_eq!(host.list_calls(), 2);
}

#[test]
fn test_activate_registers_command_menu_and_mode() {
    let host = editor_host();
    let config = PaletteConfig::default();
    let _search = activate(Rc::clone(&host), config.clone()).unwrap();

    assert_eq!(host.command_name(&config.command_id).as_deref(), Some("Search Commands"));
    assert_eq!(host.menu_items(AppMenu::Help).first(), Some(&config.command_id));
    assert_eq!(host.keybindings_for(&config.command_id), config.bindings[..1].to_vec());
    assert!(host.mode_for("?sav").is_some());
    assert!(host.mode_for("sav").is_none());
}

#[test]
fn test_activate_fails_without_target_menu() {
    let host = editor_host();
    host.remove_menu(AppMenu::Help);
    let err = activate(host, PaletteConfig::default()).err();
    assert_eq!(err, Some(HostError::MenuNotFound(AppMenu::Help)));
}

#[test]
fn test_dropping_handle_deactivates_mode() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    drop(search);

    assert!(host.mode_for("?").is_none());
    // The registered command outlives the mode and does nothing.
    host.take_events();
    host.execute("command_search.open").unwrap();
    assert_eq!(host.take_events(), vec![HostEvent::Executed("command_search.open".to_string())]);
}

#[test]
fn test_open_command_captures_focus_and_begins_search() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();

    host.execute("command_search.open").unwrap();

    assert!(search.has_pending_focus());
    assert_eq!(
        host.take_events(),
        vec![
            HostEvent::Executed("command_search.open".to_string()),
            HostEvent::SearchBegun("?".to_string()),
        ]
    );
}

#[test]
fn test_formatter_shows_primary_shortcut() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    let results = search.search("?search");
    assert_eq!(results[0].id, "command_search.open");

    let row = line_text(&search.format_result(&results[0], "?search", 30));
    assert_eq!(row, "Search Commands     Ctrl-Alt-?");
}

#[test]
fn test_formatter_shows_mac_shortcut_on_mac() {
    let host = editor_host_on(Platform::Mac);
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    let results = search.search("?search");

    let row = line_text(&search.format_result(&results[0], "?search", 30));
    assert_eq!(row, "Search Commands     Ctrl-Cmd-?");
}

#[test]
fn test_mac_only_command_hidden_on_windows() {
    let host = editor_host();
    host.add_command("mac.only", Some("Show Emoji"));
    host.bind_key("mac.only", KeyBinding::new("Cmd-Ctrl-Space").on(Platform::Mac));
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();

    let catalog = search.ensure_catalog();
    assert!(!catalog.contains("mac.only"));
    assert!(catalog.contains("command_search.open"));
}

#[tokio::test]
async fn test_selection_refocuses_then_executes() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    host.execute("command_search.open").unwrap();
    // The search box steals focus from the inline editor.
    host.focus("main");
    host.take_events();

    let item = search.search("?close").remove(0);
    LocalSet::new()
        .run_until(async {
            let selection = search.item_select(&item);
            assert!(host.events().is_empty());
            selection.await.unwrap().unwrap();
        })
        .await;

    assert_eq!(
        host.take_events(),
        vec![
            HostEvent::Settled,
            HostEvent::Focused("inline".to_string()),
            HostEvent::Settled,
            HostEvent::Executed("file.close".to_string()),
        ]
    );
    assert_eq!(host.focused_editor().as_deref(), Some("inline"));
    assert!(!search.has_pending_focus());
}

#[tokio::test]
async fn test_focus_target_is_one_shot() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    host.execute("command_search.open").unwrap();

    LocalSet::new()
        .run_until(async {
            search.select("file.save").await.unwrap().unwrap();
            host.focus("main");
            host.take_events();
            search.select("file.close").await.unwrap().unwrap();
        })
        .await;

    let events = host.take_events();
    assert!(!events.iter().any(|e| matches!(e, HostEvent::Focused(_))));
    assert_eq!(events.last(), Some(&HostEvent::Executed("file.close".to_string())));
    assert_eq!(host.focused_editor().as_deref(), Some("main"));
}

#[tokio::test]
async fn test_missing_command_surfaces_not_found() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    host.execute("command_search.open").unwrap();

    let result = LocalSet::new()
        .run_until(async { search.select("file.removed").await.unwrap() })
        .await;

    assert_eq!(result, Err(HostError::CommandNotFound("file.removed".to_string())));
    // Focus was still restored before the attempt.
    assert_eq!(host.focused_editor().as_deref(), Some("inline"));
}

#[tokio::test]
async fn test_host_failure_is_not_swallowed() {
    let host = editor_host();
    host.fail_command("file.save", "read-only document");
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();

    let result = LocalSet::new()
        .run_until(async { search.select("file.save").await.unwrap() })
        .await;

    assert_eq!(
        result,
        Err(HostError::ExecutionFailed {
            id: "file.save".to_string(),
            reason: "read-only document".to_string(),
        })
    );
}

#[test]
fn test_dismissed_search_leaves_target_for_next_open() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    host.execute("command_search.open").unwrap();
    search.done();
    assert!(search.has_pending_focus());

    host.focus("main");
    host.execute("command_search.open").unwrap();
    assert!(search.has_pending_focus());
}

#[test]
#[should_panic]
fn test_select_outside_local_set_panics() {
    let host = editor_host();
    let search = activate(Rc::clone(&host), PaletteConfig::default()).unwrap();
    let _selection = search.select("file.save");
}
