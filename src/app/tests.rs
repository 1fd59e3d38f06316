use super::*;
use crate::controller::{ControlError, ControlResult};
use std::path::PathBuf;

fn app() -> App {
    App::new(vec![PathBuf::from("/music/rock"), PathBuf::from("/music/jazz")])
}

#[test]
fn starts_in_folder_picker() {
    let app = app();
    assert_eq!(app.mode, Mode::FolderPicker);
    assert_eq!(
        app.picker_entries(),
        vec![
            "/music/rock".to_string(),
            "/music/jazz".to_string(),
            ALL_FOLDERS.to_string()
        ]
    );
}

#[test]
fn picker_cursor_wraps_over_all_entries() {
    let mut app = app();
    app.picker_prev();
    assert_eq!(app.picker_selected, 2);
    app.picker_next();
    assert_eq!(app.picker_selected, 0);
    app.picker_next();
    assert_eq!(app.picker_selected, 1);
}

#[test]
fn picker_choice_is_one_folder_or_all() {
    let mut app = app();
    app.picker_selected = 1;
    let (folders, label) = app.picker_choice();
    assert_eq!(folders, vec![PathBuf::from("/music/jazz")]);
    assert_eq!(label, "/music/jazz");

    app.picker_selected = 2;
    let (folders, label) = app.picker_choice();
    assert_eq!(folders.len(), 2);
    assert_eq!(label, ALL_FOLDERS);
}

#[test]
fn search_mode_resets_state_on_enter_and_exit() {
    let mut app = app();
    app.enter_player("x".into());
    app.enter_search();
    assert_eq!(app.mode, Mode::Search);
    app.push_search_char('a');
    app.push_search_char('b');
    app.pop_search_char();
    assert_eq!(app.search_query, "a");

    app.set_search_results(vec![("a.mp3".into(), 0), ("ba.mp3".into(), 3)]);
    app.search_next();
    assert_eq!(app.selected_search_index(), Some(3));
    app.search_next();
    assert_eq!(app.selected_search_index(), Some(0));
    app.search_prev();
    assert_eq!(app.selected_search_index(), Some(3));

    app.exit_search();
    assert_eq!(app.mode, Mode::Player);
    assert!(app.search_query.is_empty());
    assert_eq!(app.selected_search_index(), None);
}

#[test]
fn shrinking_results_resets_cursor() {
    let mut app = app();
    app.set_search_results(vec![("a".into(), 0), ("b".into(), 1), ("c".into(), 2)]);
    app.search_selected = 2;
    app.set_search_results(vec![("a".into(), 0)]);
    assert_eq!(app.search_selected, 0);
}

#[test]
fn report_shows_errors_and_clears_on_success() {
    let mut app = app();
    let err: ControlResult<usize> = Err(ControlError::NothingLoaded);
    app.report(&err);
    assert_eq!(app.message.as_deref(), Some("no song is loaded"));

    app.report(&Ok::<_, ControlError>(1));
    assert!(app.message.is_none());
}

#[test]
fn view_toggles_flip() {
    let mut app = app();
    assert!(!app.show_details);
    app.toggle_details();
    app.toggle_progress_bar();
    assert!(app.show_details);
    assert!(app.show_progress_bar);
}
