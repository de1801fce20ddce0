use super::*;
use crate::model::Track;
use crate::player::PlayerEngine;
use crate::store::LibraryStore;

fn t(title: &str, artist: &str) -> Track {
    Track::new("u1", title, artist, format!("file:///{title}.mp3"), 120)
}

fn app_with(tracks: Vec<Track>) -> App {
    App::new(LibraryStore::with_contents(tracks, Vec::new()), PlayerEngine::new())
}

fn titles(app: &App) -> Vec<String> {
    app.visible_tracks().iter().map(|t| t.title.clone()).collect()
}

#[test]
fn fuzzy_match_simple() {
    let title = "Hello World";
    assert!(App::fuzzy_match_positions(title, "hw").is_some());
    assert!(App::fuzzy_match_positions(title, "ello").is_some());
    assert!(App::fuzzy_match_positions(title, "xyz").is_none());
    assert_eq!(App::fuzzy_match_positions(title, "HW"), Some(vec![0, 6]));
}

#[test]
fn filter_matches_artist_and_title_fuzzily() {
    let mut app = app_with(vec![t("Blackened", "Metallica"), t("Paranoid", "Black Sabbath")]);
    app.filter_query = "mtbk".into();
    assert_eq!(titles(&app), vec!["Blackened"]);

    app.filter_query = "   ".into();
    assert_eq!(titles(&app).len(), 2);
}

#[test]
fn favorites_view_hides_other_tracks() {
    let mut app = app_with(vec![t("Alpha", "A"), t("Beta", "B")]);
    app.next();
    assert!(app.toggle_favorite_selected().applied());

    app.toggle_view();
    assert_eq!(app.view, LibraryView::Favorites);
    assert_eq!(titles(&app), vec!["Beta"]);

    // Unfavoriting the last visible entry leaves an empty, clamped list.
    assert!(app.toggle_favorite_selected().applied());
    assert!(app.visible_tracks().is_empty());
    assert_eq!(app.selected, 0);
    assert!(!app.toggle_favorite_selected().applied());
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = app_with(vec![t("A", ""), t("B", ""), t("C", "")]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
}

#[test]
fn play_selected_queues_visible_list_from_cursor() {
    let mut app = app_with(vec![t("Alpha", ""), t("Beta", ""), t("Gamma", "")]);
    app.filter_query = "a".into();
    app.next();

    assert!(app.play_selected());
    assert_eq!(app.engine.queue().len(), 3);
    assert_eq!(app.engine.queue_index(), Some(1));
    assert_eq!(app.engine.current_track().unwrap().title, "Beta");
    assert!(app.engine.is_playing());
}

#[test]
fn play_on_empty_view_does_nothing() {
    let mut app = app_with(Vec::new());
    assert!(!app.play_all());
    assert!(app.engine.current_track().is_none());
    assert!(!app.engine.is_playing());
}

#[test]
fn plays_are_counted_once_per_load() {
    let mut app = app_with(vec![t("Alpha", ""), t("Beta", "")]);
    assert_eq!(app.count_play(), None);

    app.play_all();
    let first = app.count_play().unwrap();
    assert_eq!(app.count_play(), None);
    assert_eq!(app.library.track(&first).unwrap().play_count, 1);

    app.engine.next_track();
    let second = app.count_play().unwrap();
    assert_ne!(first, second);
    assert_eq!(app.library.track(&second).unwrap().play_count, 1);
}

#[test]
fn filter_editing_resets_and_clamps_cursor() {
    let mut app = app_with(vec![t("Alpha", ""), t("Beta", ""), t("Gamma", "")]);
    app.selected = 2;
    app.enter_filter_mode();
    app.push_filter_char('b');
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_track().unwrap().title, "Beta");
    app.pop_filter_char();
    app.clear_filter();
    assert!(!app.filter_mode);
    assert!(app.filter_query.is_empty());
}
