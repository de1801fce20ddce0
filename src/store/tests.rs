use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::model::{Playlist, Project, ProjectKind, ProjectPatch, ProjectStatus, Track, TrackPatch, User};
use crate::session::SessionFile;

fn track(title: &str) -> Track {
    Track::new("u1", title, "Artist", format!("/music/{title}.mp3"), 90)
}

fn library(titles: &[&str]) -> LibraryStore {
    LibraryStore::with_contents(titles.iter().map(|t| track(t)).collect(), Vec::new())
}

fn ids(store: &LibraryStore) -> Vec<String> {
    store.tracks().iter().map(|t| t.id.clone()).collect()
}

#[test]
fn toggle_favorite_flips_and_flips_back() {
    let mut store = library(&["a", "b", "c"]);
    let order = ids(&store);
    let id = order[1].clone();

    assert_eq!(store.toggle_favorite(&id), Outcome::Applied);
    assert!(store.track(&id).unwrap().is_favorite);
    assert_eq!(store.favorites().len(), 1);
    assert_eq!(store.favorites()[0].id, id);
    assert_eq!(ids(&store), order);

    assert_eq!(store.toggle_favorite(&id), Outcome::Applied);
    assert!(!store.track(&id).unwrap().is_favorite);
    assert!(store.favorites().is_empty());
    assert_eq!(ids(&store), order);
}

#[test]
fn toggle_favorite_on_absent_id_changes_nothing() {
    let mut store = library(&["a", "b"]);
    let before = store.state().clone();
    let calls = Rc::new(RefCell::new(0));
    let seen = calls.clone();
    let _sub = store.subscribe(move |_| *seen.borrow_mut() += 1);

    assert_eq!(store.toggle_favorite("missing"), Outcome::Absent);
    assert_eq!(store.state(), &before);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn favorites_keep_toggle_order_and_reflect_current_data() {
    let mut store = library(&["a", "b", "c"]);
    let order = ids(&store);
    let _ = store.toggle_favorite(&order[2]);
    let _ = store.toggle_favorite(&order[0]);
    let favs: Vec<&str> = store.favorites().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(favs, vec![order[2].as_str(), order[0].as_str()]);

    let _ = store.record_play(&order[2]);
    assert_eq!(store.favorites()[0].play_count, 1);
}

#[test]
fn set_tracks_rebuilds_favorites_from_flags() {
    let mut store = LibraryStore::new();
    let mut fav = track("fav");
    fav.is_favorite = true;
    let fav_id = fav.id.clone();
    store.set_tracks(vec![track("plain"), fav]);
    assert_eq!(store.state().favorite_ids, vec![fav_id]);
}

#[test]
fn add_track_inserts_at_front() {
    let mut store = library(&["a"]);
    let new = track("b");
    let new_id = new.id.clone();
    store.add_track(new);
    assert_eq!(store.tracks()[0].id, new_id);
    assert_eq!(store.tracks().len(), 2);
}

#[test]
fn update_track_merges_and_syncs_favorites() {
    let mut store = library(&["a"]);
    let id = store.tracks()[0].id.clone();
    let created = store.tracks()[0].created_at;

    assert_eq!(store.update_track(&id, &TrackPatch::favorite(true)), Outcome::Applied);
    assert_eq!(store.favorites().len(), 1);
    assert_eq!(store.update_track(&id, &TrackPatch::play_count(4)), Outcome::Applied);
    let t = store.track(&id).unwrap();
    assert!(t.is_favorite);
    assert_eq!(t.play_count, 4);
    assert_eq!(t.created_at, created);

    assert_eq!(store.update_track(&id, &TrackPatch::favorite(false)), Outcome::Applied);
    assert!(store.favorites().is_empty());
    assert_eq!(store.update_track("nope", &TrackPatch::favorite(true)), Outcome::Absent);
}

#[test]
fn remove_track_drops_favorite_too() {
    let mut store = library(&["a", "b"]);
    let id = store.tracks()[0].id.clone();
    let _ = store.toggle_favorite(&id);
    assert_eq!(store.remove_track(&id), Outcome::Applied);
    assert!(store.favorites().is_empty());
    assert_eq!(store.tracks().len(), 1);
    assert_eq!(store.remove_track(&id), Outcome::Absent);
}

#[test]
fn search_matches_title_and_artist() {
    let mut store = LibraryStore::new();
    store.set_tracks(vec![
        Track::new("u1", "Night Drive", "Synthwave Kid", "/a.mp3", 1),
        Track::new("u1", "Morning", "The Drivers", "/b.mp3", 1),
        Track::new("u1", "Noon", "Nobody", "/c.mp3", 1),
    ]);
    let hits: Vec<&str> = store.search("DRIVE").iter().map(|t| t.title.as_str()).collect();
    assert_eq!(hits, vec!["Night Drive", "Morning"]);
    assert_eq!(store.search("").len(), 3);
}

#[test]
fn playlists_insert_at_front() {
    let mut store = LibraryStore::new();
    store.set_playlists(vec![Playlist::new("u1", "old")]);
    store.add_playlist(Playlist::new("u1", "new"));
    let names: Vec<&str> = store.playlists().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["new", "old"]);
}

#[test]
fn subscribers_are_notified_until_unsubscribed() {
    let mut store = LibraryStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = store.subscribe(move |state| sink.borrow_mut().push(state.tracks.len()));

    store.add_track(track("a"));
    store.add_track(track("b"));
    assert!(store.unsubscribe(sub));
    store.add_track(track("c"));
    assert!(!store.unsubscribe(sub));

    assert_eq!(*seen.borrow(), vec![1, 2]);
}

#[test]
fn project_update_merges_and_absent_is_noop() {
    let mut store = ProjectStore::new();
    let project = Project::new("u1", "song", ProjectKind::Separation);
    let id = project.id.clone();
    store.add_project(project);

    let patch = ProjectPatch {
        status: Some(ProjectStatus::Completed),
        output_files: Some([("vocals".to_string(), "/out/v.mp3".to_string())].into()),
        ..ProjectPatch::default()
    };
    assert_eq!(store.update_project(&id, &patch), Outcome::Applied);
    let p = store.project(&id).unwrap();
    assert_eq!(p.status, ProjectStatus::Completed);
    assert_eq!(p.output_files["vocals"], "/out/v.mp3");
    assert_eq!(p.name, "song");

    assert_eq!(store.update_project("missing", &patch), Outcome::Absent);
}

#[test]
fn project_current_selection_follows_deletes() {
    let mut store = ProjectStore::new();
    let a = Project::new("u1", "a", ProjectKind::Generation);
    let b = Project::new("u1", "b", ProjectKind::Generation);
    let (a_id, b_id) = (a.id.clone(), b.id.clone());
    store.set_projects(vec![a, b]);

    assert_eq!(store.set_current_project(Some("missing")), Outcome::Absent);
    assert!(store.current_project().is_none());

    assert_eq!(store.set_current_project(Some(&a_id)), Outcome::Applied);
    assert_eq!(store.current_project().unwrap().id, a_id);

    assert_eq!(store.delete_project(&b_id), Outcome::Applied);
    assert_eq!(store.current_project().unwrap().id, a_id);
    assert_eq!(store.delete_project(&a_id), Outcome::Applied);
    assert!(store.current_project().is_none());
    assert_eq!(store.delete_project(&a_id), Outcome::Absent);
}

#[test]
fn project_add_goes_to_front() {
    let mut store = ProjectStore::new();
    store.add_project(Project::new("u1", "first", ProjectKind::Separation));
    store.add_project(Project::new("u1", "second", ProjectKind::Separation));
    assert_eq!(store.projects()[0].name, "second");
}

#[test]
fn auth_store_persists_and_restores_user() {
    let dir = tempfile::tempdir().unwrap();
    let user = User::new("42", "a@b.c", "alice");

    let mut store = AuthStore::restore(SessionFile::in_dir(dir.path()));
    assert!(!store.is_authenticated());
    store.set_user(Some(user.clone()));
    assert!(store.is_authenticated());

    let restored = AuthStore::restore(SessionFile::in_dir(dir.path()));
    assert!(restored.is_authenticated());
    assert_eq!(restored.user(), Some(&user));
}

#[test]
fn auth_logout_clears_persisted_blob() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionFile::in_dir(dir.path());
    let mut store = AuthStore::restore(session.clone());
    store.set_user(Some(User::new("1", "x@y.z", "x")));
    store.logout();

    assert!(store.user().is_none());
    assert_eq!(session.get(crate::session::AUTH_STORAGE_KEY).unwrap(), None);
    assert!(!AuthStore::restore(session).is_authenticated());
}

#[test]
fn auth_restore_ignores_corrupt_session() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionFile::in_dir(dir.path());
    session
        .set(crate::session::AUTH_STORAGE_KEY, "garbage".into())
        .unwrap();
    let store = AuthStore::restore(session);
    assert!(!store.is_authenticated());
}

#[test]
fn auth_loading_flag_notifies() {
    let mut store = AuthStore::in_memory();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = store.subscribe(move |s| sink.borrow_mut().push(s.is_loading));
    store.set_loading(true);
    store.set_loading(false);
    assert_eq!(*seen.borrow(), vec![true, false]);
}
