use super::*;

fn track(title: &str, artist: &str) -> Track {
    Track::new("u1", title, artist, "/music/a.mp3", 180)
}

#[test]
fn track_matches_title_or_artist_case_insensitive() {
    let t = track("Summer Breeze", "DJ Mix");
    assert!(t.matches("breeze"));
    assert!(t.matches("dj"));
    assert!(t.matches("   "));
    assert!(!t.matches("winter"));
}

#[test]
fn track_display_skips_blank_artist() {
    assert_eq!(track("Song", "Artist").display(), "Artist - Song");
    assert_eq!(track("Song", "  ").display(), "Song");
}

#[test]
fn track_patch_only_touches_present_fields() {
    let mut t = track("Song", "Artist");
    let before = t.clone();

    TrackPatch::favorite(true).apply_to(&mut t);
    assert!(t.is_favorite);
    assert_eq!(t.play_count, 0);

    TrackPatch::play_count(7).apply_to(&mut t);
    assert!(t.is_favorite);
    assert_eq!(t.play_count, 7);

    assert_eq!(t.id, before.id);
    assert_eq!(t.created_at, before.created_at);
    assert!(TrackPatch::default().is_empty());
}

#[test]
fn project_patch_refreshes_updated_at_but_not_identity() {
    let mut p = Project::new("u1", "demo", ProjectKind::Separation);
    let id = p.id.clone();
    let created = p.created_at;
    std::thread::sleep(std::time::Duration::from_millis(2));

    ProjectPatch::status(ProjectStatus::Completed).apply_to(&mut p);

    assert_eq!(p.status, ProjectStatus::Completed);
    assert_eq!(p.id, id);
    assert_eq!(p.created_at, created);
    assert!(p.updated_at > created);
}

#[test]
fn project_failed_patch_sets_error() {
    let mut p = Project::new("u1", "demo", ProjectKind::Generation);
    ProjectPatch::failed("backend down").apply_to(&mut p);
    assert_eq!(p.status, ProjectStatus::Failed);
    assert_eq!(p.error.as_deref(), Some("backend down"));
}

#[test]
fn project_patch_can_clear_a_stale_error() {
    let mut p = Project::new("u1", "demo", ProjectKind::Separation);
    ProjectPatch::failed("bass: timed out").apply_to(&mut p);

    // Leaving `error` out keeps it.
    ProjectPatch::status(ProjectStatus::Processing).apply_to(&mut p);
    assert_eq!(p.error.as_deref(), Some("bass: timed out"));

    let retry = ProjectPatch {
        status: Some(ProjectStatus::Completed),
        error: Some(None),
        ..ProjectPatch::default()
    };
    retry.apply_to(&mut p);
    assert_eq!(p.status, ProjectStatus::Completed);
    assert_eq!(p.error, None);
}

#[test]
fn project_serializes_kind_as_type_and_lowercase_enums() {
    let p = Project::new("u1", "demo", ProjectKind::Separation)
        .with_status(ProjectStatus::Completed)
        .with_setting("model", "full");
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v["type"], "separation");
    assert_eq!(v["status"], "completed");
    assert_eq!(v["settings"]["model"], "full");
    assert_eq!(p.setting_str("model"), Some("full"));
}

#[test]
fn user_deserializes_with_defaults() {
    let v = serde_json::json!({
        "id": "1",
        "email": "demo@musicflow.app",
        "name": "demo",
        "subscription_plan": "pro",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-15T00:00:00Z"
    });
    let u: User = serde_json::from_value(v).unwrap();
    assert_eq!(u.subscription_plan, SubscriptionPlan::Pro);
    assert_eq!(u.storage_limit, DEFAULT_STORAGE_LIMIT);
    assert_eq!(u.storage_remaining(), DEFAULT_STORAGE_LIMIT);
}

#[test]
fn playlist_add_track_ignores_duplicates() {
    let mut pl = Playlist::new("u1", "favs");
    assert!(pl.add_track("a"));
    assert!(!pl.add_track("a"));
    assert_eq!(pl.tracks, vec!["a".to_string()]);
}
