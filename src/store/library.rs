use tracing::debug;

use crate::model::{Playlist, Track, TrackPatch};

use super::Outcome;
use super::observer::{SubscriptionId, Subscribers};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    pub tracks: Vec<Track>,
    /// Ids of favorite tracks, in the order they were favorited.
    ///
    /// Every id refers to a track in `tracks` whose `is_favorite` is set.
    pub favorite_ids: Vec<String>,
    pub playlists: Vec<Playlist>,
}

impl LibraryState {
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Favorite tracks resolved against the main collection.
    pub fn favorites(&self) -> Vec<&Track> {
        self.favorite_ids
            .iter()
            .filter_map(|id| self.track(id))
            .collect()
    }

    fn sync_favorite(&mut self, index: usize) {
        let track = &self.tracks[index];
        let listed = self.favorite_ids.iter().position(|id| *id == track.id);
        match (track.is_favorite, listed) {
            (true, None) => self.favorite_ids.push(track.id.clone()),
            (false, Some(pos)) => {
                self.favorite_ids.remove(pos);
            }
            _ => {}
        }
    }
}

/// The user's tracks, favorites and playlists.
#[derive(Debug, Default)]
pub struct LibraryStore {
    state: LibraryState,
    subscribers: Subscribers<LibraryState>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(tracks: Vec<Track>, playlists: Vec<Playlist>) -> Self {
        let mut store = Self::new();
        store.set_tracks(tracks);
        store.state.playlists = playlists;
        store
    }

    pub fn state(&self) -> &LibraryState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.state.tracks
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.state.track(id)
    }

    pub fn favorites(&self) -> Vec<&Track> {
        self.state.favorites()
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.state.playlists
    }

    /// Tracks whose title or artist contains `query`, in library order.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        self.state.tracks.iter().filter(|t| t.matches(query)).collect()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&LibraryState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Replace all tracks. Favorites are rebuilt from the tracks' flags.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.state.favorite_ids = tracks
            .iter()
            .filter(|t| t.is_favorite)
            .map(|t| t.id.clone())
            .collect();
        self.state.tracks = tracks;
        self.changed();
    }

    /// Insert at the front of the collection.
    pub fn add_track(&mut self, track: Track) {
        if track.is_favorite && !self.state.favorite_ids.contains(&track.id) {
            self.state.favorite_ids.push(track.id.clone());
        }
        self.state.tracks.insert(0, track);
        self.changed();
    }

    pub fn update_track(&mut self, id: &str, patch: &TrackPatch) -> Outcome {
        let Some(index) = self.position(id) else {
            return Outcome::Absent;
        };
        patch.apply_to(&mut self.state.tracks[index]);
        self.state.sync_favorite(index);
        self.changed();
        Outcome::Applied
    }

    pub fn remove_track(&mut self, id: &str) -> Outcome {
        let Some(index) = self.position(id) else {
            return Outcome::Absent;
        };
        self.state.tracks.remove(index);
        self.state.favorite_ids.retain(|f| f != id);
        self.changed();
        Outcome::Applied
    }

    /// Flip `is_favorite` in place; the track keeps its position.
    pub fn toggle_favorite(&mut self, id: &str) -> Outcome {
        let Some(index) = self.position(id) else {
            return Outcome::Absent;
        };
        let track = &mut self.state.tracks[index];
        track.is_favorite = !track.is_favorite;
        debug!(id, favorite = track.is_favorite, "favorite toggled");
        self.state.sync_favorite(index);
        self.changed();
        Outcome::Applied
    }

    /// Count one more play of `id`.
    pub fn record_play(&mut self, id: &str) -> Outcome {
        let Some(track) = self.track(id) else {
            return Outcome::Absent;
        };
        let patch = TrackPatch::play_count(track.play_count.saturating_add(1));
        self.update_track(id, &patch)
    }

    pub fn set_playlists(&mut self, playlists: Vec<Playlist>) {
        self.state.playlists = playlists;
        self.changed();
    }

    pub fn add_playlist(&mut self, playlist: Playlist) {
        self.state.playlists.insert(0, playlist);
        self.changed();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.state.tracks.iter().position(|t| t.id == id)
    }

    fn changed(&mut self) {
        self.subscribers.notify(&self.state);
    }
}
