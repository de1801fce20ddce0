use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// A playable item in the user's library.
///
/// Everything except `is_favorite` and `play_count` is fixed at creation;
/// those two change through [`TrackPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Length in whole seconds.
    pub duration: u32,
    /// Playable media locator: a URL or a local `file://` path.
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub play_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Create a track with a fresh id, stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        file_url: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration,
            file_url: file_url.into(),
            cover_url: None,
            tags: Vec::new(),
            is_favorite: false,
            play_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive substring match on title or artist.
    ///
    /// A blank query matches every track.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query) || self.artist.to_lowercase().contains(&query)
    }

    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        match self.artist.trim() {
            "" => self.title.clone(),
            artist => format!("{} - {}", artist, self.title),
        }
    }
}

/// The mutable fields of a [`Track`]. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPatch {
    pub is_favorite: Option<bool>,
    pub play_count: Option<u64>,
}

impl TrackPatch {
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    pub fn play_count(play_count: u64) -> Self {
        Self {
            play_count: Some(play_count),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_favorite.is_none() && self.play_count.is_none()
    }

    /// Merge the present fields onto `track`.
    pub fn apply_to(&self, track: &mut Track) {
        if let Some(is_favorite) = self.is_favorite {
            track.is_favorite = is_favorite;
        }
        if let Some(play_count) = self.play_count {
            track.play_count = play_count;
        }
    }
}
