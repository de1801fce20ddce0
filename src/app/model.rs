//! The view model behind the terminal UI.
//!
//! [`App`] combines the library store with the player engine and keeps the
//! purely visual state: which list is shown, the cursor and the filter.

use crate::model::Track;
use crate::player::{Epoch, PlayerEngine};
use crate::store::{LibraryStore, Outcome};

/// Which slice of the library the track list shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LibraryView {
    #[default]
    All,
    Favorites,
}

impl LibraryView {
    pub fn toggle(self) -> Self {
        match self {
            Self::All => Self::Favorites,
            Self::Favorites => Self::All,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::All => "Library",
            Self::Favorites => "Favorites",
        }
    }
}

pub struct App {
    pub library: LibraryStore,
    pub engine: PlayerEngine,
    pub view: LibraryView,
    /// Cursor position within [`visible_indices`](Self::visible_indices).
    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub status: Option<String>,
    pub show_help: bool,
    /// Epoch of the last load counted as a play.
    counted_epoch: Option<Epoch>,
}

impl App {
    pub fn new(library: LibraryStore, engine: PlayerEngine) -> Self {
        Self {
            library,
            engine,
            view: LibraryView::All,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            status: None,
            show_help: false,
            counted_epoch: None,
        }
    }

    /// Indices into the library's tracks, after view and filter.
    pub fn visible_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        self.library
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, t)| self.view == LibraryView::All || t.is_favorite)
            .filter(|(_, t)| query.is_empty() || Self::fuzzy_match_positions(&t.display(), query).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_tracks(&self) -> Vec<&Track> {
        let tracks = self.library.tracks();
        self.visible_indices().into_iter().map(|i| &tracks[i]).collect()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        let tracks = self.library.tracks();
        self.visible_indices().get(self.selected).map(|&i| &tracks[i])
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.visible_indices().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.visible_indices().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
        self.selected = 0;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Queue the visible list and start at the cursor.
    pub fn play_selected(&mut self) -> bool {
        let start = self.selected;
        self.play_visible_from(start)
    }

    /// Queue the visible list from the top.
    pub fn play_all(&mut self) -> bool {
        self.play_visible_from(0)
    }

    fn play_visible_from(&mut self, start: usize) -> bool {
        let tracks: Vec<Track> = self.visible_tracks().into_iter().cloned().collect();
        if start >= tracks.len() {
            return false;
        }
        self.engine.set_queue_from(&tracks, start);
        self.engine.set_is_playing(true);
        true
    }

    pub fn toggle_favorite_selected(&mut self) -> Outcome {
        let Some(id) = self.selected_track().map(|t| t.id.clone()) else {
            return Outcome::Absent;
        };
        let outcome = self.library.toggle_favorite(&id);
        self.clamp_selection();
        outcome
    }

    /// Whether the playing track is a favorite in the library.
    pub fn current_is_favorite(&self) -> bool {
        self.engine
            .current_track()
            .and_then(|t| self.library.track(&t.id))
            .map(|t| t.is_favorite)
            .unwrap_or(false)
    }

    /// Count a play once per load, the first time the engine is playing it.
    ///
    /// Returns the id of the track that was counted.
    pub fn count_play(&mut self) -> Option<String> {
        let epoch = self.engine.epoch();
        if !self.engine.is_playing() || self.counted_epoch == Some(epoch) {
            return None;
        }
        let id = self.engine.current_track()?.id.clone();
        self.counted_epoch = Some(epoch);
        self.library.record_play(&id).applied().then_some(id)
    }

    /// Fuzzy/subsequence match: return the character positions in `title`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_lowercase().next().unwrap_or(qc);
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc.to_lowercase().next().unwrap_or(tc) == qc_low => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_indices().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
