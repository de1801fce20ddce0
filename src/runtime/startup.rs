use crate::app::App;
use crate::config;
use crate::player::PlayerEngine;
use crate::store::LibraryStore;

/// Build the view model with the configured playback defaults.
pub fn build_app(library: LibraryStore, settings: &config::Settings) -> App {
    let engine = PlayerEngine::with_defaults(settings.player.default_volume, settings.player.playback_mode);
    let mut app = App::new(library, engine);

    let count = app.library.tracks().len();
    if count == 0 {
        app.set_status("Library is empty: run `musicflow import <dir>`");
    } else {
        app.set_status(format!("{count} tracks"));
    }
    app
}
