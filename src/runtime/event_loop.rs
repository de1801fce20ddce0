use std::error::Error;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::audio::RodioElement;
use crate::config;
use crate::player::{MediaBinding, MediaEvent};
use crate::ui;

const POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: folds media events into the engine, mirrors
/// the engine onto the audio element, draws and handles input. Returns
/// `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    binding: &mut MediaBinding<RodioElement>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let events: Vec<MediaEvent> = binding.element().events().collect();
        for event in events {
            let failure = match &event {
                MediaEvent::Failed { message, .. } => Some(format!("Playback failed: {message}")),
                _ => None,
            };
            if binding.handle_event(&mut app.engine, event) {
                if let Some(msg) = failure {
                    app.set_status(msg);
                }
            }
        }
        binding.sync(&mut app.engine);
        app.count_play();

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.player))?;

        if event::poll(POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, binding) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    binding: &mut MediaBinding<RodioElement>,
) -> bool {
    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => app.next(),
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => app.prev(),
            KeyCode::Char(c) => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    let player = &settings.player;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if !app.play_selected() {
                app.set_status("Nothing to play");
            }
        }
        KeyCode::Char(' ') => {
            if app.engine.current_track().is_some() {
                app.engine.toggle_playing();
            } else if !app.play_selected() {
                app.set_status("Nothing to play");
            }
        }
        KeyCode::Char('n') => app.engine.next_track(),
        KeyCode::Char('p') => app.engine.prev_track(),
        KeyCode::Char('m') => {
            let mode = app.engine.cycle_playback_mode();
            app.set_status(format!("Mode: {mode}"));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = app.engine.volume() + player.volume_step;
            app.engine.set_volume(volume);
        }
        KeyCode::Char('-') => {
            let volume = app.engine.volume() - player.volume_step;
            app.engine.set_volume(volume);
        }
        KeyCode::Char('0') => app.engine.toggle_mute(),
        KeyCode::Char('H') => seek(app, binding, -(player.seek_seconds as f64)),
        KeyCode::Char('L') => seek(app, binding, player.seek_seconds as f64),
        KeyCode::Char('f') => {
            if !app.toggle_favorite_selected().applied() {
                app.set_status("No track selected");
            }
        }
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Esc => app.show_help = false,
        _ => {}
    }
    false
}

fn seek(app: &mut App, binding: &mut MediaBinding<RodioElement>, delta: f64) {
    if app.engine.current_track().is_none() {
        return;
    }
    if let Err(err) = binding.seek_by(&mut app.engine, delta) {
        warn!(error = %err, "seek failed");
        app.set_status(err.to_string());
    }
}
