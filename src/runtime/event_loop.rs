use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, Mode};
use crate::audio::{AudioBackend, BackendEvent};
use crate::config;
use crate::controller::PlaylistController;
use crate::ui;

/// Main terminal event loop: drains backend events, draws the UI and
/// dispatches key presses. Returns `Ok(())` when shutdown is requested.
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &PlaylistController<B>,
    events: &mpsc::Receiver<BackendEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.ui.tick_ms.max(1));

    loop {
        while let Ok(event) = events.try_recv() {
            match event {
                BackendEvent::Finished { error } => {
                    let outcome = controller.on_backend_finished(error);
                    debug!(?outcome, "backend session finished");
                    app.report(&outcome);
                }
            }
        }

        let snapshot = controller.snapshot();
        terminal.draw(|f| ui::draw(f, app, &snapshot, &settings.ui, &settings.controls))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let quit = match app.mode {
                    Mode::FolderPicker => handle_picker_key(key, settings, app, controller),
                    Mode::Player => handle_player_key(key, settings, app, controller),
                    Mode::Search => {
                        handle_search_key(key, app, controller);
                        false
                    }
                };
                if quit {
                    info!("quit requested");
                    return Ok(());
                }
            }
        }
    }
}

/// Load the chosen folder(s); an empty result keeps the picker open.
pub fn load_choice<B: AudioBackend>(
    folders: &[std::path::PathBuf],
    label: String,
    settings: &config::Settings,
    app: &mut App,
    controller: &PlaylistController<B>,
) {
    if controller.load(folders, &settings.library) {
        app.clear_message();
        app.enter_player(label);
    } else {
        app.notify(format!("No music files found in {label}"));
    }
}

fn handle_picker_key<B: AudioBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &PlaylistController<B>,
) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Down | KeyCode::Char('j') => app.picker_next(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_prev(),
        KeyCode::Enter => {
            let (folders, label) = app.picker_choice();
            load_choice(&folders, label, settings, app, controller);
        }
        _ => {}
    }
    false
}

fn handle_player_key<B: AudioBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &PlaylistController<B>,
) -> bool {
    let controls = &settings.controls;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('r') => app.report(&controller.play_random()),
        KeyCode::Char(' ') => app.report(&controller.toggle_pause()),
        KeyCode::Right => app.report(&controller.play_next()),
        KeyCode::Left => app.report(&controller.play_previous()),
        KeyCode::Enter => app.report(&controller.play(None)),
        KeyCode::Up => {
            controller.adjust_volume(controls.volume_step);
        }
        KeyCode::Down => {
            controller.adjust_volume(-controls.volume_step);
        }
        KeyCode::Char('1') => app.report(&controller.skip_forward(controls.seek_seconds)),
        KeyCode::Char('2') => app.report(&controller.rewind(controls.seek_seconds)),
        KeyCode::Char('l') => {
            controller.toggle_loop();
        }
        KeyCode::Char('a') => {
            controller.toggle_autoplay();
        }
        KeyCode::Char('n') => app.enter_search(),
        KeyCode::Char('z') => app.toggle_progress_bar(),
        KeyCode::Char('d') => app.toggle_details(),
        _ => {}
    }
    false
}

fn handle_search_key<B: AudioBackend>(
    key: KeyEvent,
    app: &mut App,
    controller: &PlaylistController<B>,
) {
    match key.code {
        KeyCode::Esc => app.exit_search(),
        KeyCode::Down => app.search_next(),
        KeyCode::Up => app.search_prev(),
        KeyCode::Enter => {
            if let Some(index) = app.selected_search_index() {
                app.exit_search();
                app.report(&controller.play(Some(index)));
            }
        }
        KeyCode::Backspace => {
            app.pop_search_char();
            let results = controller.search_by_name(&app.search_query);
            app.set_search_results(results);
        }
        KeyCode::Char(c) if !c.is_control() => {
            app.push_search_char(c);
            let results = controller.search_by_name(&app.search_query);
            app.set_search_results(results);
        }
        _ => {}
    }
}
