use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::Args;
use crate::app::App;
use crate::audio::{AudioBackend, BackendEvent, RodioBackend};
use crate::controller::PlaylistController;
use crate::logging;

mod event_loop;
mod settings;
mod startup;

pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    if let Some(w) = &settings_warning {
        eprintln!("cadenza: {w}");
    }

    // Folder problems are reported on stderr before the terminal is taken over.
    let folders =
        startup::resolve_folders(&args.folders, args.folders_file.as_deref(), &settings.library)?;

    let log_dir = startup::resolve_log_dir(args.log_dir.as_deref(), &settings.log);
    let _log_guard = logging::init_logging(&log_dir, &settings.log.filter, args.dev)?;
    info!(folders = folders.len(), log_dir = %log_dir.display(), "cadenza starting");
    if let Some(w) = settings_warning {
        warn!("{w}");
    }

    let (event_tx, event_rx) = mpsc::channel::<BackendEvent>();
    let finish_tolerance = Duration::from_millis(settings.playback.finish_tolerance_ms);
    let mut backend = RodioBackend::new(&settings.audio, finish_tolerance)?;
    backend.on_finished(event_tx);
    let controller = PlaylistController::new(backend, &settings.playback);

    let mut app = App::new(folders);
    app.show_progress_bar = settings.ui.show_progress_bar;

    // A single folder skips the picker.
    if app.folders.len() == 1 {
        let (folders, label) = app.picker_choice();
        event_loop::load_choice(&folders, label, &settings, &mut app, &controller);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &controller, &event_rx);

    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("cadenza stopped");
    run_result
}
