use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use bandscope_core::AppConfig;
use bandscope_runner::config::CONFIG_DIR_NAME;
use bandscope_runner::{config_path_in, load_config, ConfigSource};
use bandscope_tui::app::{AppState, ErrorCategory};
use bandscope_tui::{input, logging, persistence, ui};

fn main() -> Result<()> {
    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    let state_path = config_dir.join(CONFIG_DIR_NAME).join("state.json");
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME);

    // Logging is best effort; the UI works without it.
    let log_result = logging::init(&log_dir);

    let user_config = config_path_in(&config_dir);
    let (mut app, config_error) = match load_config(None, Some(&user_config)) {
        Ok((config, source)) => (AppState::new(config, source), None),
        Err(e) => (
            AppState::new(AppConfig::default(), ConfigSource::BuiltIn),
            Some(e),
        ),
    };
    tracing::info!(config = %app.config_source, "starting bandscope-tui");

    // A file argument replaces the remembered one.
    let arg_file = std::env::args_os().nth(1).map(PathBuf::from);
    let mut persisted = persistence::load(&state_path);
    if arg_file.is_some() {
        persisted.last_file = None;
    }
    persistence::apply(&mut app, persisted);
    if let Some(path) = arg_file {
        app.open_file(path);
    }
    if let Some(e) = config_error {
        app.push_error(
            ErrorCategory::Config,
            e.to_string(),
            "using built-in defaults".into(),
        );
    }
    if let Err(e) = log_result {
        app.set_warning(format!("logging disabled: {e:#}"));
    }

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, "failed to save UI state");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
