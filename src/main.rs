mod app;
mod config;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::{App, InputMode};
use chrono::Local;
use clap::Parser;
use config::{Args, Config};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use signal_map::dataset::DatasetCache;
use signal_map::map::{load_basemap, MapRenderer};
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from(Args::parse());
    init_logging(&config)?;

    let source = config
        .source
        .open(config.timeout)
        .context("opening data source")?;
    let cache = DatasetCache::new(source, config.ttl);

    let mut renderer = MapRenderer::new();
    let files = load_basemap(&mut renderer, &config.basemap_dir);
    info!(files, dir = %config.basemap_dir.display(), "basemap ready");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, cache, renderer, &config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Logs go to a file since the UI owns the terminal
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Handle mouse events for panning, zooming and hover
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => app.release(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch) => app.search_push(ch),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Enter => app.end_search(),
        KeyCode::Esc => app.cancel_search(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc | KeyCode::Char('d') => app.close_detail(),
        KeyCode::Up | KeyCode::Char('k') => app.detail_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.detail_next(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_detail_tab(),
        KeyCode::Char('m') => app.locate_detail(),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Filter sidebar
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Up => app.cursor_up(),
        KeyCode::Down => app.cursor_down(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('x') => app.clear_focused(),
        KeyCode::Char('X') => app.clear_all(),
        KeyCode::Char('/') => app.begin_search(),

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(Instant::now()),
        KeyCode::Char('e') => {
            // Outcome lands in the status bar
            let _ = app.export(Local::now().date_naive());
        }

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
        KeyCode::Char('f') => app.fit_to_markers(),

        KeyCode::Char('d') => app.open_detail(),
        KeyCode::Char('a') => app.toggle_screen(),

        // Layer toggles
        KeyCode::Char('b') => app.map_renderer.toggle_borders(),
        KeyCode::Char('L') => app.map_renderer.toggle_labels(),

        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    cache: DatasetCache,
    renderer: MapRenderer,
    config: &Config,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        cache,
        renderer,
        config.theme,
        config.export_dir.clone(),
        size.width,
        size.height,
    );

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &app, app.theme))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.detail.is_some() {
                        handle_detail_key(&mut app, key);
                    } else if app.mode == InputMode::Search {
                        handle_search_key(&mut app, key);
                    } else {
                        handle_key(&mut app, key);
                    }
                }
                Event::Mouse(mouse) if app.detail.is_none() => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        // Picks up TTL reloads between keystrokes
        app.sync_dataset(Instant::now());
        app.tick();

        if app.should_quit {
            break;
        }
    }

    info!("exiting");
    Ok(())
}
