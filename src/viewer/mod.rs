//! Interactive terminal viewer.
//!
//! Replays a level file in real time (scaled by the configured replay rate),
//! shows the waveform filling in as peaks arrive, and lets the user scrub by
//! dragging on the waveform with the left mouse button.

pub mod app;
pub mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use scrubwave::config::Config;

use app::App;

/// Longest the event loop sleeps waiting for input
const FRAME_WAIT: Duration = Duration::from_millis(20);

pub fn run(levels: &str, duration_ms: Option<u64>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    crate::cli::init_logging(&config)?;
    info!("Starting scrubwave viewer for {levels}");

    let session = crate::cli::open_session(levels, duration_ms, config.replay_rate)?;
    let mut app = App::new(levels, session, config.theme.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("Viewer stopped: {e}");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        let now = Instant::now();
        app.tick(now);

        if app.take_redraw() {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        if event::poll(app.poll_timeout(now, FRAME_WAIT))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(..) => app.force_redraw(),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
