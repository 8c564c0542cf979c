//! Viewer state and input handling.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use scrubwave::pipeline::{DecodePipeline, ReplayPipeline};
use scrubwave::session::Session;
use scrubwave::theme::ThemeConfig;

/// Braille canvas cells are two dots wide
pub const PIXELS_PER_COLUMN: f64 = 2.0;
/// and four dots tall
pub const PIXELS_PER_ROW: f64 = 4.0;

pub struct App {
    pub should_quit: bool,
    pub source: String,
    pub session: Session<ReplayPipeline>,
    pub theme: ThemeConfig,
    pub last_seek: Rc<Cell<Option<f64>>>,
    drag_anchor: Option<u16>,
    waveform_area: Cell<Rect>,
    dirty: bool,
}

impl App {
    pub fn new(source: &str, mut session: Session<ReplayPipeline>, theme: ThemeConfig) -> Self {
        let last_seek = Rc::new(Cell::new(None));
        let seek = Rc::clone(&last_seek);
        let _ = session.on_position_changed(move |position| {
            log::info!("Seek to {:.1}%", position * 100.0);
            seek.set(Some(*position));
        });
        let _ = session.on_gesture_pressed(|_| log::debug!("Scrub gesture pressed"));

        Self {
            should_quit: false,
            source: source.to_string(),
            session,
            theme,
            last_seek,
            drag_anchor: None,
            waveform_area: Cell::new(Rect::default()),
            dirty: true,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
    }

    /// Wait no longer than `max`, and no later than the next interim publish
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        self.session
            .aggregator()
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now).min(max))
            .unwrap_or(max)
    }

    pub fn force_redraw(&mut self) {
        self.dirty = true;
    }

    pub fn take_redraw(&mut self) -> bool {
        let view_requested = self.session.view_mut().take_redraw_request();
        std::mem::take(&mut self.dirty) || view_requested
    }

    /// Recorded by the renderer so mouse input can be hit-tested
    pub fn set_waveform_area(&self, area: Rect) {
        self.waveform_area.set(area);
    }

    pub fn is_scrubbing(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn is_decoding(&self) -> bool {
        !self.session.aggregator().is_finished()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        // The drag owns input until it is released
        if self.is_scrubbing() {
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => {
                log::info!("Restarting peak aggregation for {}", self.source);
                self.session.restart();
                self.session.aggregator_mut().pipeline_mut().play();
            }
            KeyCode::Char('c') => {
                self.theme.toggle_high_contrast();
                self.session.view_mut().theme_changed();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.drag_anchor.is_none() && self.hit_waveform(mouse.column, mouse.row) {
                    self.drag_anchor = Some(mouse.column);
                    let _ = self.session.begin_drag();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(anchor) = self.drag_anchor {
                    let columns = mouse.column as i32 - anchor as i32;
                    self.session
                        .update_drag(columns as f64 * PIXELS_PER_COLUMN);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag_anchor.take().is_some() {
                    self.session.end_drag();
                }
            }
            _ => {}
        }
    }

    fn hit_waveform(&self, column: u16, row: u16) -> bool {
        let area = self.waveform_area.get();
        column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height)
    }
}
