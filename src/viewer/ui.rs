use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{self, Canvas, Context},
    },
};

use scrubwave::theme;
use scrubwave::waveform::{DrawSurface, replay};

use super::app::{App, PIXELS_PER_COLUMN, PIXELS_PER_ROW};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_waveform(f, chunks[1], app);
    draw_help(f, chunks[2], app);
}

fn tui_color(color: theme::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let view = app.session.view();
    let state = if app.is_decoding() {
        Span::styled("decoding", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("complete", Style::default().fg(Color::Green))
    };

    let header = Line::from(vec![
        Span::styled(
            app.source.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        state,
        Span::raw(format!(
            "  {} peaks  {:.1}%",
            view.peak_count(),
            view.position() * 100.0
        )),
    ]);

    let widget = Paragraph::new(header).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Replays path-style draw calls as canvas lines. Canvas y grows upward, so
/// rows are flipped against the surface height.
struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    height: f64,
    path: Vec<(f64, f64)>,
}

impl DrawSurface for CanvasSurface<'_, '_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.path.clear();
        self.path.push((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push((x, y));
    }

    // Braille dots have a fixed size, so the stroke width is not representable
    fn stroke(&mut self, _width: f64, color: theme::Color) {
        let color = tui_color(color);
        for segment in self.path.windows(2) {
            self.ctx.draw(&canvas::Line {
                x1: segment[0].0,
                y1: self.height - segment[0].1,
                x2: segment[1].0,
                y2: self.height - segment[1].1,
                color,
            });
        }
        self.path.clear();
    }
}

fn draw_waveform(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.is_scrubbing() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    app.set_waveform_area(inner);

    let width = inner.width as f64 * PIXELS_PER_COLUMN;
    let height = inner.height as f64 * PIXELS_PER_ROW;
    let ops = app.session.view().render(width, height, &app.theme);

    let canvas = Canvas::default()
        .block(block)
        .paint(|ctx| {
            let mut surface = CanvasSurface {
                ctx,
                height,
                path: Vec::new(),
            };
            replay(&ops, &mut surface);
        })
        .x_bounds([0.0, width])
        .y_bounds([0.0, height]);

    f.render_widget(canvas, area);
}

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("[drag]", Style::default().fg(Color::Magenta)),
        Span::raw(" scrub  "),
        Span::styled("[r]", Style::default().fg(Color::Green)),
        Span::raw(" restart  "),
        Span::styled("[c]", Style::default().fg(Color::Blue)),
        Span::raw(" contrast  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];

    if let Some(seek) = app.last_seek.get() {
        spans.push(Span::raw(format!("    last seek {:.1}%", seek * 100.0)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}
