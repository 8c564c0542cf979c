//! Scrolling waveform view with a fixed center divider.
//!
//! The playback position always sits under the divider in the middle of the
//! surface; the peak bars scroll past it. Bars left of (or on) the divider are
//! drawn in the foreground color, bars to its right in the dimmed color.
//!
//! Rendering produces a list of [`DrawOp`]s rather than touching a surface
//! directly, so a render pass can be inspected, replayed or serialised.

use serde::Serialize;

use crate::constants::{BAR_WIDTH, DIVIDER_WIDTH, GUTTER};
use crate::peaks::Peaks;
use crate::signal::{ListenerId, Property};
use crate::theme::{Color, Palette, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
}

/// Path-style drawing target
pub trait DrawSurface {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self, width: f64, color: Color);
}

pub fn replay(ops: &[DrawOp], surface: &mut dyn DrawSurface) {
    for op in ops {
        match *op {
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                surface.move_to(x1, y1);
                surface.line_to(x2, y2);
                surface.stroke(width, color);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct WaveformView {
    peaks: Property<Peaks>,
    position: Property<f64>,
    redraw_requested: bool,
}

impl WaveformView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peaks(&self) -> &Peaks {
        self.peaks.get()
    }

    pub fn set_peaks(&mut self, peaks: Peaks) {
        self.peaks.set(peaks);
        self.request_redraw();
    }

    pub fn position(&self) -> f64 {
        *self.position.get()
    }

    /// Callers keep `position` inside [0, 1]; the setter does not clamp
    pub fn set_position(&mut self, position: f64) {
        self.position.set(position);
        self.request_redraw();
    }

    pub fn on_position_notify(&mut self, listener: impl FnMut(&f64) + 'static) -> ListenerId {
        self.position.subscribe(listener)
    }

    pub fn on_peaks_notify(&mut self, listener: impl FnMut(&Peaks) + 'static) -> ListenerId {
        self.peaks.subscribe(listener)
    }

    pub fn peak_count(&self) -> usize {
        self.peaks.get().len()
    }

    /// Total width in pixels of all bars laid end to end
    pub fn content_width(&self) -> f64 {
        self.peak_count() as f64 * GUTTER
    }

    /// Call when the theme changes underneath the view
    pub fn theme_changed(&mut self) {
        self.request_redraw();
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Returns and clears the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    pub fn render(&self, width: f64, height: f64, theme: &dyn Theme) -> Vec<DrawOp> {
        let palette = Palette::resolve(theme);
        let peaks = self.peaks.get();

        let vertical_center = height / 2.0;
        let horizontal_center = width / 2.0;
        let mut pointer = horizontal_center - self.position() * self.content_width();

        let mut ops = Vec::with_capacity(peaks.len().min(width as usize) + 1);
        ops.push(DrawOp::Line {
            x1: horizontal_center,
            y1: 0.0,
            x2: horizontal_center,
            y2: height,
            color: palette.divider,
            width: DIVIDER_WIDTH,
        });

        // Smallest whole number of bars that brings the pointer on screen
        let mut skipped = 0;
        if pointer < 0.0 {
            skipped = ((-pointer / GUTTER).ceil() as usize).min(peaks.len());
            pointer += skipped as f64 * GUTTER;
        }

        for &peak in &peaks[skipped..] {
            if pointer < 0.0 {
                pointer += GUTTER;
                continue;
            }
            if pointer > width {
                break;
            }

            let color = if pointer > horizontal_center {
                palette.right
            } else {
                palette.left
            };
            ops.push(DrawOp::Line {
                x1: pointer,
                y1: vertical_center + peak * height,
                x2: pointer,
                y2: vertical_center - peak * height,
                color,
                width: BAR_WIDTH,
            });
            pointer += GUTTER;
        }

        ops
    }

    /// Render and replay into `surface`
    pub fn draw(&self, width: f64, height: f64, theme: &dyn Theme, surface: &mut dyn DrawSurface) {
        let ops = self.render(width, height, theme);
        replay(&ops, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FG: Color = Color::rgb(1, 1, 1);
    const DIM: Color = Color::rgb(2, 2, 2);
    const ACCENT: Color = Color::rgb(3, 3, 3);

    fn theme() -> ThemeConfig {
        ThemeConfig {
            foreground: Some(FG),
            dimmed: Some(DIM),
            accent: Some(ACCENT),
            high_contrast: false,
        }
    }

    fn view_with(peaks: Vec<f64>, position: f64) -> WaveformView {
        let mut view = WaveformView::new();
        view.set_peaks(Peaks::from(peaks));
        view.set_position(position);
        view
    }

    fn bars(ops: &[DrawOp]) -> Vec<(f64, Color)> {
        ops.iter()
            .skip(1)
            .map(|op| match *op {
                DrawOp::Line { x1, color, .. } => (x1, color),
            })
            .collect()
    }

    #[test]
    fn test_scenario_centered_position() {
        let view = view_with(vec![0.5; 10], 0.5);
        let ops = view.render(100.0, 40.0, &theme());

        let bars = bars(&ops);
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0].0, 30.0);
        assert_eq!(bars[9].0, 66.0);
    }

    #[test]
    fn test_divider_is_first_and_uses_accent() {
        let view = view_with(vec![0.5; 3], 0.0);
        let ops = view.render(100.0, 40.0, &theme());

        assert_eq!(
            ops[0],
            DrawOp::Line {
                x1: 50.0,
                y1: 0.0,
                x2: 50.0,
                y2: 40.0,
                color: ACCENT,
                width: DIVIDER_WIDTH,
            }
        );
    }

    #[test]
    fn test_divider_falls_back_to_foreground() {
        let mut theme = theme();
        theme.accent = None;
        let view = view_with(vec![], 0.0);
        let ops = view.render(100.0, 40.0, &theme);

        assert_eq!(ops.len(), 1);
        match ops[0] {
            DrawOp::Line { color, .. } => assert_eq!(color, FG),
        }
    }

    #[test]
    fn test_bar_geometry() {
        let view = view_with(vec![0.25], 0.0);
        let ops = view.render(100.0, 40.0, &theme());

        assert_eq!(
            ops[1],
            DrawOp::Line {
                x1: 50.0,
                y1: 30.0,
                x2: 50.0,
                y2: 10.0,
                color: FG,
                width: BAR_WIDTH,
            }
        );
    }

    #[test]
    fn test_color_boundary_at_center_is_left() {
        // position 0 puts the first bar exactly on the divider
        let view = view_with(vec![0.5; 3], 0.0);
        let bars = bars(&view.render(100.0, 40.0, &theme()));

        assert_eq!(bars[0], (50.0, FG));
        assert_eq!(bars[1], (54.0, DIM));
        assert_eq!(bars[2], (58.0, DIM));
    }

    #[test]
    fn test_offscreen_left_bars_are_skipped() {
        // pointer0 = 50 - 1.0 * 40 * 4 = -110 -> skip 28 bars, start at 2
        let view = view_with(vec![0.5; 40], 1.0);
        let bars = bars(&view.render(100.0, 40.0, &theme()));

        assert_eq!(bars.len(), 12);
        assert_eq!(bars[0].0, 2.0);
        assert!(bars.iter().all(|(x, _)| *x >= 0.0));
        assert!(bars.iter().all(|(_, c)| *c == FG));
    }

    #[test]
    fn test_skip_on_exact_gutter_multiple() {
        // pointer0 = 50 - 1.0 * 30 * 4 = -70; not a gutter multiple
        let view = view_with(vec![0.5; 30], 1.0);
        let first = bars(&view.render(100.0, 40.0, &theme()))[0].0;
        assert_eq!(first, 2.0);

        // pointer0 = 48 - 1.0 * 30 * 4 = -72 -> exactly 18 bars skipped
        let first = bars(&view.render(96.0, 40.0, &theme()))[0].0;
        assert_eq!(first, 0.0);
    }

    #[test]
    fn test_offscreen_right_bars_stop_iteration() {
        let view = view_with(vec![0.5; 100], 0.0);
        let bars = bars(&view.render(100.0, 40.0, &theme()));

        // 50, 54, ..., 98 are on screen; 102 is past the edge
        assert_eq!(bars.len(), 13);
        assert_eq!(bars.last().unwrap().0, 98.0);
    }

    #[test]
    fn test_render_is_reproducible() {
        let view = view_with(vec![0.1, 0.7, 0.3, 0.9], 0.4);
        let a = view.render(64.0, 20.0, &theme());
        let b = view.render(64.0, 20.0, &theme());
        assert_eq!(a, b);
    }

    #[test]
    fn test_mutations_request_redraw() {
        let mut view = WaveformView::new();
        assert!(!view.take_redraw_request());

        view.set_position(0.2);
        assert!(view.take_redraw_request());
        assert!(!view.take_redraw_request());

        view.set_peaks(Peaks::from(vec![0.1]));
        assert!(view.take_redraw_request());

        view.theme_changed();
        assert!(view.take_redraw_request());
    }

    #[test]
    fn test_position_notifies_every_set() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut view = WaveformView::new();
        let sink = seen.clone();
        view.on_position_notify(move |p| sink.borrow_mut().push(*p));

        view.set_position(0.5);
        view.set_position(0.5);

        assert_eq!(*seen.borrow(), vec![0.5, 0.5]);
    }

    #[derive(Default)]
    struct Recorder {
        path: Vec<(f64, f64)>,
        strokes: Vec<(Vec<(f64, f64)>, f64, Color)>,
    }

    impl DrawSurface for Recorder {
        fn move_to(&mut self, x: f64, y: f64) {
            self.path = vec![(x, y)];
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.path.push((x, y));
        }
        fn stroke(&mut self, width: f64, color: Color) {
            let path = std::mem::take(&mut self.path);
            self.strokes.push((path, width, color));
        }
    }

    #[test]
    fn test_draw_replays_into_surface() {
        let view = view_with(vec![0.5, 0.5], 0.0);
        let mut recorder = Recorder::default();
        view.draw(100.0, 40.0, &theme(), &mut recorder);

        assert_eq!(recorder.strokes.len(), 3);
        assert_eq!(recorder.strokes[0].0, vec![(50.0, 0.0), (50.0, 40.0)]);
        assert_eq!(recorder.strokes[0].2, ACCENT);
        assert_eq!(recorder.strokes[1].0, vec![(50.0, 40.0), (50.0, 0.0)]);
        assert_eq!(recorder.strokes[2].1, BAR_WIDTH);
    }
}
