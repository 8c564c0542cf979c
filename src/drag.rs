//! Drag-to-scrub state machine.
//!
//! A horizontal drag moves the waveform under the fixed divider. Dragging right
//! pulls earlier content toward the divider, so the position moves backwards:
//! `position = clamp(start - offset / content_width, 0, 1)`.

use crate::constants::GUTTER;
use crate::signal::{ListenerId, Signal};
use crate::waveform::WaveformView;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { start_position: f64 },
}

/// Answer to the gesture source when a drag begins
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureClaim {
    /// Competing recognizers should stand down for this gesture
    Exclusive,
}

#[derive(Debug)]
pub struct DragController {
    state: DragState,
    gesture_pressed: Signal<()>,
    position_changed: Signal<f64>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            gesture_pressed: Signal::new(),
            position_changed: Signal::new(),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag session at the view's current position. A begin that
    /// arrives mid-drag replaces the old session.
    pub fn begin(&mut self, view: &WaveformView) -> GestureClaim {
        if let DragState::Dragging { start_position } = self.state {
            log::debug!("Drag restarted, dropping session that began at {start_position:.3}");
        }
        self.state = DragState::Dragging {
            start_position: view.position(),
        };
        self.gesture_pressed.emit(&());
        GestureClaim::Exclusive
    }

    /// Apply the horizontal offset, in pixels, since the drag began
    pub fn update(&mut self, view: &mut WaveformView, offset_x: f64) {
        let DragState::Dragging { start_position } = self.state else {
            return;
        };

        let content_width = view.peak_count() as f64 * GUTTER;
        if content_width <= 0.0 || !offset_x.is_finite() {
            return;
        }

        let delta = offset_x / content_width;
        view.set_position((start_position - delta).clamp(0.0, 1.0));
    }

    /// Finish the drag and report the final position; ignored while idle
    pub fn end(&mut self, view: &WaveformView) {
        if self.state == DragState::Idle {
            return;
        }
        self.state = DragState::Idle;
        let position = view.position();
        log::debug!("Drag released at {position:.3}");
        self.position_changed.emit(&position);
    }

    pub fn on_gesture_pressed(&mut self, handler: impl FnMut(&()) + 'static) -> ListenerId {
        self.gesture_pressed.connect(handler)
    }

    pub fn on_position_changed(&mut self, handler: impl FnMut(&f64) + 'static) -> ListenerId {
        self.position_changed.connect(handler)
    }
}
