//! Wiring between the aggregator, the view and the drag controller.
//!
//! A [`Session`] is what a host embeds: peaks published by the aggregator flow
//! into the shared view, and drag gestures move the view's position. The view
//! sits behind `Rc<RefCell<_>>` because the aggregator's listener must reach it;
//! everything runs on the host's single event thread.

use std::cell::{Ref, RefCell, RefMut};
use std::error::Error;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::drag::{DragController, GestureClaim};
use crate::peaks::{PeakAggregator, Peaks};
use crate::pipeline::DecodePipeline;
use crate::signal::ListenerId;
use crate::waveform::WaveformView;

/// Upper bound on virtual ticks when running a session to completion
const MAX_TICKS: usize = 10_000_000;

pub struct Session<P: DecodePipeline> {
    aggregator: PeakAggregator<P>,
    view: Rc<RefCell<WaveformView>>,
    drag: DragController,
}

impl<P: DecodePipeline> Session<P> {
    pub fn new(pipeline: P) -> Self {
        let view = Rc::new(RefCell::new(WaveformView::new()));
        let mut aggregator = PeakAggregator::new(pipeline);

        let target = Rc::clone(&view);
        aggregator.subscribe(move |peaks| target.borrow_mut().set_peaks(peaks.clone()));

        Self {
            aggregator,
            view,
            drag: DragController::new(),
        }
    }

    pub fn open(&mut self, uri: &str, duration: Option<Duration>) -> Result<(), Box<dyn Error>> {
        self.aggregator.start(uri, duration)
    }

    pub fn restart(&mut self) {
        self.aggregator.restart();
    }

    /// Feed pipeline events that are due at `now` into the view
    pub fn tick(&mut self, now: Instant) -> usize {
        self.aggregator.pump(now)
    }

    /// Drive the session on a virtual clock advancing by `step` until end of
    /// stream, collecting every peaks publish along the way
    pub fn run_to_end(&mut self, start: Instant, step: Duration) -> Vec<Peaks> {
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&published);
        let id = self
            .aggregator
            .subscribe(move |peaks| sink.borrow_mut().push(peaks.clone()));

        let mut now = start;
        for _ in 0..MAX_TICKS {
            self.aggregator.pump(now);
            if self.aggregator.is_finished() {
                break;
            }
            now += step;
        }
        if !self.aggregator.is_finished() {
            log::warn!("Session did not reach end of stream after {MAX_TICKS} ticks");
        }

        self.aggregator.unsubscribe(id);
        published.take()
    }

    pub fn aggregator(&self) -> &PeakAggregator<P> {
        &self.aggregator
    }

    pub fn aggregator_mut(&mut self) -> &mut PeakAggregator<P> {
        &mut self.aggregator
    }

    pub fn view(&self) -> Ref<'_, WaveformView> {
        self.view.borrow()
    }

    pub fn view_mut(&mut self) -> RefMut<'_, WaveformView> {
        self.view.borrow_mut()
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn begin_drag(&mut self) -> GestureClaim {
        self.drag.begin(&self.view.borrow())
    }

    pub fn update_drag(&mut self, offset_x: f64) {
        self.drag.update(&mut self.view.borrow_mut(), offset_x);
    }

    pub fn end_drag(&mut self) {
        self.drag.end(&self.view.borrow());
    }

    pub fn on_position_changed(&mut self, handler: impl FnMut(&f64) + 'static) -> ListenerId {
        self.drag.on_position_changed(handler)
    }

    pub fn on_gesture_pressed(&mut self, handler: impl FnMut(&()) + 'static) -> ListenerId {
        self.drag.on_gesture_pressed(handler)
    }
}
