//! Streaming peak aggregation.
//!
//! A [`PeakAggregator`] drives a decode pipeline over one source and turns its
//! level readings into linear peaks, one per `INTERVAL` of pipeline time.
//! While decoding it publishes an interim array padded with zeros to the full
//! duration-derived length, throttled so a fast pipeline cannot flood
//! subscribers. At end of stream it commits the exact, unpadded array.

use serde::{Serialize, Serializer};
use std::error::Error;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::constants::{INTERVAL, PUBLISH_WINDOW};
use crate::pipeline::{DecodePipeline, PipelineEvent};
use crate::signal::{ListenerId, Property};
use crate::throttle::Throttle;

/// An immutable peak sequence; publishing replaces it wholesale
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks(Arc<[f64]>);

impl Peaks {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for Peaks {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Peaks {
    fn from(values: Vec<f64>) -> Self {
        Self(values.into())
    }
}

impl From<&[f64]> for Peaks {
    fn from(values: &[f64]) -> Self {
        Self(values.into())
    }
}

impl Serialize for Peaks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Convert a decibel reading to linear amplitude
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Number of `INTERVAL` buckets a track of `duration` spans, if known
pub fn interim_len(duration: Option<Duration>) -> Option<usize> {
    let duration = duration.filter(|d| !d.is_zero())?;
    Some(duration.as_nanos().div_ceil(INTERVAL.as_nanos()) as usize)
}

pub struct PeakAggregator<P: DecodePipeline> {
    pipeline: P,
    source: Option<String>,
    duration: Option<Duration>,
    started: bool,
    finished: bool,
    buffer: Vec<f64>,
    throttle: Throttle<Peaks>,
    peaks: Property<Peaks>,
}

impl<P: DecodePipeline> PeakAggregator<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            source: None,
            duration: None,
            started: false,
            finished: false,
            buffer: Vec::new(),
            throttle: Throttle::new(PUBLISH_WINDOW),
            peaks: Property::new(Peaks::empty()),
        }
    }

    /// Reset and begin a session over `uri`; a zero or unknown duration
    /// suppresses interim publishes
    pub fn start(&mut self, uri: &str, duration: Option<Duration>) -> Result<(), Box<dyn Error>> {
        self.pipeline.stop();
        self.restart();
        self.source = Some(uri.to_string());
        self.duration = duration;
        self.pipeline.load(uri)?;
        self.pipeline.play();
        log::debug!(
            "Peak session started for {uri}, expecting {:?} peaks",
            interim_len(duration)
        );
        Ok(())
    }

    /// Mark the session started and clear both the buffer and the published
    /// peaks; the next sample begins a fresh accumulation
    pub fn restart(&mut self) {
        self.started = true;
        self.finished = false;
        self.buffer.clear();
        self.throttle.cancel();
        self.pipeline.rewind();
        self.peaks.set(Peaks::empty());
    }

    /// The interim length is fixed by whatever duration is current at each
    /// publish, so change this only between sessions
    pub fn set_duration(&mut self, duration: Option<Duration>) {
        self.duration = duration;
    }

    pub fn handle(&mut self, now: Instant, event: PipelineEvent) {
        match event {
            PipelineEvent::Level(db) => self.on_level(now, db),
            PipelineEvent::EndOfStream => self.on_end_of_stream(),
        }
    }

    /// Drain every event the pipeline has ready, then flush a due trailing publish
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(event) = self.pipeline.poll_event(now) {
            self.handle(now, event);
            handled += 1;
        }
        let peaks = &mut self.peaks;
        self.throttle.poll(now, |interim| peaks.set(interim));
        handled
    }

    fn on_level(&mut self, now: Instant, db: f64) {
        self.buffer.push(db_to_linear(db));

        let Some(len) = interim_len(self.duration) else {
            return;
        };

        let mut interim = Vec::with_capacity(len.max(self.buffer.len()));
        interim.extend_from_slice(&self.buffer);
        if interim.len() < len {
            interim.resize(len, 0.0);
        }

        let peaks = &mut self.peaks;
        self.throttle
            .call(now, Peaks::from(interim), |interim| peaks.set(interim));
    }

    fn on_end_of_stream(&mut self) {
        // A trailing interim publish must not outlive the stream
        self.throttle.cancel();
        if self.started {
            log::info!(
                "Committing {} peaks for {}",
                self.buffer.len(),
                self.source.as_deref().unwrap_or("<unknown>")
            );
            self.peaks.set(Peaks::from(self.buffer.as_slice()));
        } else {
            log::debug!("End of stream outside a started session, discarding buffer");
        }
        self.buffer.clear();
        self.finished = true;
    }

    pub fn peaks(&self) -> &Peaks {
        self.peaks.get()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Peaks) + 'static) -> ListenerId {
        self.peaks.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.peaks.unsubscribe(id)
    }

    pub fn sample_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once end of stream arrived for the current session
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// When a coalesced interim publish is due, for sizing the host's wait
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut P {
        &mut self.pipeline
    }
}
