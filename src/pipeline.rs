//! Decode pipeline contract and a replaying implementation.
//!
//! The aggregator never decodes audio. It drives something implementing
//! [`DecodePipeline`] and reacts to the two event kinds it produces. The
//! [`ReplayPipeline`] here replays a recorded level file, one dB reading per
//! line, at a chosen multiple of real time.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::constants::{INTERVAL, LEVEL_COMMENT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    /// Instantaneous loudness in decibels
    Level(f64),
    EndOfStream,
}

pub trait DecodePipeline {
    /// Point the pipeline at a new source; leaves it stopped
    fn load(&mut self, uri: &str) -> Result<(), Box<dyn Error>>;
    fn play(&mut self);
    fn stop(&mut self);
    /// Back to the start of the current source, keeping the play state
    fn rewind(&mut self);
    /// Next event available at `now`, if any
    fn poll_event(&mut self, now: Instant) -> Option<PipelineEvent>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelParseError {
    pub line: usize,
    pub content: String,
}

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: '{}' is not a decibel value",
            self.line, self.content
        )
    }
}

impl Error for LevelParseError {}

/// Parse a recorded level file body into dB readings
pub fn parse_levels(text: &str) -> Result<Vec<f64>, LevelParseError> {
    let mut levels = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split(LEVEL_COMMENT).next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let value = match line.to_ascii_lowercase().as_str() {
            "-inf" => f64::NEG_INFINITY,
            other => other.parse::<f64>().map_err(|_| LevelParseError {
                line: idx + 1,
                content: line.to_string(),
            })?,
        };

        if value.is_nan() {
            return Err(LevelParseError {
                line: idx + 1,
                content: line.to_string(),
            });
        }
        levels.push(value);
    }

    Ok(levels)
}

/// Replays recorded levels, one every `INTERVAL / rate` of wall time
#[derive(Debug)]
pub struct ReplayPipeline {
    levels: Vec<f64>,
    cursor: usize,
    rate: f64,
    playing_since: Option<Instant>,
    ended: bool,
}

impl ReplayPipeline {
    /// `rate` of 0 releases every sample as soon as it is polled
    pub fn new(rate: f64) -> Self {
        Self {
            levels: Vec::new(),
            cursor: 0,
            rate: rate.max(0.0),
            playing_since: None,
            ended: false,
        }
    }

    pub fn from_levels(levels: Vec<f64>, rate: f64) -> Self {
        let mut pipeline = Self::new(rate);
        pipeline.levels = levels;
        pipeline
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Pipeline time the loaded levels cover
    pub fn duration(&self) -> Duration {
        INTERVAL * self.levels.len() as u32
    }

    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    /// True once end of stream has been emitted for the current source
    pub fn is_finished(&self) -> bool {
        self.ended
    }

    /// Wall time from play start to sample `index`; `None` when it lies
    /// beyond what `Duration` can hold, so the sample is never due
    fn offset_of(&self, index: usize) -> Option<Duration> {
        if self.rate == 0.0 {
            return Some(Duration::ZERO);
        }
        Duration::try_from_secs_f64(INTERVAL.as_secs_f64() * index as f64 / self.rate).ok()
    }

    fn is_due(&self, start: Instant, index: usize, now: Instant) -> bool {
        self.offset_of(index)
            .and_then(|offset| start.checked_add(offset))
            .is_some_and(|due| now >= due)
    }
}

impl DecodePipeline for ReplayPipeline {
    fn load(&mut self, uri: &str) -> Result<(), Box<dyn Error>> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let text = fs::read_to_string(Path::new(path))
            .map_err(|e| format!("Unable to read levels from {path}: {e}"))?;
        self.levels = parse_levels(&text)?;
        self.stop();
        self.cursor = 0;
        self.ended = false;
        log::debug!("Loaded {} level samples from {path}", self.levels.len());
        Ok(())
    }

    fn play(&mut self) {
        if self.playing_since.is_none() {
            // Resume so that the sample at `cursor` is due right away
            let now = Instant::now();
            let start = self
                .offset_of(self.cursor)
                .and_then(|offset| now.checked_sub(offset))
                .unwrap_or(now);
            self.playing_since = Some(start);
        }
    }

    fn stop(&mut self) {
        self.playing_since = None;
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.ended = false;
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn poll_event(&mut self, now: Instant) -> Option<PipelineEvent> {
        let start = self.playing_since?;
        if self.ended {
            return None;
        }

        if let Some(&level) = self.levels.get(self.cursor) {
            if !self.is_due(start, self.cursor, now) {
                return None;
            }
            self.cursor += 1;
            return Some(PipelineEvent::Level(level));
        }

        if !self.is_due(start, self.cursor, now) {
            return None;
        }
        self.ended = true;
        Some(PipelineEvent::EndOfStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn drain(pipeline: &mut ReplayPipeline, now: Instant) -> Vec<PipelineEvent> {
        std::iter::from_fn(|| pipeline.poll_event(now)).collect()
    }

    #[test]
    fn test_parse_levels_skips_comments_and_blanks() {
        let text = "# recorded levels\n-20\n\n  -6.0  # loud\n0\n-inf\n";
        let levels = parse_levels(text).unwrap();
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[0], -20.0);
        assert_eq!(levels[1], -6.0);
        assert_eq!(levels[2], 0.0);
        assert!(levels[3].is_infinite());
    }

    #[test]
    fn test_parse_levels_reports_line() {
        let err = parse_levels("-20\nloud\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.content, "loud");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_levels_rejects_nan() {
        assert!(parse_levels("NaN\n").is_err());
    }

    #[test]
    fn test_stopped_pipeline_emits_nothing() {
        let mut pipeline = ReplayPipeline::from_levels(vec![-20.0], 0.0);
        assert_eq!(pipeline.poll_event(Instant::now()), None);
    }

    #[test]
    fn test_unthrottled_replay_emits_all_then_end() {
        let mut pipeline = ReplayPipeline::from_levels(vec![-20.0, -6.0], 0.0);
        pipeline.play();
        let events = drain(&mut pipeline, Instant::now());
        assert_eq!(
            events,
            vec![
                PipelineEvent::Level(-20.0),
                PipelineEvent::Level(-6.0),
                PipelineEvent::EndOfStream,
            ]
        );
        // End of stream fires once
        assert_eq!(pipeline.poll_event(Instant::now()), None);
        assert!(pipeline.is_finished());
    }

    #[test]
    fn test_real_time_replay_paces_samples() {
        let mut pipeline = ReplayPipeline::from_levels(vec![-20.0, -6.0, 0.0], 1.0);
        pipeline.play();
        let start = pipeline.playing_since.unwrap();

        assert_eq!(drain(&mut pipeline, start), vec![PipelineEvent::Level(-20.0)]);
        assert_eq!(
            drain(&mut pipeline, start + Duration::from_millis(150)),
            vec![PipelineEvent::Level(-6.0)]
        );
        assert_eq!(
            drain(&mut pipeline, start + Duration::from_millis(300)),
            vec![PipelineEvent::Level(0.0), PipelineEvent::EndOfStream]
        );
    }

    #[test]
    fn test_tiny_rate_holds_later_samples_back() {
        let mut pipeline = ReplayPipeline::from_levels(vec![-20.0, -6.0], 1e-300);
        pipeline.play();
        let start = pipeline.playing_since.unwrap();

        assert_eq!(drain(&mut pipeline, start), vec![PipelineEvent::Level(-20.0)]);
        let much_later = start + Duration::from_secs(86_400 * 365);
        assert!(drain(&mut pipeline, much_later).is_empty());
        assert!(!pipeline.is_finished());

        // Resuming past the first sample must not overflow either
        pipeline.stop();
        pipeline.play();
        assert!(drain(&mut pipeline, Instant::now()).is_empty());
    }

    #[test]
    fn test_rewind_replays_from_start() {
        let mut pipeline = ReplayPipeline::from_levels(vec![-20.0], 0.0);
        pipeline.play();
        drain(&mut pipeline, Instant::now());
        pipeline.rewind();
        let events = drain(&mut pipeline, Instant::now());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "-20\n-6\n0").unwrap();

        let mut pipeline = ReplayPipeline::new(0.0);
        pipeline.load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(pipeline.levels(), &[-20.0, -6.0, 0.0]);
        assert_eq!(pipeline.duration(), Duration::from_millis(300));
        assert!(!pipeline.is_playing());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut pipeline = ReplayPipeline::new(0.0);
        assert!(pipeline.load("/nonexistent/levels.txt").is_err());
    }
}
