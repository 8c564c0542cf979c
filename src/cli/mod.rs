pub mod config;
pub mod init;
pub mod peaks;
pub mod render;
pub mod view;

use scrubwave::config::Config;
use scrubwave::peaks::Peaks;
use scrubwave::pipeline::{DecodePipeline, ReplayPipeline};
use scrubwave::session::Session;
use std::error::Error;
use std::fs::File;
use std::time::{Duration, Instant};

/// Virtual clock step for headless replays
const HEADLESS_STEP: Duration = Duration::from_millis(10);

pub fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    use simplelog::{CombinedLogger, WriteLogger};

    CombinedLogger::init(vec![WriteLogger::new(
        config.log_level_filter()?,
        simplelog::Config::default(),
        File::create(&config.log_file)?,
    )])?;

    Ok(())
}

/// Open `levels` in a fresh session, with the duration defaulting to what the
/// file covers
pub fn open_session(
    levels: &str,
    duration_ms: Option<u64>,
    rate: f64,
) -> Result<Session<ReplayPipeline>, Box<dyn Error>> {
    let mut session = Session::new(ReplayPipeline::new(rate));
    session.open(levels, None)?;

    // Nothing has been pumped yet, so the interim length can still change
    let duration = duration_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| session.aggregator().pipeline().duration());
    session.aggregator_mut().set_duration(Some(duration));
    Ok(session)
}

/// Replay on a virtual clock; returns every publish, the last being the
/// committed array
pub fn run_headless(
    levels: &str,
    duration_ms: Option<u64>,
    rate: f64,
) -> Result<(Session<ReplayPipeline>, Vec<Peaks>), Box<dyn Error>> {
    let mut session = open_session(levels, duration_ms, rate)?;
    let published = session.run_to_end(Instant::now(), HEADLESS_STEP);
    ensure_committed(&session)?;
    Ok((session, published))
}

fn ensure_committed<P: DecodePipeline>(session: &Session<P>) -> Result<(), Box<dyn Error>> {
    if !session.aggregator().is_finished() {
        return Err(format!(
            "{} never reached end of stream; try a higher replay_rate",
            session.aggregator().source().unwrap_or("<unknown>")
        )
        .into());
    }
    Ok(())
}
