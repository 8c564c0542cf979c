use scrubwave::config::Config;
use std::error::Error;

pub fn handle_peaks(
    levels: &str,
    duration_ms: Option<u64>,
    interim: bool,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    super::init_logging(&config)?;

    let (session, published) = super::run_headless(levels, duration_ms, config.replay_rate)?;

    if interim {
        // run_headless only returns once the final array is committed; it is
        // the last publish and is printed below
        for peaks in published.iter().take(published.len().saturating_sub(1)) {
            println!("{}", serde_json::to_string(peaks)?);
        }
    }

    println!("{}", serde_json::to_string(session.aggregator().peaks())?);
    Ok(())
}
