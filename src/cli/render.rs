use scrubwave::config::Config;
use std::error::Error;

pub fn handle_render(
    levels: &str,
    position: f64,
    width: f64,
    height: f64,
) -> Result<(), Box<dyn Error>> {
    if !(0.0..=1.0).contains(&position) {
        return Err(format!("Position must be between 0 and 1, got {position}").into());
    }

    let config = Config::load()?;
    super::init_logging(&config)?;

    let (mut session, _) = super::run_headless(levels, None, 0.0)?;
    session.view_mut().set_position(position);

    let ops = session.view().render(width, height, &config.theme);
    println!("{}", serde_json::to_string_pretty(&ops)?);
    Ok(())
}
