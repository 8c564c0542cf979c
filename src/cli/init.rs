use owo_colors::OwoColorize;
use scrubwave::config::Config;
use std::error::Error;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err(
            "scrubwave is already initialized. Use 'scrub config set <key> <value>' to change it."
                .into(),
        );
    }

    let config = Config::new();
    config.save()?;

    println!("{}", "scrubwave initialized successfully!".green());
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );

    Ok(())
}
