use scrubwave::config::Config;
use std::error::Error;
use std::process::Command;

fn color_or_default(color: Option<scrubwave::theme::Color>) -> String {
    color
        .map(|c| c.to_string())
        .unwrap_or_else(|| "(foreground)".to_string())
}

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current scrubwave configuration:");
    println!("  log_file: {}", config.log_file);
    println!("  log_level: {}", config.log_level);
    println!("  replay_rate: {}", config.replay_rate);
    println!("  theme.foreground: {}", color_or_default(config.theme.foreground));
    println!("  theme.dimmed: {}", color_or_default(config.theme.dimmed));
    println!("  theme.accent: {}", color_or_default(config.theme.accent));
    println!("  theme.high_contrast: {}", config.theme.high_contrast);

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        return Err("scrubwave not initialized. Run 'scrub init' first.".into());
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    // Validate the config after editing
    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
