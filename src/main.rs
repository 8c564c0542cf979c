//! scrubwave - streaming waveform peaks with a scrubbable terminal view.
//!
//! The `scrub` binary replays recorded loudness levels through the peak
//! aggregator and either prints the resulting peaks, prints a render pass as
//! draw instructions, or opens an interactive viewer where dragging on the
//! waveform with the mouse scrubs the playback position.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;

use scrubwave::config::CONFIG_KEYS;

mod cli;

#[cfg(feature = "viewer")]
mod viewer;

#[derive(Parser)]
#[command(name = "scrub")]
#[command(about = "Streaming waveform peaks and a scrubbable waveform view")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Aggregate a level file and print the committed peaks as JSON
    Peaks {
        /// File with one dB reading per line
        levels: String,
        /// Track duration in milliseconds (defaults to the level count)
        #[arg(short, long)]
        duration_ms: Option<u64>,
        /// Print every interim publish as well, one JSON array per line
        #[arg(short, long)]
        interim: bool,
    },
    /// Print one render pass as JSON draw instructions
    Render {
        /// File with one dB reading per line
        levels: String,
        /// Playback position between 0 and 1
        #[arg(short, long, default_value_t = 0.0)]
        position: f64,
        #[arg(long, default_value_t = 200.0)]
        width: f64,
        #[arg(long, default_value_t = 80.0)]
        height: f64,
    },
    /// Open the interactive waveform viewer
    View {
        /// File with one dB reading per line
        levels: String,
        /// Track duration in milliseconds (defaults to the level count)
        #[arg(short, long)]
        duration_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(CONFIG_KEYS.iter().copied()))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Peaks {
            levels,
            duration_ms,
            interim,
        } => {
            cli::peaks::handle_peaks(&levels, duration_ms, interim)?;
        }
        Commands::Render {
            levels,
            position,
            width,
            height,
        } => {
            cli::render::handle_render(&levels, position, width, height)?;
        }
        Commands::View {
            levels,
            duration_ms,
        } => {
            cli::view::handle_view(&levels, duration_ms)?;
        }
    }

    Ok(())
}
