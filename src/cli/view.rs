use std::error::Error;

pub fn handle_view(levels: &str, duration_ms: Option<u64>) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "viewer")]
    {
        crate::viewer::run(levels, duration_ms)
    }

    #[cfg(not(feature = "viewer"))]
    {
        let _ = levels;
        let _ = duration_ms;
        use owo_colors::OwoColorize;
        println!("{} {}", "〰".cyan(), "Waveform Viewer".bold());
        println!();
        println!(
            "{} The viewer requires the 'viewer' feature to be enabled.",
            "Note:".yellow()
        );
        println!();
        println!("To enable it, install with:");
        println!("  {}", "cargo install scrubwave --features viewer".cyan());
        println!();
        println!("Or if building from source:");
        println!("  {}", "cargo build --release --features viewer".cyan());

        Ok(())
    }
}
