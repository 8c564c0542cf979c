pub mod config;
pub mod constants;
pub mod drag;
pub mod peaks;
pub mod pipeline;
pub mod session;
pub mod signal;
pub mod theme;
pub mod throttle;
pub mod waveform;
