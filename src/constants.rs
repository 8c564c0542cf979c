//! Project-wide constants used across multiple modules.
//!
//! `INTERVAL` and `GUTTER` are part of the observable contract: the first fixes
//! how many peaks a track of a given duration produces, the second fixes the
//! pixel spacing that both rendering and drag math are expressed in.

use std::time::Duration;

/// Width of one peak bucket in pipeline time
pub const INTERVAL: Duration = Duration::from_millis(100);

/// Pixel spacing between adjacent peak bars
pub const GUTTER: f64 = 4.0;

/// Window of the interim peak publish throttle
pub const PUBLISH_WINDOW: Duration = Duration::from_millis(100);

/// Stroke width of a peak bar
pub const BAR_WIDTH: f64 = 2.0;

/// Stroke width of the playback divider
pub const DIVIDER_WIDTH: f64 = 1.0;

/// Comment prefix in recorded level files
pub const LEVEL_COMMENT: char = '#';
