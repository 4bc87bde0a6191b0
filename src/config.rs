//! Compile-time settings shared by the studio.

use std::ops::RangeInclusive;

/// localStorage key holding the JSON encoded history list.
pub const STORAGE_KEY: &str = "qr_generator_history";

/// Edge length of the live preview in CSS pixels.
pub const PREVIEW_SIZE: u32 = 320;

/// Accepted export sizes in pixels.
pub const SIZE_RANGE: RangeInclusive<u32> = 128..=1024;

/// Quiet zone in modules when the margin is enabled.
pub const QUIET_ZONE: i32 = 4;

/// Logo area as a share of the symbol, before scaling by the level's recovery rate.
pub const LOGO_FRACTION: f64 = 0.4;

pub const DEFAULT_FG_COLOR: &str = "#0f172a";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";
pub const DEFAULT_GRADIENT_END: &str = "#3b82f6";
pub const DEFAULT_SIZE: u32 = 1024;
