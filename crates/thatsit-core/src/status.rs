//! Tray / status indicator text.

use chrono::Duration;

use crate::format::format_remaining;
use crate::lock::Phase;

pub const APP_TITLE: &str = "That's It";
pub const LOCK_GLYPH: &str = "🔒";

/// Title for the tray icon or terminal window, refreshed every tick.
pub fn tray_title(phase: Phase, remaining: Option<Duration>) -> String {
    match phase {
        Phase::Configuring => APP_TITLE.to_string(),
        Phase::CountingDown => format_remaining(remaining.unwrap_or_else(Duration::zero)),
        Phase::Locked => LOCK_GLYPH.to_string(),
    }
}
