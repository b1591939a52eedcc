//! Countdown display formatting.

use chrono::Duration;

/// Shown once the countdown has run out.
pub const ZERO_DISPLAY: &str = "00:00";

/// Render a remaining duration for the countdown widget.
///
/// Precision is two-tier: `HH:MM` while an hour or more is left (seconds
/// dropped), `MM:SS` below that. Sub-second remainders are truncated.
pub fn format_remaining(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        return ZERO_DISPLAY.to_string();
    }

    let total_seconds = remaining.num_seconds();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
