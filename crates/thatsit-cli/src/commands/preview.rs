use chrono::Duration;
use thatsit_core::{color_for, format_remaining, Config};

pub fn run(remaining_ms: i64) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let thresholds = config.countdown.thresholds();
    let remaining =
        Duration::try_milliseconds(remaining_ms).ok_or("remaining_ms is out of range")?;

    let fraction = thresholds.fraction(remaining);
    let color = color_for(fraction);
    let out = serde_json::json!({
        "display": format_remaining(remaining),
        "fraction": fraction,
        "color": color.to_hex(),
        "rgb": color.to_string(),
        "critical": thresholds.is_critical(remaining),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
