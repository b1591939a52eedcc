use chrono::{DateTime, FixedOffset, Local, Utc};
use thatsit_core::{Config, LockController, Schedule};

/// Never checked: `target` only arms the controller to read back its state.
const DRY_RUN_PASSWORD: &str = "dry-run";

pub fn run(cutoff: &str, now: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let schedule: Schedule = cutoff.parse()?;
    let now: DateTime<FixedOffset> = match now {
        Some(s) => DateTime::parse_from_rfc3339(s)?,
        None => Local::now().fixed_offset(),
    };

    let mut controller = LockController::new();
    controller.start_at(schedule, DRY_RUN_PASSWORD, &now)?;
    let snapshot = controller.snapshot(now.with_timezone(&Utc), &config.countdown.thresholds());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
