use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lock::Phase;

/// Every state change in the system produces an Event.
/// The front end logs them and prints them for scripting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        cutoff: String,
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    Locked {
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Wrong password typed on the lock screen. Attempts are unlimited.
    UnlockFailed {
        at: DateTime<Utc>,
    },
    Unlocked {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        target: Option<DateTime<Utc>>,
        remaining_ms: Option<i64>,
        display: Option<String>,
        /// `#rrggbb`, only while counting down.
        color: Option<String>,
        critical: bool,
        quit_blocked: bool,
        at: DateTime<Utc>,
    },
}
