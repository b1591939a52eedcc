//! Curfew lock controller.
//!
//! The controller is a wall-clock-based state machine with no timer of its
//! own. The caller samples the clock and feeds it to `tick()` on every frame.
//!
//! ## State Transitions
//!
//! ```text
//! Configuring --start--> CountingDown --tick(now >= target)--> Locked
//!      ^                                                          |
//!      +------------------unlock(correct password)----------------+
//! ```
//!
//! There is no way back from `CountingDown` other than through `Locked`.

use std::fmt;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::schedule::Schedule;
use crate::error::LockError;
use crate::events::Event;
use crate::format::format_remaining;
use crate::urgency::{color_for, UrgencyThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Configuring,
    CountingDown,
    Locked,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Configuring => "configuring",
            Phase::CountingDown => "counting down",
            Phase::Locked => "locked",
        })
    }
}

/// An armed curfew: the resolved cutoff instant and the password that lifts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Curfew {
    target: DateTime<Utc>,
    unlock_password: String,
}

impl Curfew {
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Password length in characters, for "n / 12" style counters.
    pub fn password_len(&self) -> usize {
        self.unlock_password.chars().count()
    }

    fn accepts(&self, attempt: &str) -> bool {
        self.unlock_password == attempt
    }
}

impl fmt::Debug for Curfew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curfew")
            .field("target", &self.target)
            .field("unlock_password", &"<redacted>")
            .finish()
    }
}

/// The live session. Replaced as a whole on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Configuring,
    CountingDown(Curfew),
    Locked(Curfew),
}

impl Session {
    pub fn phase(&self) -> Phase {
        match self {
            Session::Configuring => Phase::Configuring,
            Session::CountingDown(_) => Phase::CountingDown,
            Session::Locked(_) => Phase::Locked,
        }
    }

    pub fn curfew(&self) -> Option<&Curfew> {
        match self {
            Session::Configuring => None,
            Session::CountingDown(c) | Session::Locked(c) => Some(c),
        }
    }
}

/// Owns the single session of a process run.
#[derive(Debug, Default)]
pub struct LockController {
    session: Session,
}

impl LockController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.session.curfew().map(Curfew::target)
    }

    pub fn password_len(&self) -> Option<usize> {
        self.session.curfew().map(Curfew::password_len)
    }

    /// Whether quitting or closing must be refused right now.
    pub fn quit_blocked(&self) -> bool {
        self.phase() == Phase::Locked
    }

    /// Time left until the cutoff, never negative.
    ///
    /// `None` while configuring. Derived purely from `now`, so out-of-order
    /// samples can make it go up.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.target()
            .map(|target| (target - now).max(Duration::zero()))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>, thresholds: &UrgencyThresholds) -> Event {
        let remaining = self.remaining(now);
        let counting = self.phase() == Phase::CountingDown;
        Event::StateSnapshot {
            phase: self.phase(),
            target: self.target(),
            remaining_ms: remaining.map(|r| r.num_milliseconds()),
            display: remaining.map(format_remaining),
            color: remaining
                .filter(|_| counting)
                .map(|r| color_for(thresholds.fraction(r)).to_hex()),
            critical: counting && remaining.is_some_and(|r| thresholds.is_critical(r)),
            quit_blocked: self.quit_blocked(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the curfew against the local wall clock.
    pub fn start(
        &mut self,
        schedule: Schedule,
        password: impl Into<String>,
    ) -> Result<&Session, LockError> {
        self.start_at(schedule, password, &Local::now())
    }

    /// Arm the curfew, resolving the cutoff relative to `now` in `now`'s time zone.
    pub fn start_at<Tz: TimeZone>(
        &mut self,
        schedule: Schedule,
        password: impl Into<String>,
        now: &DateTime<Tz>,
    ) -> Result<&Session, LockError> {
        if self.phase() != Phase::Configuring {
            return Err(LockError::InvalidPhase {
                operation: "start",
                phase: self.phase(),
            });
        }
        let unlock_password = password.into();
        if unlock_password.is_empty() {
            return Err(LockError::EmptyPassword);
        }

        let target = schedule.next_occurrence(now).with_timezone(&Utc);
        info!(%schedule, target_at = %target, "curfew armed");
        self.session = Session::CountingDown(Curfew {
            target,
            unlock_password,
        });
        Ok(&self.session)
    }

    /// Call every frame. Moves `CountingDown` to `Locked` once `now` reaches
    /// the target and returns the phase after the check.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Phase {
        if let Session::CountingDown(curfew) = &self.session {
            if now >= curfew.target {
                info!(target_at = %curfew.target, %now, "curfew reached, locking");
                self.session = Session::Locked(curfew.clone());
            }
        }
        self.phase()
    }

    /// Lift the lock. Unlimited attempts; a mismatch leaves the session locked.
    pub fn unlock(&mut self, attempt: &str) -> Result<(), LockError> {
        let Session::Locked(curfew) = &self.session else {
            return Err(LockError::InvalidPhase {
                operation: "unlock",
                phase: self.phase(),
            });
        };
        if !curfew.accepts(attempt) {
            warn!("unlock attempt rejected");
            return Err(LockError::WrongPassword);
        }
        info!("unlocked, back to configuring");
        self.session = Session::Configuring;
        Ok(())
    }
}
