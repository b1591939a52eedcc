//! # That's It Core Library
//!
//! This library provides the core logic of "That's It", a daily curfew
//! lock: the user picks a cutoff time and a 12-character password, and at
//! the cutoff a blocking overlay covers the screen until the password is
//! typed back. It is a self-imposed nudge, not a security boundary.
//!
//! ## Architecture
//!
//! - **Lock Controller**: a wall-clock-based state machine
//!   (`Configuring → CountingDown → Locked → Configuring`) that requires the
//!   caller to invoke `tick(now)` every frame
//! - **Display helpers**: countdown formatting and urgency coloring
//! - **Boundary**: setup form validation and paste-refusing input fields
//! - **Window policy**: the phase → window flag table front ends apply
//! - **Storage**: TOML-based configuration (no session state is persisted)
//!
//! ## Key Components
//!
//! - [`LockController`]: Core state machine
//! - [`format_remaining`]: Countdown text
//! - [`color_for`]: Urgency color ramp
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod lock;
pub mod setup;
pub mod status;
pub mod storage;
pub mod urgency;
pub mod window_policy;

pub use error::{ConfigError, CoreError, LockError, ValidationError};
pub use events::Event;
pub use format::format_remaining;
pub use lock::{Curfew, LockController, Phase, Schedule, Session};
pub use setup::{SetupForm, TypedField, DEFAULT_CUTOFF, PASSWORD_LENGTH};
pub use status::tray_title;
pub use storage::Config;
pub use urgency::{color_for, Rgb, UrgencyThresholds};
pub use window_policy::{InputCapture, ShortcutOutcome, WindowPolicy};
