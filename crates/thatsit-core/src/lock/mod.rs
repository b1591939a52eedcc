mod controller;
mod schedule;

pub use controller::{Curfew, LockController, Phase, Session};
pub use schedule::Schedule;
