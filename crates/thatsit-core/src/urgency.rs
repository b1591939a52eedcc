//! Urgency coloring for the countdown widget.
//!
//! Maps "fraction of the urgency window left" onto a red → yellow → green
//! ramp with two linear segments meeting at 0.5.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default urgency window: color only changes inside the last 10 minutes.
pub const DEFAULT_URGENCY_WINDOW_SECS: u64 = 10 * 60;
/// Default critical threshold: the widget pulses inside the last minute.
pub const DEFAULT_CRITICAL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

pub const RED: Rgb = Rgb::new(239, 68, 68);
pub const YELLOW: Rgb = Rgb::new(234, 179, 8);
pub const GREEN: Rgb = Rgb::new(34, 197, 94);

/// Color for a fraction in `[0, 1]`; out-of-range values are clamped and
/// NaN counts as 0.
pub fn color_for(fraction: f64) -> Rgb {
    let p = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };

    if p > 0.5 {
        blend(YELLOW, GREEN, (p - 0.5) * 2.0)
    } else {
        blend(RED, YELLOW, p * 2.0)
    }
}

fn blend(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(lerp(from.r, to.r, t), lerp(from.g, to.g, t), lerp(from.b, to.b, t))
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let a = f64::from(a);
    let b = f64::from(b);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

/// When the countdown starts signalling urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyThresholds {
    pub window: Duration,
    pub critical: Duration,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            window: Duration::seconds(DEFAULT_URGENCY_WINDOW_SECS as i64),
            critical: Duration::seconds(DEFAULT_CRITICAL_SECS as i64),
        }
    }
}

impl UrgencyThresholds {
    /// Remaining time as a fraction of the window, pinned to 1.0 outside it.
    pub fn fraction(&self, remaining: Duration) -> f64 {
        if remaining > self.window || self.window <= Duration::zero() {
            return 1.0;
        }
        let ratio = remaining.num_milliseconds() as f64 / self.window.num_milliseconds() as f64;
        ratio.max(0.0)
    }

    pub fn is_critical(&self, remaining: Duration) -> bool {
        remaining < self.critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn anchors() {
        assert_eq!(color_for(1.0), GREEN);
        assert_eq!(color_for(0.5), YELLOW);
        assert_eq!(color_for(0.0), RED);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(color_for(7.0), GREEN);
        assert_eq!(color_for(-0.3), RED);
        assert_eq!(color_for(f64::INFINITY), GREEN);
        assert_eq!(color_for(f64::NAN), RED);
    }

    #[test]
    fn quarter_points_round_per_channel() {
        // Red -> Yellow at t = 0.5: (236.5, 123.5, 38) rounds half away from zero.
        assert_eq!(color_for(0.25), Rgb::new(237, 124, 38));
        // Yellow -> Green at t = 0.5: (134, 188, 51).
        assert_eq!(color_for(0.75), Rgb::new(134, 188, 51));
    }

    #[test]
    fn display_formats() {
        assert_eq!(GREEN.to_string(), "rgb(34, 197, 94)");
        assert_eq!(RED.to_hex(), "#ef4444");
    }

    #[test]
    fn fraction_is_pinned_outside_window() {
        let t = UrgencyThresholds::default();
        assert_eq!(t.fraction(Duration::hours(3)), 1.0);
        assert_eq!(t.fraction(Duration::minutes(10)), 1.0);
        assert_eq!(t.fraction(Duration::minutes(5)), 0.5);
        assert_eq!(t.fraction(Duration::zero()), 0.0);
        assert_eq!(t.fraction(Duration::seconds(-4)), 0.0);
    }

    #[test]
    fn critical_inside_last_minute() {
        let t = UrgencyThresholds::default();
        assert!(t.is_critical(Duration::seconds(59)));
        assert!(!t.is_critical(Duration::seconds(60)));
    }

    fn between(v: u8, a: u8, b: u8) -> bool {
        v >= a.min(b) && v <= a.max(b)
    }

    proptest! {
        #[test]
        fn lower_segment_stays_between_red_and_yellow(p in 0.0f64..=0.5) {
            let c = color_for(p);
            prop_assert!(between(c.r, RED.r, YELLOW.r));
            prop_assert!(between(c.g, RED.g, YELLOW.g));
            prop_assert!(between(c.b, RED.b, YELLOW.b));
        }

        #[test]
        fn upper_segment_stays_between_yellow_and_green(p in 0.5f64..=1.0) {
            let c = color_for(p);
            prop_assert!(between(c.r, YELLOW.r, GREEN.r));
            prop_assert!(between(c.g, YELLOW.g, GREEN.g));
            prop_assert!(between(c.b, YELLOW.b, GREEN.b));
        }

        #[test]
        fn continuous_across_midpoint(eps in 0.0f64..1e-6) {
            let below = color_for(0.5 - eps);
            let above = color_for(0.5 + eps);
            prop_assert!((i16::from(below.r) - i16::from(above.r)).abs() <= 1);
            prop_assert!((i16::from(below.g) - i16::from(above.g)).abs() <= 1);
            prop_assert!((i16::from(below.b) - i16::from(above.b)).abs() <= 1);
        }
    }
}
