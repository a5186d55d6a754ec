//! Drive-power throttling.
//!
//! This module provides [`DriveThrottle`], which decides for every drive
//! request whether a motor command actually goes out on the wireless link.
//!
//! # Overview
//!
//! Each request goes through the same pipeline:
//! 1. Clamp to `-max_power..=max_power`
//! 2. Powers inside the dead zone become 0 (they only make the motor whine)
//! 3. If the power is within `change_tolerance` of the last sent power and the
//!    last send was less than `min_interval_ms` ago, nothing is sent
//! 4. Otherwise the power is recorded, the timer restarts, and a frame is sent
//!
//! Stopping is just driving at 0, so a stop right after another stop is
//! suppressed like any other near-duplicate.
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::throttle::{DriveDecision, DriveThrottle};
//! use duplo_hub::config::DriveConfig;
//!
//! let mut throttle = DriveThrottle::new(DriveConfig::default(), 0);
//!
//! assert!(matches!(throttle.decide(40, 300), DriveDecision::Send { power: 40, .. }));
//!
//! // Hardly different and too soon: suppressed
//! assert!(matches!(throttle.decide(42, 350), DriveDecision::Suppressed { .. }));
//!
//! // Same change after the window: sent
//! assert!(matches!(throttle.decide(42, 550), DriveDecision::Send { power: 42, .. }));
//! ```

use crate::codec::to_unsigned8;
use crate::config::DriveConfig;

/// Mutable throttle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveState {
    /// Last power actually sent (-100 to 100).
    pub last_power: i8,
    /// Time of the last send, or of session start before the first send.
    pub last_send_ms: u64,
}

impl DriveState {
    /// Fresh state: stopped, timer started at `now_ms`.
    pub const fn new(now_ms: u64) -> Self {
        Self {
            last_power: 0,
            last_send_ms: now_ms,
        }
    }
}

/// Outcome of one drive request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveDecision {
    /// Transmit `value` (the two's complement byte of `power`).
    Send {
        /// Shaped power.
        power: i8,
        /// Byte to put on the wire.
        value: u8,
    },
    /// Nothing to transmit; state unchanged.
    Suppressed {
        /// Shaped power that was not sent.
        power: i8,
    },
}

impl DriveDecision {
    /// Whether a frame should be transmitted.
    pub fn is_send(&self) -> bool {
        matches!(self, DriveDecision::Send { .. })
    }

    /// Shaped power for this request.
    pub fn power(&self) -> i8 {
        match self {
            DriveDecision::Send { power, .. } | DriveDecision::Suppressed { power } => *power,
        }
    }
}

/// Clamp and dead-zone a raw power with the default policy.
///
/// ```
/// use duplo_hub::throttle::clamp_and_deadzone;
///
/// assert_eq!(clamp_and_deadzone(24), 0);
/// assert_eq!(clamp_and_deadzone(-24), 0);
/// assert_eq!(clamp_and_deadzone(25), 25);
/// assert_eq!(clamp_and_deadzone(-500), -100);
/// ```
pub fn clamp_and_deadzone(raw: i32) -> i8 {
    shape_power(&DriveConfig::default(), raw)
}

fn shape_power(config: &DriveConfig, raw: i32) -> i8 {
    let max = i32::from(config.max_power.min(100));
    let p = raw.clamp(-max, max);
    if p.abs() < i32::from(config.dead_zone) {
        0
    } else {
        // In range after the clamp above.
        p as i8
    }
}

/// Rate limiter for motor commands.
///
/// Not thread-safe; the session owning it serializes access.
#[derive(Clone, Debug)]
pub struct DriveThrottle {
    config: DriveConfig,
    state: DriveState,
}

impl DriveThrottle {
    /// Create a throttle whose timer starts at `now_ms`.
    pub fn new(config: DriveConfig, now_ms: u64) -> Self {
        Self {
            config,
            state: DriveState::new(now_ms),
        }
    }

    /// Clamp and dead-zone `raw` with this throttle's policy.
    pub fn shape(&self, raw: i32) -> i8 {
        shape_power(&self.config, raw)
    }

    /// Run one request through the pipeline.
    ///
    /// Updates the state only when the decision is [`DriveDecision::Send`].
    pub fn decide(&mut self, raw: i32, now_ms: u64) -> DriveDecision {
        let power = self.shape(raw);
        let delta = (i16::from(power) - i16::from(self.state.last_power)).unsigned_abs();
        let elapsed = now_ms.saturating_sub(self.state.last_send_ms);

        if delta <= u16::from(self.config.change_tolerance)
            && elapsed < u64::from(self.config.min_interval_ms)
        {
            tracing::trace!(power, elapsed, "drive suppressed");
            return DriveDecision::Suppressed { power };
        }

        self.state.last_power = power;
        self.state.last_send_ms = now_ms;
        DriveDecision::Send {
            power,
            value: to_unsigned8(power),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Last power that was sent.
    pub fn last_power(&self) -> i8 {
        self.state.last_power
    }

    /// Active policy.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> DriveThrottle {
        DriveThrottle::new(DriveConfig::default(), 0)
    }

    // =========================================================================
    // Shaping
    // =========================================================================

    #[test]
    fn dead_zone_zeroes_small_powers() {
        for p in -24..=24 {
            assert_eq!(clamp_and_deadzone(p), 0, "power {p}");
        }
    }

    #[test]
    fn dead_zone_edges_pass_through() {
        assert_eq!(clamp_and_deadzone(25), 25);
        assert_eq!(clamp_and_deadzone(-25), -25);
    }

    #[test]
    fn clamps_to_full_range() {
        assert_eq!(clamp_and_deadzone(101), 100);
        assert_eq!(clamp_and_deadzone(i32::MAX), 100);
        assert_eq!(clamp_and_deadzone(-101), -100);
        assert_eq!(clamp_and_deadzone(i32::MIN), -100);
    }

    #[test]
    fn custom_policy_shaping() {
        let config = DriveConfig::default().with_max_power(60).with_dead_zone(10);
        let throttle = DriveThrottle::new(config, 0);
        assert_eq!(throttle.shape(90), 60);
        assert_eq!(throttle.shape(-90), -60);
        assert_eq!(throttle.shape(9), 0);
        assert_eq!(throttle.shape(10), 10);
    }

    // =========================================================================
    // Suppression
    // =========================================================================

    #[test]
    fn near_duplicate_within_window_is_suppressed() {
        let mut t = throttle();
        assert!(t.decide(40, 1_000).is_send());
        let d = t.decide(42, 1_100);
        assert_eq!(d, DriveDecision::Suppressed { power: 42 });
        assert_eq!(t.last_power(), 40);
        assert_eq!(t.state().last_send_ms, 1_000);
    }

    #[test]
    fn near_duplicate_after_window_is_sent() {
        let mut t = throttle();
        assert!(t.decide(40, 1_000).is_send());
        assert_eq!(
            t.decide(42, 1_250),
            DriveDecision::Send {
                power: 42,
                value: 42
            }
        );
        assert_eq!(t.state(), DriveState { last_power: 42, last_send_ms: 1_250 });
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut t = throttle();
        t.decide(40, 1_000);
        assert!(!t.decide(40, 1_199).is_send());
        assert!(t.decide(40, 1_200).is_send());
    }

    #[test]
    fn tolerance_boundary() {
        let mut t = throttle();
        t.decide(50, 1_000);
        // Exactly 5 away is still "the same"
        assert!(!t.decide(55, 1_010).is_send());
        assert!(!t.decide(45, 1_020).is_send());
        // 6 away is a real change
        assert!(t.decide(56, 1_030).is_send());
    }

    #[test]
    fn meaningful_change_is_sent_immediately() {
        let mut t = throttle();
        t.decide(40, 1_000);
        assert!(t.decide(80, 1_001).is_send());
        assert!(t.decide(-80, 1_002).is_send());
    }

    #[test]
    fn suppressed_does_not_reset_timer() {
        let mut t = throttle();
        t.decide(40, 1_000);
        t.decide(41, 1_150);
        // Still measured from 1_000, not 1_150
        assert!(t.decide(41, 1_200).is_send());
    }

    #[test]
    fn session_start_counts_as_a_send_of_zero() {
        let mut t = DriveThrottle::new(DriveConfig::default(), 5_000);
        // Stop right after start is suppressed
        assert!(!t.decide(0, 5_050).is_send());
        // Small powers land in the dead zone and are also suppressed
        assert!(!t.decide(20, 5_100).is_send());
        // After the window, a stop goes out
        assert!(t.decide(0, 5_200).is_send());
    }

    #[test]
    fn stop_twice_sends_at_most_once() {
        let mut t = throttle();
        t.decide(60, 1_000);
        assert!(t.decide(0, 1_010).is_send());
        assert!(!t.decide(0, 1_011).is_send());
    }

    #[test]
    fn reverse_power_encodes_twos_complement() {
        let mut t = throttle();
        assert_eq!(
            t.decide(-50, 1_000),
            DriveDecision::Send {
                power: -50,
                value: 206
            }
        );
        assert_eq!(
            t.decide(-100, 2_000),
            DriveDecision::Send {
                power: -100,
                value: 156
            }
        );
    }

    #[test]
    fn clock_going_backwards_is_treated_as_no_time() {
        let mut t = throttle();
        t.decide(40, 1_000);
        assert!(!t.decide(40, 900).is_send());
    }
}
