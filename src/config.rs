//! Session configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Defaults are the values the hub
//! protocol policy was tuned with.
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::config::{DeviceConfig, DriveConfig, SessionConfig};
//! use duplo_hub::ports::HardwareVariant;
//!
//! // Use defaults
//! let config = SessionConfig::default();
//! assert_eq!(config.variant, HardwareVariant::OLD);
//!
//! // Or customize
//! let config = SessionConfig::default()
//!     .with_connect_timeout_ms(5_000)
//!     .with_drive(DriveConfig::default().with_dead_zone(20))
//!     .with_device(DeviceConfig::default().with_name("Loco"));
//! ```

use heapless::String as HString;

use crate::ports::HardwareVariant;

/// Maximum length for short config strings (device labels)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Session Config
// ============================================================================

/// Complete session configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Hub generation to connect to
    pub variant: HardwareVariant,
    /// How long the connector may scan before giving up
    pub connect_timeout_ms: u32,
    /// Pause after connecting and after each input subscription
    pub settle_ms: u32,
    /// Minimum time between two physical reads
    pub read_interval_ms: u32,
    /// Subscribe the speaker and color sensor right after connecting
    pub subscribe_on_connect: bool,
    /// Drive throttling policy
    pub drive: DriveConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: HardwareVariant::OLD,
            connect_timeout_ms: 10_000,
            settle_ms: 500,
            read_interval_ms: 200,
            subscribe_on_connect: true,
            drive: DriveConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Set the hub generation
    pub fn with_variant(mut self, variant: HardwareVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout_ms(mut self, ms: u32) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    /// Set the settle pause
    pub fn with_settle_ms(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Set the minimum read interval
    pub fn with_read_interval_ms(mut self, ms: u32) -> Self {
        self.read_interval_ms = ms;
        self
    }

    /// Enable or disable subscriptions on connect
    pub fn with_subscribe_on_connect(mut self, enabled: bool) -> Self {
        self.subscribe_on_connect = enabled;
        self
    }

    /// Set drive configuration
    pub fn with_drive(mut self, drive: DriveConfig) -> Self {
        self.drive = drive;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Drive Config
// ============================================================================

/// Drive throttling policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveConfig {
    /// Largest power magnitude sent (1 to 100)
    pub max_power: u8,
    /// Power magnitudes below this are sent as 0
    pub dead_zone: u8,
    /// Changes up to this size are considered "the same" power
    pub change_tolerance: u8,
    /// How long a "same" power is suppressed after the last send
    pub min_interval_ms: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_power: 100,
            dead_zone: 25,
            change_tolerance: 5,
            min_interval_ms: 200,
        }
    }
}

impl DriveConfig {
    /// Set the maximum power, clamped to 1..=100
    pub fn with_max_power(mut self, max: u8) -> Self {
        self.max_power = max.clamp(1, 100);
        self
    }

    /// Set the dead zone
    pub fn with_dead_zone(mut self, dead_zone: u8) -> Self {
        self.dead_zone = dead_zone.min(100);
        self
    }

    /// Set the change tolerance
    pub fn with_change_tolerance(mut self, tolerance: u8) -> Self {
        self.change_tolerance = tolerance;
        self
    }

    /// Set the suppression window
    pub fn with_min_interval_ms(mut self, ms: u32) -> Self {
        self.min_interval_ms = ms;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable label used in log lines
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("duplo-train"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
