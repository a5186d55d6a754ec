//! # duplo-hub
//!
//! A controller for the LEGO DUPLO train hub, speaking the LEGO Wireless
//! Protocol over a pluggable Bluetooth LE transport.
//!
//! ## Features
//!
//! - **Port registry**: Logical devices (motor, lights, speaker, color sensor) mapped to physical ports per hub generation
//! - **Frame codec**: Bit-exact output commands, input subscriptions, and value report decoding
//! - **Drive throttling**: Dead zone plus change/interval suppression so the link isn't flooded
//! - **Color classification**: Track-tile colors matched from raw sensor readings
//! - **Lenient adapter**: Log-and-continue calls for block-based front ends
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Transport and time abstractions
//! - `ports` - Port registry and hub generations
//! - `codec` - Frame encoding and decoding
//! - `throttle` - Drive power shaping and rate limiting
//! - `session` - `TrainSession`, which ties everything together
//! - `adapter` - Error-swallowing calls over the `TrainControl` trait
//! - `hal` - Concrete implementations (mock for testing, system clock on `std`)
//!
//! ## Example
//!
//! ```rust
//! use duplo_hub::{
//!     HubCatalog, LightColor, SessionConfig, TrainSession,
//!     hal::{MockClock, MockConnector, MockSleep, MockTransport},
//! };
//!
//! let clock = MockClock::new();
//! let mut connector = MockConnector::new(MockTransport::new());
//!
//! // Connect and subscribe to the speaker and color sensor
//! let mut train = TrainSession::connect(
//!     &mut connector,
//!     HubCatalog::standard(),
//!     SessionConfig::default(),
//!     clock.clone(),
//!     &mut MockSleep::with_clock(clock.clone()),
//! )
//! .unwrap();
//!
//! train.set_light(LightColor::Green).unwrap();
//! train.play_sound("depart").unwrap();
//! train.drive(50).unwrap();
//!
//! // A near-identical request right away goes nowhere
//! assert!(!train.drive(52).unwrap().is_send());
//!
//! train.stop().unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Call adapter for non-programmatic front ends.
pub mod adapter;
/// Bundle of the lookup tables a session reads from.
pub mod catalog;
/// LWP3 frame encoding and decoding.
pub mod codec;
/// Sensor color table and light palette.
pub mod color;
/// Port and mode probing sweeps.
pub mod diagnostics;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Logical device roles and per-generation port layouts.
pub mod ports;
/// The train session.
pub mod session;
/// Speaker sound table.
pub mod sounds;
/// Drive power shaping and rate limiting.
pub mod throttle;
/// Core traits for the transport and time sources.
pub mod traits;

/// Session configuration.
pub mod config;

/// Thread-safe session sharing (requires `std`).
#[cfg(feature = "std")]
pub mod services;

// Re-exports for convenience
pub use adapter::TrainControl;
pub use catalog::HubCatalog;
pub use codec::{Frame, ParsedFrame, RgbSample};
pub use color::{ColorEntry, ColorTable, LightColor};
pub use ports::{HardwareVariant, PortMap, PortRegistry, PortRole, RegistryError};
pub use session::{ConnectError, PortReport, SessionError, TrainSession};
pub use sounds::SoundTable;
pub use throttle::{DriveDecision, DriveState, DriveThrottle};
pub use traits::{
    // Time
    Clock,
    // Transport
    HubConnector,
    HubTransport,
    Sleep,
};

// Config re-exports
pub use config::{DeviceConfig, DriveConfig, SessionConfig};

#[cfg(feature = "std")]
pub use services::SharedSession;
