//! Call adapter for non-programmatic callers.
//!
//! Block-based or scripted front ends hand over loosely typed arguments and
//! expect a train call never to fail loudly. The free functions here forward
//! to any [`TrainControl`] implementor, log what went wrong, and carry on.
//!
//! ```rust
//! use duplo_hub::{adapter, HubCatalog, SessionConfig, TrainSession};
//! use duplo_hub::hal::{MockClock, MockTransport};
//!
//! let clock = MockClock::new();
//! let mut train = TrainSession::new(
//!     MockTransport::new(),
//!     HubCatalog::standard(),
//!     SessionConfig::default(),
//!     clock.clone(),
//! )
//! .unwrap();
//!
//! adapter::set_light(&mut train, "purple"); // unknown: logged, nothing sent
//! adapter::play_sound(&mut train, "moo");   // invalid: logged, nothing sent
//! adapter::set_light(&mut train, "yellow");
//! assert_eq!(train.transport().written.len(), 1);
//! ```

use alloc::vec::Vec;
use core::fmt::Display;

use crate::codec::HexBytes;
use crate::session::{PortReport, SessionError, TrainSession};
use crate::traits::{Clock, HubTransport};

/// What a front end can ask of a train.
pub trait TrainControl {
    /// Error type for failed calls.
    type Error: Display;

    /// Drive at `power` (-100 to 100). `Ok(true)` if a frame was sent.
    fn drive(&mut self, power: i32) -> Result<bool, Self::Error>;

    /// Set the light by color name. `Ok(false)` for an unknown name.
    fn set_light(&mut self, color: &str) -> Result<bool, Self::Error>;

    /// Play a sound by name or index.
    fn play_sound(&mut self, sound: &str) -> Result<(), Self::Error>;

    /// Read one raw frame, subject to the read interval.
    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Label a raw frame.
    fn describe(&self, frame: &[u8]) -> Option<PortReport>;

    /// Read and classify the color under the train.
    fn get_color(&mut self, updatelight: bool) -> Result<Option<&'static str>, Self::Error>;
}

impl<T: HubTransport, C: Clock> TrainControl for TrainSession<T, C> {
    type Error = SessionError<T::Error>;

    fn drive(&mut self, power: i32) -> Result<bool, Self::Error> {
        TrainSession::drive(self, power).map(|d| d.is_send())
    }

    fn set_light(&mut self, color: &str) -> Result<bool, Self::Error> {
        self.set_light_named(color).map(|f| f.is_some())
    }

    fn play_sound(&mut self, sound: &str) -> Result<(), Self::Error> {
        TrainSession::play_sound(self, sound).map(|_| ())
    }

    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        self.read_raw()
    }

    fn describe(&self, frame: &[u8]) -> Option<PortReport> {
        TrainSession::describe(self, frame)
    }

    fn get_color(&mut self, updatelight: bool) -> Result<Option<&'static str>, Self::Error> {
        TrainSession::get_color(self, updatelight).map(|e| e.map(|entry| entry.name))
    }
}

/// Drive the train; failures are logged.
pub fn drive<R: TrainControl + ?Sized>(train: &mut R, power: i32) {
    if let Err(e) = train.drive(power) {
        tracing::warn!(power, error = %e, "drive failed");
    }
}

/// Stop the train; failures are logged.
pub fn stop<R: TrainControl + ?Sized>(train: &mut R) {
    drive(train, 0);
}

/// Set the light by name; unknown names and failures are logged.
pub fn set_light<R: TrainControl + ?Sized>(train: &mut R, color: &str) {
    if let Err(e) = train.set_light(color) {
        tracing::warn!(color, error = %e, "set_light failed");
    }
}

/// Play a sound by name or index; failures are logged.
pub fn play_sound<R: TrainControl + ?Sized>(train: &mut R, sound: &str) {
    if let Err(e) = train.play_sound(sound) {
        tracing::warn!(sound, error = %e, "play_sound failed");
    }
}

/// Read one frame and log it with a label for its port.
///
/// `None` when nothing was read (or the read failed).
pub fn read<R: TrainControl + ?Sized>(train: &mut R) -> Option<PortReport> {
    let frame = match train.read() {
        Ok(Some(frame)) => frame,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "read failed");
            return None;
        }
    };

    let report = train.describe(&frame);
    match report {
        Some(PortReport::Color(rgb)) => tracing::info!(
            frame = %HexBytes(&frame),
            red = rgb.red,
            green = rgb.green,
            blue = rgb.blue,
            "color sensor"
        ),
        Some(PortReport::Device(role)) => {
            tracing::info!(frame = %HexBytes(&frame), port = role.as_str(), "port value")
        }
        Some(PortReport::Unknown(port)) => {
            tracing::info!(frame = %HexBytes(&frame), port, "other port")
        }
        None => tracing::info!(frame = %HexBytes(&frame), "not a port value"),
    }
    report
}

/// Name of the color under the train, if any; failures are logged.
pub fn get_color<R: TrainControl + ?Sized>(train: &mut R, updatelight: bool) -> Option<&'static str> {
    match train.get_color(updatelight) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!(error = %e, "get_color failed");
            None
        }
    }
}
