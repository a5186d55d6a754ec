//! Transport collaborator seam.
//!
//! The crate never speaks BLE itself. A platform crate provides a
//! [`HubConnector`] that scans for the hub and hands back a connected
//! [`HubTransport`]; the session only ever writes and reads frames on it.
//!
//! # Implementation Notes
//!
//! - `write` should return once the frame has been handed to the link
//! - `read` returns the next buffered notification, or `Ok(None)` if none is pending
//! - Retries, if any, belong here; the session propagates errors unmodified
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use duplo_hub::traits::HubTransport;
//!
//! struct BleHub { /* peripheral + characteristic */ }
//!
//! impl HubTransport for BleHub {
//!     type Error = btleplug::Error;
//!
//!     fn write(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
//!         // write_without_response on the LWP3 characteristic...
//!         Ok(())
//!     }
//!
//!     fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
//!         // pop from the notification queue...
//!         Ok(None)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Train Base"
//!     }
//! }
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::ports::HardwareVariant;

/// A connected hub link.
pub trait HubTransport {
    /// Error type for link operations.
    type Error: fmt::Debug + fmt::Display;

    /// Send one complete frame.
    fn write(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Take the next inbound frame, if any.
    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Advertised name of the connected hub.
    fn name(&self) -> &str;
}

/// Finds and connects to a hub.
pub trait HubConnector {
    /// Transport produced on success.
    type Transport: HubTransport;
    /// Error type for discovery, including timeouts.
    type Error;

    /// Scan for a hub of the given generation, giving up after `timeout_ms`.
    fn connect(
        &mut self,
        variant: HardwareVariant,
        timeout_ms: u32,
    ) -> Result<Self::Transport, Self::Error>;
}
