//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `system`: Wall-clock time and thread sleep (requires `std` feature)
//!
//! BLE transports live outside this crate; implement
//! [`HubConnector`](crate::traits::HubConnector) for your platform's stack.

pub mod mock;

#[cfg(feature = "std")]
pub mod system;

pub use mock::*;

#[cfg(feature = "std")]
pub use system::*;
