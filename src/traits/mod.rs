//! Trait definitions for the transport and time seams.
//!
//! This module defines the abstractions that let duplo-hub:
//! - Run against any BLE stack (or none, in tests)
//! - Rate-limit against an injected time source
//!
//! # Submodules
//!
//! - `transport`: [`HubConnector`] and [`HubTransport`]
//! - `hardware`: [`Clock`] and [`Sleep`]

pub mod hardware;
pub mod transport;

pub use hardware::*;
pub use transport::*;
