//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the transport and time traits,
//! enabling development and testing on desktop without a hub in range.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockTransport`] | [`HubTransport`] | Records written frames, replays queued reads |
//! | [`MockConnector`] | [`HubConnector`] | Hands out a prepared transport, or fails |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockSleep`] | [`Sleep`] | Records pauses, optionally advancing a clock |
//!
//! # Example
//!
//! ```rust
//! use duplo_hub::{HubCatalog, SessionConfig, TrainSession};
//! use duplo_hub::hal::{MockClock, MockTransport};
//!
//! let clock = MockClock::new();
//! let mut session = TrainSession::new(
//!     MockTransport::new(),
//!     HubCatalog::standard(),
//!     SessionConfig::default(),
//!     clock.clone(),
//! )
//! .unwrap();
//!
//! clock.advance(1_000);
//! session.drive(50).unwrap();
//!
//! // Verify via the recorded frames
//! assert_eq!(
//!     session.transport().written[0],
//!     [0x08, 0x00, 0x81, 0x29, 0x11, 0x51, 0x00, 50]
//! );
//! ```
//!
//! [`HubTransport`]: crate::traits::HubTransport
//! [`HubConnector`]: crate::traits::HubConnector
//! [`Clock`]: crate::traits::Clock
//! [`Sleep`]: crate::traits::Sleep

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::ports::HardwareVariant;
use crate::traits::{Clock, HubConnector, HubTransport, Sleep};

/// Failures a mock can be told to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MockError {
    /// Write rejected.
    #[error("write failed")]
    WriteFailed,
    /// Read rejected.
    #[error("read failed")]
    ReadFailed,
    /// No hub found before the timeout.
    #[error("no hub found within {0} ms")]
    Timeout(u32),
}

// ============================================================================
// Transport Mocks
// ============================================================================

/// Mock hub link for testing.
///
/// Records every written frame and hands out queued reads in FIFO order.
/// Use the public fields to inspect state after test operations.
///
/// # Example
///
/// ```rust
/// use duplo_hub::hal::MockTransport;
/// use duplo_hub::traits::HubTransport;
///
/// let mut link = MockTransport::new();
/// link.queue_read(vec![0x05, 0x00, 0x45, 0x01, 0x00]);
///
/// link.write(&[0x08, 0x00, 0x81]).unwrap();
/// assert_eq!(link.written.len(), 1);
///
/// assert!(link.read().unwrap().is_some());
/// assert!(link.read().unwrap().is_none()); // Empty
/// assert_eq!(link.read_calls, 2);
/// ```
#[derive(Clone, Debug)]
pub struct MockTransport {
    /// Every frame written, oldest first.
    pub written: Vec<Vec<u8>>,
    /// Frames waiting to be read.
    pub incoming: VecDeque<Vec<u8>>,
    /// Make every write fail.
    pub fail_writes: bool,
    /// Make every read fail.
    pub fail_reads: bool,
    /// Number of times `read` was called.
    pub read_calls: usize,
    /// Advertised hub name.
    pub name: String,
}

impl MockTransport {
    /// Creates a link named "Train Base" with nothing queued.
    pub fn new() -> Self {
        Self::named("Train Base")
    }

    /// Creates a link with the given advertised name.
    pub fn named(name: &str) -> Self {
        Self {
            written: Vec::new(),
            incoming: VecDeque::new(),
            fail_writes: false,
            fail_reads: false,
            read_calls: 0,
            name: String::from(name),
        }
    }

    /// Queue a frame for a later `read`.
    pub fn queue_read(&mut self, frame: Vec<u8>) {
        self.incoming.push_back(frame);
    }

    /// The most recently written frame.
    pub fn last_written(&self) -> Option<&[u8]> {
        self.written.last().map(Vec::as_slice)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HubTransport for MockTransport {
    type Error = MockError;

    fn write(&mut self, frame: &[u8]) -> Result<(), MockError> {
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        self.written.push(frame.to_vec());
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Vec<u8>>, MockError> {
        self.read_calls += 1;
        if self.fail_reads {
            return Err(MockError::ReadFailed);
        }
        Ok(self.incoming.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Mock hub scanner for testing.
///
/// Every successful `connect` returns a clone of the prepared transport.
///
/// # Example
///
/// ```rust
/// use duplo_hub::hal::{MockConnector, MockError, MockTransport};
/// use duplo_hub::ports::HardwareVariant;
/// use duplo_hub::traits::HubConnector;
///
/// let mut connector = MockConnector::new(MockTransport::new());
/// assert!(connector.connect(HardwareVariant::OLD, 10_000).is_ok());
/// assert_eq!(connector.attempts, vec![(HardwareVariant::OLD, 10_000)]);
///
/// let mut missing = MockConnector::unreachable();
/// assert_eq!(
///     missing.connect(HardwareVariant::OLD, 500).err(),
///     Some(MockError::Timeout(500))
/// );
/// ```
#[derive(Debug)]
pub struct MockConnector {
    /// Transport handed out on success; `None` times out.
    pub transport: Option<MockTransport>,
    /// Variant and timeout of every connect call.
    pub attempts: Vec<(HardwareVariant, u32)>,
}

impl MockConnector {
    /// Connector that finds a hub behind `transport`.
    pub fn new(transport: MockTransport) -> Self {
        Self {
            transport: Some(transport),
            attempts: Vec::new(),
        }
    }

    /// Connector that never finds a hub.
    pub fn unreachable() -> Self {
        Self {
            transport: None,
            attempts: Vec::new(),
        }
    }
}

impl HubConnector for MockConnector {
    type Transport = MockTransport;
    type Error = MockError;

    fn connect(
        &mut self,
        variant: HardwareVariant,
        timeout_ms: u32,
    ) -> Result<MockTransport, MockError> {
        self.attempts.push((variant, timeout_ms));
        self.transport.clone().ok_or(MockError::Timeout(timeout_ms))
    }
}

// ============================================================================
// Time Mocks
// ============================================================================

/// Mock clock for testing time-dependent behavior.
///
/// Clones share the same time, so a test can keep one handle and move
/// another into the session.
///
/// # Example
///
/// ```rust
/// use duplo_hub::hal::MockClock;
/// use duplo_hub::traits::Clock;
///
/// let clock = MockClock::new();
/// let handle = clock.clone();
/// assert_eq!(clock.now_ms(), 0);
///
/// handle.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// handle.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    current_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock clock starting at `ms`.
    pub fn starting_at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.store(ms, Ordering::SeqCst);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}

/// Mock sleeper for testing.
///
/// Never blocks. Records each pause and, when linked to a [`MockClock`],
/// advances it by the same amount.
///
/// # Example
///
/// ```rust
/// use duplo_hub::hal::{MockClock, MockSleep};
/// use duplo_hub::traits::{Clock, Sleep};
///
/// let clock = MockClock::new();
/// let mut sleep = MockSleep::with_clock(clock.clone());
///
/// sleep.sleep_ms(500);
/// sleep.sleep_ms(100);
/// assert_eq!(sleep.total_ms, 600);
/// assert_eq!(sleep.calls, 2);
/// assert_eq!(clock.now_ms(), 600);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockSleep {
    /// Sum of all pauses.
    pub total_ms: u64,
    /// Number of pauses.
    pub calls: usize,
    clock: Option<MockClock>,
}

impl MockSleep {
    /// Sleeper that only records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeper that also advances `clock`.
    pub fn with_clock(clock: MockClock) -> Self {
        Self {
            clock: Some(clock),
            ..Self::default()
        }
    }
}

impl Sleep for MockSleep {
    fn sleep_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.calls += 1;
        if let Some(clock) = &self.clock {
            clock.advance(u64::from(ms));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn transport_failure_flags() {
        let mut link = MockTransport::new();
        link.fail_writes = true;
        assert_eq!(link.write(&[1]), Err(MockError::WriteFailed));
        assert!(link.written.is_empty());

        link.fail_reads = true;
        link.queue_read(vec![1, 2, 3, 4]);
        assert_eq!(link.read(), Err(MockError::ReadFailed));
        assert_eq!(link.incoming.len(), 1);
    }

    #[test]
    fn reads_are_fifo() {
        let mut link = MockTransport::new();
        link.queue_read(vec![1]);
        link.queue_read(vec![2]);
        assert_eq!(link.read(), Ok(Some(vec![1])));
        assert_eq!(link.read(), Ok(Some(vec![2])));
    }

    #[test]
    fn clock_clones_share_time() {
        let clock = MockClock::starting_at(100);
        let other = clock.clone();
        other.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn sleep_without_clock_only_records() {
        let mut sleep = MockSleep::new();
        sleep.sleep_ms(20);
        assert_eq!(sleep.total_ms, 20);
        assert_eq!(sleep.calls, 1);
    }
}
