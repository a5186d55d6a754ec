//! Shared session for multi-threaded callers.
//!
//! `SharedSession` provides thread-safe access to a single [`TrainSession`]
//! that can be shared between, say, a UI thread and a sensor polling thread.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use duplo_hub::services::SharedSession;
//! use duplo_hub::hal::{MockClock, MockTransport};
//! use duplo_hub::{HubCatalog, SessionConfig, TrainSession};
//!
//! let clock = MockClock::new();
//! let session = TrainSession::new(
//!     MockTransport::new(),
//!     HubCatalog::standard(),
//!     SessionConfig::default(),
//!     clock.clone(),
//! )
//! .unwrap();
//! let shared = Arc::new(SharedSession::new(session));
//!
//! clock.advance(1_000);
//! let poller = Arc::clone(&shared);
//! std::thread::spawn(move || {
//!     poller.drive(60).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(shared.with_session(|s| s.throttle().last_power()), 60);
//! ```

use std::sync::{Mutex, MutexGuard};

use crate::adapter::TrainControl;
use crate::session::{PortReport, SessionError, TrainSession};
use crate::throttle::DriveDecision;
use crate::traits::{Clock, HubTransport};

/// One session behind one lock.
///
/// # Thread Safety
///
/// - The whole session sits behind a single `Mutex`, so the throttle's
///   read-compare-write of `last_power` and its timer can't interleave
///   between threads.
/// - A `Mutex` (not `RwLock`) because nearly every operation mutates a timer.
/// - A poisoned lock is recovered: the session state is plain data and stays
///   consistent across a panic in a caller's closure.
pub struct SharedSession<T: HubTransport, C: Clock> {
    session: Mutex<TrainSession<T, C>>,
}

impl<T: HubTransport, C: Clock> SharedSession<T, C> {
    /// Wrap a session.
    pub fn new(session: TrainSession<T, C>) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrainSession<T, C>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Access the session with the lock held.
    ///
    /// The closure pattern keeps the lock scoped to one call.
    pub fn with_session<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut TrainSession<T, C>) -> R,
    {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// [`TrainSession::drive`] under the lock.
    pub fn drive(&self, power: i32) -> Result<DriveDecision, SessionError<T::Error>> {
        self.lock().drive(power)
    }

    /// [`TrainSession::stop`] under the lock.
    pub fn stop(&self) -> Result<DriveDecision, SessionError<T::Error>> {
        self.lock().stop()
    }

    /// [`TrainSession::play_sound`] under the lock.
    pub fn play_sound(&self, sound: &str) -> Result<(), SessionError<T::Error>> {
        self.lock().play_sound(sound).map(|_| ())
    }

    /// [`TrainSession::set_light_named`] under the lock.
    pub fn set_light(&self, color: &str) -> Result<bool, SessionError<T::Error>> {
        self.lock().set_light_named(color).map(|f| f.is_some())
    }

    /// [`TrainSession::read_raw`] under the lock.
    pub fn read_raw(&self) -> Result<Option<Vec<u8>>, SessionError<T::Error>> {
        self.lock().read_raw()
    }

    /// [`TrainSession::get_color`] under the lock, returning the color name.
    pub fn get_color(&self, updatelight: bool) -> Result<Option<&'static str>, SessionError<T::Error>> {
        self.lock()
            .get_color(updatelight)
            .map(|entry| entry.map(|e| e.name))
    }

    /// Unwrap the session.
    pub fn into_inner(self) -> TrainSession<T, C> {
        self.session.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// TrainControl Implementation for &SharedSession
// ============================================================================

/// Adapter calls on a shared handle: `adapter::drive(&mut &*shared, 50)`.
///
/// Implemented on the reference so the inherent methods above keep their
/// richer return types when called on an `Arc<SharedSession>`.
impl<T: HubTransport, C: Clock> TrainControl for &SharedSession<T, C> {
    type Error = SessionError<T::Error>;

    fn drive(&mut self, power: i32) -> Result<bool, Self::Error> {
        (**self).drive(power).map(|d| d.is_send())
    }

    fn set_light(&mut self, color: &str) -> Result<bool, Self::Error> {
        (**self).set_light(color)
    }

    fn play_sound(&mut self, sound: &str) -> Result<(), Self::Error> {
        (**self).play_sound(sound)
    }

    fn read(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).read_raw()
    }

    fn describe(&self, frame: &[u8]) -> Option<PortReport> {
        self.lock().describe(frame)
    }

    fn get_color(&mut self, updatelight: bool) -> Result<Option<&'static str>, Self::Error> {
        (**self).get_color(updatelight)
    }
}
