//! Time abstractions for the throttle and read timers.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Clock`] | Monotonic time source for rate limiting |
//! | [`Sleep`] | Blocking pause between setup and probe steps |
//!
//! For testing, use [`MockClock`](crate::hal::MockClock) and
//! [`MockSleep`](crate::hal::MockSleep). On desktop, `hal::SystemClock`
//! and `hal::ThreadSleep` (requires `std`).

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds. On desktop, this can wrap
/// `std::time::Instant`. On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use duplo_hub::traits::Clock;
/// use duplo_hub::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since_ms`.
    ///
    /// Saturates at zero if `since_ms` is in the future.
    fn elapsed_ms(&self, since_ms: u64) -> u64 {
        self.now_ms().saturating_sub(since_ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Blocking pause.
///
/// Used between setup writes, where the hub needs time to apply a
/// subscription before the next frame arrives.
pub trait Sleep {
    /// Block for the given number of milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

impl<S: Sleep + ?Sized> Sleep for &mut S {
    fn sleep_ms(&mut self, ms: u32) {
        (**self).sleep_ms(ms)
    }
}
