//! Services layered on top of the core session.
//!
//! - `shared`: a `Mutex`-guarded session for multi-threaded callers (requires `std`)
//!
//! # Shared State Pattern
//!
//! When several threads talk to one train, they should share a single
//! `TrainSession` via `SharedSession`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use duplo_hub::services::SharedSession;
//!
//! let shared = Arc::new(SharedSession::new(session));
//!
//! // UI thread drives, polling thread watches the track
//! let ui = Arc::clone(&shared);
//! let poller = Arc::clone(&shared);
//! ```

pub mod shared;

pub use shared::*;
