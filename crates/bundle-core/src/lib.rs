//! Core orchestration layer for Bundle Mirror
//!
//! Turns layered configuration into an immutable [`SyncRequest`] and drives
//! one run: destination preparation, version check, mirroring, stamp
//! update, entry resolution and cleanup.

pub mod config;
pub mod engine;
pub mod error;
pub mod request;

pub use config::{ResolvedConfig, WrapperConfig};
pub use engine::{EntryState, RunOutcome, SyncEngine, SyncStatus};
pub use error::{Error, Result};
pub use request::SyncRequest;
