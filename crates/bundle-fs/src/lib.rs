//! Filesystem engine for Bundle Mirror
//!
//! Mirrors a read-only bundle directory into a writable destination,
//! tracks the mirrored content through a version stamp, and cleans up
//! destinations that end up empty.

pub mod constants;
pub mod copy;
pub mod error;
pub mod io;
pub mod path;
pub mod reap;
pub mod version;

pub use constants::BundlePath;
pub use copy::{CopyOptions, SyncReport, sync_tree};
pub use error::{CopyStage, Error, Result};
pub use reap::{ReapOutcome, prune_if_empty};
pub use version::{derive_version, needs_sync, read_stamp, write_stamp};
