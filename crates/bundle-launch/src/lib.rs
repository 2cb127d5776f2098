//! Entry program launch for Bundle Mirror
//!
//! After a bundle is mirrored, the configured entry program is resolved
//! against an authorized base directory and started with the host's
//! environment and standard streams. This crate handles:
//!
//! - Resolution of the entry path and the containment check that refuses
//!   anything outside the base directory
//! - The two launch disciplines: wait for the child, or start it and return
//!
//! Terminating the host process with the resulting code is left to the
//! binary.

pub mod error;
pub mod process;
pub mod resolve;

pub use error::{LaunchError, Result};
pub use process::{LaunchMode, LaunchOutcome, launch};
pub use resolve::{EntryPlan, resolve_entry};
