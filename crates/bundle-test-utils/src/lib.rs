//! Shared test utilities for the bundle-mirror workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`bundle`]: [`bundle::TestBundle`] builder for source/destination pairs
//! - [`script`]: small executable entry programs for launch tests

pub mod bundle;
#[cfg(unix)]
pub mod script;
