//! Run orchestration
//!
//! [`SyncEngine`] performs one run for a resolved [`SyncRequest`]: create the
//! destination root, consult the version stamp, mirror the bundle, record the
//! new stamp, then resolve the entry program. Launching and the final
//! cleanup are left to the caller, which owns the process exit.

use std::fs;

use bundle_fs::{ReapOutcome, SyncReport};
use bundle_launch::{EntryPlan, LaunchError};

use crate::error::{Error, Result};
use crate::request::SyncRequest;

/// What the synchronization step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The bundle was mirrored and the stamp updated
    Synced(SyncReport),
    /// The stamp already matched the bundle version
    UpToDate,
    /// Copying is turned off for this run
    CopyDisabled,
}

/// Whether there is an entry program to hand off to.
#[derive(Debug)]
pub enum EntryState {
    /// No entry program is configured
    NotConfigured,
    /// The entry program resolved inside its base and can be launched
    Ready(EntryPlan),
    /// The entry program was configured but cannot be used
    Skipped(LaunchError),
}

/// Result of [`SyncEngine::run`].
#[derive(Debug)]
pub struct RunOutcome {
    pub sync: SyncStatus,
    pub entry: EntryState,
}

/// Drives a single run for one [`SyncRequest`].
#[derive(Debug, Clone)]
pub struct SyncEngine {
    request: SyncRequest,
}

impl SyncEngine {
    pub fn new(request: SyncRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &SyncRequest {
        &self.request
    }

    /// Create the destination root and any missing parents.
    pub fn prepare_destination(&self) -> Result<()> {
        let dest = &self.request.dest_root;
        fs::create_dir_all(dest).map_err(|source| Error::CreateDestination {
            path: dest.clone(),
            source,
        })
    }

    /// Mirror the bundle when copying is enabled and the stamp is stale.
    pub fn synchronize(&self) -> Result<SyncStatus> {
        let request = &self.request;
        if !request.copy_enabled {
            tracing::info!("Copy disabled, running entry program from source directory");
            return Ok(SyncStatus::CopyDisabled);
        }

        let version = bundle_fs::derive_version(&request.source_root);
        tracing::info!("Current version: {}", version);

        if !request.force && !bundle_fs::needs_sync(&request.dest_root, &version) {
            tracing::info!("No sync needed, versions match");
            return Ok(SyncStatus::UpToDate);
        }

        tracing::info!("Starting sync process...");
        let report =
            bundle_fs::sync_tree(&request.source_root, &request.dest_root, request.copy_options())
                .map_err(Error::Sync)?;

        bundle_fs::write_stamp(&request.dest_root, &version).map_err(Error::Stamp)?;

        tracing::info!("{}", report);
        tracing::info!("Sync completed successfully");
        Ok(SyncStatus::Synced(report))
    }

    /// Resolve the configured entry program.
    ///
    /// Missing programs and containment refusals are logged and reported as
    /// [`EntryState::Skipped`]; they never fail the run.
    pub fn plan_entry(&self) -> EntryState {
        let Some(entry) = self.request.entry.as_deref() else {
            return EntryState::NotConfigured;
        };

        let base = self.request.entry_base();
        match EntryPlan::resolve(base, entry, &self.request.dest_root) {
            Ok(plan) => EntryState::Ready(plan),
            Err(e) => {
                match &e {
                    LaunchError::NotFound { .. } => tracing::info!("{}", e),
                    LaunchError::OutsideBase { .. } => tracing::error!("{}", e),
                    _ => tracing::warn!("Failed to resolve entry program: {}", e),
                }
                EntryState::Skipped(e)
            }
        }
    }

    /// Remove the destination root if nothing is left in it.
    pub fn reap(&self) -> Result<ReapOutcome> {
        Ok(bundle_fs::prune_if_empty(&self.request.dest_root)?)
    }

    /// Prepare, synchronize, and plan the entry program.
    pub fn run(&self) -> Result<RunOutcome> {
        let request = &self.request;
        tracing::info!("Source directory: {}", request.source_root.display());
        tracing::info!("Destination directory: {}", request.dest_root.display());
        tracing::info!("Force sync: {}", request.force);
        tracing::info!("Copy enabled: {}", request.copy_enabled);

        self.prepare_destination()?;
        let sync = self.synchronize()?;
        let entry = self.plan_entry();

        Ok(RunOutcome { sync, entry })
    }
}
