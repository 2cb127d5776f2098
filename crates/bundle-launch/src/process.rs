//! Starting the entry program
//!
//! The child always inherits the host's environment variables and standard
//! streams, so any ambient configuration the launching runtime exported
//! (for example 0install's `*_PATH` variables) reaches the program intact.

use std::process::{Command, Stdio};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LaunchError, Result};
use crate::resolve::EntryPlan;

/// Exit code used when the child cannot report one of its own.
pub const ABNORMAL_EXIT_CODE: i32 = 1;

/// How the host relates to the child once it is started.
///
/// The two disciplines are not interchangeable: they give the host process
/// different exit codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Start the child and return immediately; the host exits 0.
    #[default]
    Detach,
    /// Wait for the child; the host exits with the child's code.
    Wait,
}

impl LaunchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detach => "detach",
            Self::Wait => "wait",
        }
    }
}

impl FromStr for LaunchMode {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(Self::Detach),
            "wait" => Ok(Self::Wait),
            _ => Err(LaunchError::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened after a successful start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The child was started and left running
    Detached {
        /// Process ID of the child
        pid: u32,
    },
    /// The child ran to completion
    Exited {
        /// The child's exit code, or [`ABNORMAL_EXIT_CODE`] if it had none
        code: i32,
    },
}

impl LaunchOutcome {
    /// Code the host process should exit with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Detached { .. } => 0,
            Self::Exited { code } => *code,
        }
    }
}

/// Start the program described by `plan`.
pub fn launch(plan: &EntryPlan, mode: LaunchMode) -> Result<LaunchOutcome> {
    tracing::info!("Changing to directory: {}", plan.working_dir.display());
    tracing::info!("Executing command: {}", plan.resolved_path.display());

    let mut cmd = Command::new(&plan.resolved_path);
    cmd.current_dir(&plan.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        path: plan.resolved_path.clone(),
        source,
    })?;

    match mode {
        LaunchMode::Detach => {
            let pid = child.id();
            tracing::info!("Started entry program with PID: {}, exiting wrapper", pid);
            // Dropping the handle neither kills nor reaps the child
            drop(child);
            Ok(LaunchOutcome::Detached { pid })
        }
        LaunchMode::Wait => {
            let status = child.wait().map_err(|source| LaunchError::Spawn {
                path: plan.resolved_path.clone(),
                source,
            })?;
            let code = match status.code() {
                Some(code) => code,
                None => {
                    tracing::warn!("Entry program terminated abnormally: {}", status);
                    ABNORMAL_EXIT_CODE
                }
            };
            tracing::info!("Entry program exited with code {}", code);
            Ok(LaunchOutcome::Exited { code })
        }
    }
}
