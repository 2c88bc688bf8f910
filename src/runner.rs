//! Child process execution.
//!
//! The resolved binary runs with the caller's arguments; stdin, stdout,
//! stderr, and the full environment are inherited unmodified. The pipeline
//! blocks until the child exits.

use crate::error::{GhrunError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Run the binary and return its exit code.
pub async fn run_binary(binary: &Path, args: &[String]) -> Result<i32> {
    debug!(binary = %binary.display(), ?args, "spawning");

    let status = Command::new(binary)
        .args(args)
        .status()
        .await
        .map_err(|e| GhrunError::ChildProcessError(binary.to_path_buf(), e.to_string()))?;

    status.code().ok_or_else(|| {
        GhrunError::ChildProcessError(binary.to_path_buf(), "terminated by signal".to_string())
    })
}
