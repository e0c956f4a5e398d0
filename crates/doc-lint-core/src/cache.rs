//! Memoized execution of external commands.
//!
//! A [`CommandCache`] runs each distinct [`CommandLine`] at most once.
//! Several validators often need the very same tool invocation (for example
//! every warning-based validator reads the same `yard stats` output), so the
//! first caller pays for the process and the rest read the stored
//! [`ExecutionResult`].
//!
//! Concurrent callers asking for the same fingerprint block on a shared
//! once-cell, so the command is still spawned a single time.

use crate::command::{CommandLine, ExecutionResult, Fingerprint};
use std::collections::HashMap;
use std::process::Command;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};

/// Exit code reported when a command could not be spawned at all.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Runs an external command and captures its output.
///
/// Implementations must never fail: spawn errors and non-zero exits are
/// reported inside the returned [`ExecutionResult`].
pub trait CommandSpawner: Send + Sync {
    /// Runs `command` to completion.
    fn spawn(&self, command: &CommandLine) -> ExecutionResult;
}

/// Spawns commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl CommandSpawner for SystemSpawner {
    fn spawn(&self, command: &CommandLine) -> ExecutionResult {
        debug!("Spawning: {}", command);

        match Command::new(command.program())
            .args(command.os_args())
            .output()
        {
            Ok(output) => ExecutionResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                // None means the child was killed by a signal
                exit_code: output.status.code().unwrap_or(-1),
            },
            Err(e) => {
                warn!("Failed to spawn `{}`: {}", command.program(), e);
                ExecutionResult::failure(
                    format!("failed to run `{}`: {e}", command.program()),
                    SPAWN_FAILURE_EXIT_CODE,
                )
            }
        }
    }
}

/// Errors raised by the cache itself (never by the commands it runs).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The entry table lock was poisoned by a panicking thread.
    #[error("command cache lock poisoned")]
    Poisoned,
}

type Slot = Arc<OnceLock<ExecutionResult>>;

/// Fingerprint-keyed cache of command executions.
pub struct CommandCache {
    spawner: Box<dyn CommandSpawner>,
    entries: Mutex<HashMap<Fingerprint, Slot>>,
}

impl Default for CommandCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl CommandCache {
    /// Creates a cache that spawns real processes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawner(SystemSpawner)
    }

    /// Creates a cache with a custom spawner.
    #[must_use]
    pub fn with_spawner<S: CommandSpawner + 'static>(spawner: S) -> Self {
        Self {
            spawner: Box::new(spawner),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `command`, or returns the stored result of an earlier identical
    /// invocation.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] if the entry table is unusable.
    /// Command failures are never errors.
    pub fn execute(&self, command: &CommandLine) -> Result<ExecutionResult, CacheError> {
        let fingerprint = command.fingerprint();

        let slot = {
            let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
            Arc::clone(entries.entry(fingerprint.clone()).or_default())
        };

        if let Some(cached) = slot.get() {
            debug!("Command cache hit {}: {}", fingerprint, command);
            return Ok(cached.clone());
        }

        let result = slot.get_or_init(|| self.spawner.spawn(command));
        Ok(result.clone())
    }

    /// Drops every cached entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] if the entry table is unusable.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .clear();
        Ok(())
    }

    /// Number of cached fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Returns true if nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
