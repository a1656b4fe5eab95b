/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the handful of fallible runtime entry points.
///
/// Most runtime operations (`send`, `broadcast`, `release`, ...) are
/// infallible by design: unknown recipients are silent no-ops, misuse is
/// idempotent. This enum only covers entry points that can genuinely fail:
/// thread creation and bounded waits.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("failed to spawn actor thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("timed out after {0:?} waiting for actors to finish")]
    Timeout(Duration),

    #[error("runtime already shut down")]
    ShutDown,
}

pub fn spawn_failed(e: std::io::Error) -> RuntimeError {
    RuntimeError::SpawnFailed(e)
}
