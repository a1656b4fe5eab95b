/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! in-process construction parameters. The runtime has no CLI, config file,
//! or environment variable surface — the only configurable knobs are typed
//! fields set before the first actor spawns.

use std::time::Duration;

/// tunables for the process-wide [`crate::Runtime`] singleton.
///
/// `RuntimeConfig` only has an effect if installed via [`crate::configure`]
/// before the first call that touches the runtime (the first `spawn`,
/// `alloc`, etc.); after that the singleton is already initialized and
/// further calls to [`crate::configure`] are silently ignored, matching the
/// "fatal on misuse, otherwise idempotent no-op" posture the rest of the
/// runtime's surface follows.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// stack size requested for each actor's dedicated OS thread. `None`
    /// uses the platform default (see `std::thread::Builder::stack_size`).
    pub actor_stack_size: Option<usize>,

    /// how often [`crate::wait_finish`] re-checks the registry after a
    /// spurious condition-variable wake, bounding the worst-case delay
    /// between the last actor exiting and `wait_finish` noticing.
    pub wait_finish_poll_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            actor_stack_size: None,
            wait_finish_poll_interval: Duration::from_millis(250),
        }
    }
}
