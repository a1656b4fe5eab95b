/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! spawn, exit cleanup, the exit-notification link, and the global
//! "wait until all actors are done" barrier.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::errors::{spawn_failed, Result};
use crate::message::{Message, EXITED};
use crate::registry::ActorId;
use crate::{debug, info, messaging, runtime, warn};

/// the argument descriptor handed to the entry actor by [`crate::run_actor_main!`]:
/// the program's `argv`.
#[derive(Debug, Clone)]
pub struct EntryArgs {
    pub args: Vec<String>,
}

/// spawn a new actor running `f(arg)` on a dedicated OS thread and return
/// its identifier immediately (the thread itself still has to start up and
/// publish its own thread id before `self_id()` resolves from inside it).
///
/// If the caller currently has `trap_exit` enabled, the new child's exit
/// target is set to the caller, so the child's termination is delivered to
/// the caller as an [`EXITED`] message.
///
/// Thread creation failure is treated as fatal, the same way allocation
/// failure is — there is no in-band recovery path for a process that can
/// no longer create threads. Use [`try_spawn`] if you need to handle that
/// case instead.
pub fn spawn<F, T>(f: F, arg: T) -> ActorId
where
    F: FnOnce(T) + Send + 'static,
    T: Send + 'static,
{
    try_spawn(f, arg).expect("failed to spawn actor thread")
}

/// fallible variant of [`spawn`] that surfaces thread-creation failure as a
/// [`crate::errors::RuntimeError::SpawnFailed`] instead of panicking.
pub fn try_spawn<F, T>(f: F, arg: T) -> Result<ActorId>
where
    F: FnOnce(T) + Send + 'static,
    T: Send + 'static,
{
    let parent = messaging::self_id();
    let state = runtime().registry.register(parent.as_ref());
    let id = state.id;

    let mut build = std::thread::Builder::new().name(format!("actor-{}", id.0));
    if let Some(stack_size) = runtime().config.actor_stack_size {
        build = build.stack_size(stack_size);
    }
    let spawn_result = build.spawn(move || {
        runtime().registry.set_thread_id(&id, std::thread::current().id());
        debug!("actor {:?} started", id);
        f(arg);
        exit_cleanup(id);
    });

    match spawn_result {
        Ok(_join_handle) => {
            // dropping the JoinHandle detaches the thread: the runtime
            // never joins actor threads directly, it waits for them via
            // the registry's "actor-count-changed" condition variable
            // instead (see wait_finish below).
            Ok(id)
        }
        Err(e) => {
            runtime().registry.unregister(&id);
            Err(spawn_failed(e))
        }
    }
}

/// toggle the calling actor's `trap_exit` flag. While enabled, children
/// this actor subsequently spawns will notify it with an [`EXITED`] message
/// on their exit. Has no effect when called from a non-actor thread.
pub fn trap_exit(on: bool) {
    if let Some(me) = messaging::self_id() {
        if let Some(state) = runtime().registry.lookup(&me) {
            state.trap_exit.store(on, Ordering::Release);
        }
    }
}

/// performed by the spawn trampoline once the user function returns.
///
/// The unregister and the handle drain happen together under a single
/// registry-lock critical section ([`crate::registry::Registry::exit_and_drain`]),
/// so a concurrent `send`/`broadcast` charging a handle against this actor
/// either completes entirely before this runs (and its handle is drained
/// here) or observes the actor as already gone (and charges nothing) — it
/// can never land a handle that this drain has already passed over.
fn exit_cleanup(id: ActorId) {
    let rt = runtime();
    let Some((state, handles)) = rt.registry.exit_and_drain(&id) else { return };

    let exit_target = *state.exit_target.lock().unwrap();
    if let Some(target) = exit_target {
        let msg = Message::new(EXITED, id, target, None);
        rt.registry.deliver(&target, msg);
    }

    let released = handles.len();
    for h in handles {
        rt.allocator.release_id(h.block_id);
    }
    debug!("actor {:?} released {} allocation handle(s) at exit", id, released);
}

/// block until the actor registry is empty, waking periodically (bounded
/// wait) on the global condition variable.
pub fn wait_finish() {
    runtime().registry.wait_finish();
}

/// bounded variant of [`wait_finish`]: returns once the registry is empty,
/// or once `timeout` elapses with actors still registered — whichever
/// comes first.
pub fn wait_finish_timeout(timeout: Duration) -> Result<()> {
    if runtime().registry.wait_finish_timeout(timeout) {
        Ok(())
    } else {
        Err(crate::errors::RuntimeError::Timeout(timeout))
    }
}

/// final teardown: forcibly unregisters any actors still in the registry,
/// then sweeps the tracked-allocation registry for leaked blocks, logging
/// a diagnostic per leak.
pub fn shutdown() {
    let rt = runtime();
    let stragglers = rt.registry.drain();
    if !stragglers.is_empty() {
        warn!("shutdown: {} actor(s) still registered, forcing removal", stragglers.len());
    }

    let leaked = rt.allocator.sweep_leaks();
    if leaked > 0 {
        warn!("shutdown: freed {} leaked tracked allocation(s)", leaked);
    } else {
        info!("shutdown: no leaked allocations");
    }
}

/// the canonical `main` wrapper: initialize, spawn the entry actor with the
/// program's argv, wait for everything to finish, shut down, and exit 0.
///
/// ```ignore
/// fn entry(args: libactor_rt::EntryArgs) {
///     // ... actor body ...
/// }
/// libactor_rt::run_actor_main!(entry);
/// ```
#[macro_export]
macro_rules! run_actor_main {
    ($entry:expr) => {
        fn main() {
            let args: Vec<String> = std::env::args().collect();
            let entry_args = $crate::EntryArgs { args };
            $crate::spawn($entry, entry_args);
            $crate::wait_finish();
            $crate::shutdown();
        }
    };
}
