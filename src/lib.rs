/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! a small in-process concurrent actor runtime: independent units of
//! execution ("actors"), each with a private mailbox, exchanging typed
//! messages by value (deep copy) or by shared-immutable reference
//! (retained, read-only payload). One OS thread per actor; blocking and
//! timed receive; reference-counted tracked allocations whose ownership is
//! charged to whichever actor currently holds them, so that an actor's
//! exit automatically releases everything it still owns.
//!
//! See [`spawn`], [`send`], [`receive`] and friends for the primary API;
//! [`run_actor_main!`] wires up a canonical `main` for a standalone binary.

use std::sync::OnceLock;
use std::time::Duration;

mod alloc;
pub mod config;
pub mod errors;
mod lifecycle;
mod list;
mod mailbox;
mod message;
mod messaging;
pub mod prelude;
mod registry;

pub use alloc::Block;
pub use config::RuntimeConfig;
pub use errors::{Result, RuntimeError};
pub use lifecycle::{shutdown, spawn, trap_exit, try_spawn, wait_finish, wait_finish_timeout, EntryArgs};
pub use message::{Message, EXITED};
pub use messaging::{alloc, broadcast, receive, receive_timeout, release, reply, retain, self_id, send, Releasable};
pub use registry::ActorId;

/// internal, process-wide runtime state: the actor registry and the
/// tracked-allocation registry. A single lazily-initialized singleton;
/// teardown is [`shutdown`].
pub(crate) struct Runtime {
    pub(crate) registry: registry::Registry,
    pub(crate) allocator: alloc::Allocator,
    pub(crate) config: RuntimeConfig,
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static PENDING_CONFIG: std::sync::Mutex<Option<RuntimeConfig>> = std::sync::Mutex::new(None);

/// install a [`RuntimeConfig`] to use once the runtime singleton is first
/// touched. Has no effect if the singleton is already initialized — call
/// this before the first `spawn`/`alloc`/etc. in the process.
pub fn configure(config: RuntimeConfig) {
    *PENDING_CONFIG.lock().unwrap() = Some(config);
}

pub(crate) fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        let config = PENDING_CONFIG.lock().unwrap().take().unwrap_or_default();
        Runtime {
            registry: registry::Registry::new(),
            allocator: alloc::Allocator::new(),
            config,
        }
    })
}

#[inline] pub fn days(n: u64) -> Duration { Duration::from_secs(n * 60 * 60 * 24) }
#[inline] pub fn hours(n: u64) -> Duration { Duration::from_secs(n * 60 * 60) }
#[inline] pub fn minutes(n: u64) -> Duration { Duration::from_secs(n * 60) }
#[inline] pub fn secs(n: u64) -> Duration { Duration::from_secs(n) }
#[inline] pub fn millis(n: u64) -> Duration { Duration::from_millis(n) }
#[inline] pub fn micros(n: u64) -> Duration { Duration::from_micros(n) }
#[inline] pub fn nanos(n: u64) -> Duration { Duration::from_nanos(n) }

/*
 * we intercept logging/tracing macros here to have a central place where we can remove/replace them
 */

#[macro_export]
macro_rules! trace {
    ( $( $id:ident = $e:expr ),* ) => { tracing::trace!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::trace!( $( $e ),* ) }
}

#[macro_export]
macro_rules! debug {
    ( $( $id:ident = $e:expr ),* ) => { tracing::debug!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::debug!( $( $e ),* ) }
}

#[macro_export]
macro_rules! info {
    ( $( $id:ident = $e:expr ),* ) => { tracing::info!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::info!( $( $e ),* ) }
}

#[macro_export]
macro_rules! warn {
    ( $( $id:ident = $e:expr ),* ) => { tracing::warn!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::warn!( $( $e ),* ) }
}

#[macro_export]
macro_rules! error {
    ( $( $id:ident = $e:expr ),* ) => { tracing::error!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { tracing::error!( $( $e ),* ) }
}
