/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! convenience re-export of the full public surface, for `use libactor_rt::prelude::*;`.

pub use crate::{
    alloc, broadcast, configure, receive, receive_timeout, release, reply, retain, self_id, send,
    shutdown, spawn, trap_exit, try_spawn, wait_finish, wait_finish_timeout,
    run_actor_main,
    ActorId, Block, EntryArgs, Message, Releasable, Result, RuntimeConfig, RuntimeError, EXITED,
    days, hours, minutes, secs, millis, micros, nanos,
    trace, debug, info, warn, error,
};
