/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! the process-wide actor registry and opaque actor identity.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use crate::alloc::AllocHandle;
use crate::list::TrackedList;
use crate::mailbox::Mailbox;
use crate::message::Message;
use crate::trace;

/// an opaque, unforgeable handle to an actor, valid only while that actor
/// is alive.
///
/// Ids are drawn from a process-global monotonically increasing counter and
/// are never reused, so two `ActorId` values are equal if and only if they
/// designate the same spawn — there is no way for application code to
/// forge one, and a stale id simply never matches any live registry entry
/// again. This gives the same non-reuse guarantee a generation-tagged id
/// would, without a separate generation field, because the counter itself
/// never wraps back onto a freed slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ActorId(pub(crate) u64);

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

fn next_actor_id() -> ActorId {
    ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
}

/// internal per-actor state. Never exposed to application code directly —
/// only through an [`ActorId`].
pub(crate) struct ActorState {
    pub(crate) id: ActorId,
    pub(crate) thread_id: Mutex<Option<ThreadId>>,
    pub(crate) mailbox: Mailbox,
    pub(crate) handles: Mutex<TrackedList<AllocHandle>>,
    pub(crate) exit_target: Mutex<Option<ActorId>>,
    pub(crate) trap_exit: AtomicBool,
}

impl ActorState {
    fn new() -> Self {
        ActorState {
            id: next_actor_id(),
            thread_id: Mutex::new(None),
            mailbox: Mailbox::new(),
            handles: Mutex::new(TrackedList::new()),
            exit_target: Mutex::new(None),
            trap_exit: AtomicBool::new(false),
        }
    }
}

/// the process-wide list of live actors, guarded by a single registry
/// mutex, per the crate's lock-ordering discipline (registry -> mailbox ->
/// allocator).
pub(crate) struct Registry {
    actors: Mutex<TrackedList<Arc<ActorState>>>,
    actor_count_changed: std::sync::Condvar,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry {
            actors: Mutex::new(TrackedList::new()),
            actor_count_changed: std::sync::Condvar::new(),
        }
    }

    /// register a brand-new actor state. The caller still has to publish
    /// the state's thread id once the spawned thread starts running (see
    /// [`crate::lifecycle::spawn`]).
    pub(crate) fn register(&self, parent: Option<&ActorId>) -> Arc<ActorState> {
        let state = Arc::new(ActorState::new());

        if let Some(parent_id) = parent {
            let actors = self.actors.lock().unwrap();
            if let Some(parent_state) = actors.filter_first(|a| a.id == *parent_id) {
                if parent_state.trap_exit.load(Ordering::Acquire) {
                    *state.exit_target.lock().unwrap() = Some(*parent_id);
                }
            }
        }

        {
            let mut actors = self.actors.lock().unwrap();
            actors.append(state.clone());
        }
        trace!("actor {:?} registered", state.id);
        state
    }

    pub(crate) fn set_thread_id(&self, id: &ActorId, thread_id: ThreadId) {
        let actors = self.actors.lock().unwrap();
        if let Some(state) = actors.filter_first(|a| a.id == *id) {
            *state.thread_id.lock().unwrap() = Some(thread_id);
        }
    }

    pub(crate) fn lookup(&self, id: &ActorId) -> Option<Arc<ActorState>> {
        let actors = self.actors.lock().unwrap();
        actors.filter_first(|a| a.id == *id).cloned()
    }

    /// locate `dest` and append `msg` to its mailbox while still holding
    /// the registry lock, so a concurrent exit/unregister of `dest` cannot
    /// race with this delivery (registry -> mailbox lock order).
    pub(crate) fn deliver(&self, dest: &ActorId, msg: Message) -> bool {
        let actors = self.actors.lock().unwrap();
        if let Some(state) = actors.filter_first(|a| a.id == *dest) {
            state.mailbox.push(msg);
            true
        } else {
            false
        }
    }

    /// run `f` against `id`'s state without ever releasing the registry
    /// lock between the existence check and whatever `f` does. Used by
    /// `send`/`broadcast` so that charging an allocation handle to the
    /// recipient and appending the message to its mailbox happen in the
    /// same critical section as the liveness check — a concurrent
    /// `exit_and_drain` for that same actor cannot interleave and drain a
    /// handle list that `f` is still charging into (registry -> mailbox ->
    /// allocator order: the registry lock is held for the whole call, `f`
    /// acquires the destination's mailbox/handle locks underneath it).
    pub(crate) fn with_live_actor<F, R>(&self, id: &ActorId, f: F) -> Option<R>
    where
        F: FnOnce(&ActorState) -> R,
    {
        let actors = self.actors.lock().unwrap();
        actors.filter_first(|a| a.id == *id).map(f)
    }

    /// atomically, under the registry lock: remove `id` from the registry
    /// and drain its still-charged allocation handles, returning both to
    /// the caller to finish cleanup (deliver the exit notification,
    /// release each drained handle through the allocator) outside the
    /// lock. Draining the handle list here, under the same lock
    /// `with_live_actor` holds while charging a new handle, is what
    /// prevents a handle from being charged to an actor after it has
    /// already been swept for exit.
    pub(crate) fn exit_and_drain(&self, id: &ActorId) -> Option<(Arc<ActorState>, Vec<AllocHandle>)> {
        let mut actors = self.actors.lock().unwrap();
        let state = actors.remove_by(|a| a.id == *id)?;
        let mut handles = state.handles.lock().unwrap();
        let mut drained = Vec::new();
        while let Some(h) = handles.pop_front() {
            drained.push(h);
        }
        drop(handles);
        self.actor_count_changed.notify_all();
        trace!("actor {:?} unregistered", id);
        Some((state, drained))
    }

    pub(crate) fn lookup_by_thread(&self, thread_id: ThreadId) -> Option<Arc<ActorState>> {
        let actors = self.actors.lock().unwrap();
        actors
            .filter_first(|a| *a.thread_id.lock().unwrap() == Some(thread_id))
            .cloned()
    }

    pub(crate) fn snapshot_ids(&self) -> Vec<ActorId> {
        let actors = self.actors.lock().unwrap();
        actors.iter().map(|a| a.id).collect()
    }

    pub(crate) fn unregister(&self, id: &ActorId) {
        let mut actors = self.actors.lock().unwrap();
        actors.remove_by(|a| a.id == *id);
        self.actor_count_changed.notify_all();
        trace!("actor {:?} unregistered", id);
    }

    pub(crate) fn count(&self) -> usize {
        self.actors.lock().unwrap().count()
    }

    /// blocks until the registry is empty, waking periodically on the
    /// "actor-count-changed" condition variable. The poll interval is
    /// [`crate::RuntimeConfig::wait_finish_poll_interval`].
    pub(crate) fn wait_finish(&self) {
        let poll_interval = crate::runtime().config.wait_finish_poll_interval;
        let mut actors = self.actors.lock().unwrap();
        while !actors.is_empty() {
            let (guard, _timeout_result) = self
                .actor_count_changed
                .wait_timeout(actors, poll_interval)
                .unwrap();
            actors = guard;
        }
    }

    pub(crate) fn wait_finish_timeout(&self, timeout: std::time::Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        let mut actors = self.actors.lock().unwrap();
        while !actors.is_empty() {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _timeout_result) = self
                .actor_count_changed
                .wait_timeout(actors, deadline - now)
                .unwrap();
            actors = guard;
        }
        true
    }

    /// drain whatever is still registered at shutdown time.
    pub(crate) fn drain(&self) -> Vec<Arc<ActorState>> {
        let mut actors = self.actors.lock().unwrap();
        let mut drained = Vec::new();
        while let Some(a) = actors.pop_front() {
            drained.push(a);
        }
        drained
    }
}

/// run `f` against the actor state for `id`, if it is still registered.
/// Used by the allocator to charge handles against a (possibly different)
/// recipient actor.
pub(crate) fn with_actor<F, R>(id: &ActorId, f: F) -> Option<R>
where
    F: FnOnce(&ActorState) -> R,
{
    crate::runtime().registry.lookup(id).map(|state| f(&state))
}
