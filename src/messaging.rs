/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! send / reply / broadcast / receive and the tracked-allocation surface
//! (`alloc` / `retain` / `release`) exposed to application code.

use std::time::Duration;

use crate::alloc::{charge, AllocHandle, Block};
use crate::message::Message;
use crate::registry::ActorId;
use crate::{debug, runtime};

/// the caller's own identifier, or `None` if the calling thread is not a
/// registered actor (e.g. the process's original `main` thread before any
/// actor has been spawned onto it).
pub fn self_id() -> Option<ActorId> {
    let tid = std::thread::current().id();
    runtime().registry.lookup_by_thread(tid).map(|s| s.id)
}

/// allocate `size` tracked bytes, charged to the calling actor. A no-op
/// caller (not a registered actor) still gets a valid, globally tracked
/// block; it is simply not charged against anyone and will only go away
/// via [`release`] or the final leak sweep in [`crate::shutdown`].
pub fn alloc(size: usize) -> Block {
    let block = runtime().allocator.alloc(size);
    if let Some(me) = self_id() {
        charge(&me, block.id);
    }
    block
}

/// increment `block`'s refcount and charge the retain to the calling actor.
pub fn retain(block: &Block) {
    runtime().allocator.retain(block);
    if let Some(me) = self_id() {
        charge(&me, block.id);
    }
}

/// anything that can be released exactly once by the calling actor:
/// either a raw [`Block`] obtained from `alloc`/`retain`, or a received
/// [`Message`] (releasing its payload, if any).
pub trait Releasable {
    fn release_charge(self, owner: ActorId);
}

impl Releasable for Block {
    fn release_charge(self, owner: ActorId) {
        if let Some(state) = runtime().registry.lookup(&owner) {
            state.handles.lock().unwrap().remove_by(|h| h.block_id == self.id);
        }
        runtime().allocator.release_id(self.id);
    }
}

impl Releasable for Message {
    fn release_charge(self, owner: ActorId) {
        if let Some(id) = self.payload_block_id() {
            if let Some(state) = runtime().registry.lookup(&owner) {
                state.handles.lock().unwrap().remove_by(|h| h.block_id == id);
            }
            runtime().allocator.release_id(id);
        }
    }
}

/// release one handle to `x` (a [`Block`] or a received [`Message`]) on
/// behalf of the calling actor. Idempotent: releasing an untracked block,
/// or releasing from a thread that is not a registered actor, is a silent
/// no-op.
pub fn release<T: Releasable>(x: T) {
    if let Some(me) = self_id() {
        x.release_charge(me);
    }
}

fn deliver_copy(dest: ActorId, msg_type: i64, data: &[u8]) {
    let Some(sender) = self_id() else { return };
    let rt = runtime();
    // the existence check, the allocation charge, and the mailbox append
    // all happen under the one registry-lock hold `with_live_actor` takes,
    // so a concurrent exit can't unregister and drain `dest`'s handles in
    // between the check and the charge (registry -> mailbox -> allocator
    // lock order: the allocator is touched here while the registry lock is
    // still held).
    let delivered = rt.registry.with_live_actor(&dest, |state| {
        let payload = if data.is_empty() {
            None
        } else {
            let block = rt.allocator.alloc_copy(data);
            state.handles.lock().unwrap().append(AllocHandle { block_id: block.id });
            Some(block)
        };
        let msg = Message::new(msg_type, sender, dest, payload);
        state.mailbox.push(msg);
    });
    if delivered.is_some() {
        debug!("send {:?} -> {:?}: type={}", sender, dest, msg_type);
    }
}

/// deliver a message that *retains* an already-tracked block instead of
/// copying it — the path [`broadcast`] uses to share one payload allocation
/// among every recipient.
fn deliver_retained(dest: ActorId, msg_type: i64, block: &Block, sender: ActorId) {
    let rt = runtime();
    rt.registry.with_live_actor(&dest, |state| {
        rt.allocator.retain(block);
        state.handles.lock().unwrap().append(AllocHandle { block_id: block.id });
        let msg = Message::new(msg_type, sender, dest, Some(block.clone()));
        state.mailbox.push(msg);
    });
}

/// send `data` to `dest` by value: the bytes are deep-copied into a fresh
/// tracked allocation charged to `dest`, so `dest`'s exit automatically
/// frees it. A no-op if `dest` is not a live actor, or if the caller is not
/// itself a registered actor.
pub fn send(dest: ActorId, msg_type: i64, data: &[u8]) {
    deliver_copy(dest, msg_type, data);
}

/// reply to the sender of `msg`, equivalent to `send(msg.sender, ...)`.
pub fn reply(msg: &Message, msg_type: i64, data: &[u8]) {
    deliver_copy(msg.sender, msg_type, data);
}

/// deliver one logical message to every actor registered at the instant of
/// the snapshot. The payload is deep-copied exactly once and then shared
/// (retained) across recipients, so the copy survives for as long as any
/// recipient still holds it.
pub fn broadcast(msg_type: i64, data: &[u8]) {
    let Some(sender) = self_id() else { return };
    let recipients = runtime().registry.snapshot_ids();

    if data.is_empty() {
        for dest in recipients {
            deliver_copy(dest, msg_type, data);
        }
        return;
    }

    // charged to no actor (a transient sender charge): we hold the one
    // initial refcount ourselves and drop it once every recipient has had
    // a chance to retain its own share.
    let shared = runtime().allocator.alloc_copy(data);
    for dest in recipients {
        deliver_retained(dest, msg_type, &shared, sender);
    }
    // drop the sender's transient charge: if every recipient retained it,
    // it survives; otherwise it is freed right here.
    runtime().allocator.release_id(shared.id);
}

/// block until a message arrives, indefinitely.
pub fn receive() -> Option<Message> {
    receive_timeout(None)
}

/// block until a message arrives or `timeout` elapses. `None` timeout
/// blocks indefinitely, matching [`receive`]. Returns `None` only when the
/// timeout elapsed with an empty mailbox.
pub fn receive_timeout(timeout: Option<Duration>) -> Option<Message> {
    let me = self_id()?;
    let state = runtime().registry.lookup(&me)?;
    state.mailbox.wait_pop(timeout)
}
