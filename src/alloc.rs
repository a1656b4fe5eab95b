/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! the tracked allocator: a reference-counted allocation registry shared
//! across all actors. Every block handed out is recorded against whichever
//! actor is currently charged for it, so that actor exit can release
//! everything it still owns without the caller having to track it by hand.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::list::TrackedList;
use crate::{debug, warn};
use crate::ActorId;

/// a single tracked allocation record: the bytes and the live refcount.
struct AllocRecord {
    id: u64,
    bytes: Arc<[u8]>,
    refcount: AtomicUsize,
}

/// an opaque, cloneable handle to a tracked allocation. `Block` is the
/// public type returned by [`alloc`](crate::alloc) and embedded in
/// [`Message`](crate::Message) payloads. It exposes its contents as a
/// read-only borrow only — there is no API to mutate the bytes behind a
/// `Block` once allocated, which is how this crate satisfies the "payload
/// observable as read-only to receivers" requirement on platforms with no
/// hardware capability enforcement.
#[derive(Clone)]
pub struct Block {
    pub(crate) id: u64,
    bytes: Arc<[u8]>,
}

impl Block {
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block(id={}, len={})", self.id, self.bytes.len())
    }
}

pub(crate) struct Allocator {
    records: Mutex<TrackedList<AllocRecord>>,
    next_id: AtomicU64,
}

impl Allocator {
    pub(crate) fn new() -> Self {
        Allocator {
            records: Mutex::new(TrackedList::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// allocate `size` zeroed bytes as a fresh tracked block with refcount 1.
    /// `charge` is the actor this allocation is (also) charged against at the
    /// registry level; the caller is responsible for pushing the resulting
    /// handle id onto that actor's per-actor handle list.
    pub(crate) fn alloc_bytes(&self, bytes: Vec<u8>) -> Block {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let bytes: Arc<[u8]> = bytes.into();
        let block = Block { id, bytes: bytes.clone() };

        let mut records = self.records.lock().unwrap();
        records.append(AllocRecord { id, bytes, refcount: AtomicUsize::new(1) });
        debug!("alloc: block {} ({} bytes)", id, block.len());
        block
    }

    pub(crate) fn alloc(&self, size: usize) -> Block {
        self.alloc_bytes(vec![0u8; size])
    }

    pub(crate) fn alloc_copy(&self, data: &[u8]) -> Block {
        self.alloc_bytes(data.to_vec())
    }

    /// increment the refcount of an existing block. No-op if the block is
    /// not (or no longer) registered.
    pub(crate) fn retain(&self, block: &Block) {
        let records = self.records.lock().unwrap();
        if let Some(rec) = records.filter_first(|r| r.id == block.id) {
            rec.refcount.fetch_add(1, Ordering::AcqRel);
            debug!("retain: block {}", block.id);
        }
    }

    /// decrement the refcount for `id` by exactly one; free and remove the
    /// record once it reaches zero. No-op (not an error) if `id` is not
    /// registered — this makes double-release and release-of-untracked
    /// idempotent.
    pub(crate) fn release_id(&self, id: u64) {
        let mut records = self.records.lock().unwrap();
        let mut should_remove = false;
        if let Some(rec) = records.filter_first(|r| r.id == id) {
            let prev = rec.refcount.fetch_sub(1, Ordering::AcqRel);
            if prev == 1 {
                should_remove = true;
            }
        } else {
            return; // release on unregistered block: idempotent no-op
        }
        if should_remove {
            records.remove_by(|r| r.id == id);
            debug!("release: block {} freed", id);
        }
    }

    /// diagnostic leak sweep used by `shutdown()`. Returns the number of
    /// still-live blocks it freed.
    pub(crate) fn sweep_leaks(&self) -> usize {
        let mut records = self.records.lock().unwrap();
        let mut leaked = 0;
        while let Some(rec) = records.pop_front() {
            warn!("leaked tracked allocation: block {} ({} bytes, refcount {})",
                rec.id, rec.bytes.len(), rec.refcount.load(Ordering::Relaxed));
            leaked += 1;
        }
        leaked
    }

    #[cfg(test)]
    pub(crate) fn live_count(&self) -> usize {
        self.records.lock().unwrap().count()
    }
}

/// per-actor back-link to a tracked allocation it is charged for. One
/// handle is pushed per `alloc`/`retain` call made on behalf of that actor;
/// one handle is popped per `release` call.
#[derive(Debug)]
pub(crate) struct AllocHandle {
    pub(crate) block_id: u64,
}

/// charge an allocation handle id against `owner`'s actor state, used both
/// when constructing messages targeted at another actor (so the
/// *recipient's* exit cleans the payload up) and for plain `alloc`/`retain`
/// calls against the calling actor.
pub(crate) fn charge(owner: &ActorId, block_id: u64) {
    crate::registry::with_actor(owner, |state| {
        state.handles.lock().unwrap().append(AllocHandle { block_id });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_refcount_starts_at_one_and_release_frees() {
        let a = Allocator::new();
        let b = a.alloc_copy(b"hi");
        assert_eq!(a.live_count(), 1);
        a.release_id(b.id);
        assert_eq!(a.live_count(), 0);
    }

    #[test]
    fn test_retain_then_release_is_net_noop_on_refcount() {
        let a = Allocator::new();
        let b = a.alloc_copy(b"hi");
        a.retain(&b);
        a.release_id(b.id);
        // one retain outstanding still keeps it alive
        assert_eq!(a.live_count(), 1);
        a.release_id(b.id);
        assert_eq!(a.live_count(), 0);
    }

    #[test]
    fn test_release_of_untracked_block_is_noop() {
        let a = Allocator::new();
        a.release_id(12345); // never allocated
        assert_eq!(a.live_count(), 0);
    }

    #[test]
    fn test_double_release_only_frees_once_and_does_not_panic() {
        let a = Allocator::new();
        let b = a.alloc_copy(b"x");
        a.release_id(b.id);
        a.release_id(b.id); // second release: no matching record, no-op
        assert_eq!(a.live_count(), 0);
    }
}
