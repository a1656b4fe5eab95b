/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! the immutable message record delivered through mailboxes.

use crate::alloc::Block;
use crate::registry::ActorId;

/// reserved message type delivered to a linked parent when a trapped child
/// exits.
pub const EXITED: i64 = i64::MIN;

/// an immutable record carrying a type tag, sender/destination identifiers,
/// and a read-only payload.
///
/// There is no public constructor: a `Message` only ever comes from
/// [`crate::receive`]/[`crate::receive_timeout`], and is only ever produced
/// internally by `send`/`reply`/`broadcast`, which guarantees the "appended
/// to a mailbox only while the recipient is registered" invariant holds by
/// construction.
#[derive(Debug)]
pub struct Message {
    pub msg_type: i64,
    pub sender: ActorId,
    pub dest: ActorId,
    pub(crate) payload: Option<Block>,
}

impl Message {
    pub(crate) fn new(msg_type: i64, sender: ActorId, dest: ActorId, payload: Option<Block>) -> Self {
        Message { msg_type, sender, dest, payload }
    }

    /// the payload bytes, read-only. Empty (not missing) for a zero-length
    /// send.
    pub fn data(&self) -> &[u8] {
        self.payload.as_ref().map(Block::data).unwrap_or(&[])
    }

    pub fn size(&self) -> usize {
        self.payload.as_ref().map(Block::len).unwrap_or(0)
    }

    pub(crate) fn payload_block_id(&self) -> Option<u64> {
        self.payload.as_ref().map(|b| b.id)
    }
}
