/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */

//! per-actor FIFO mailbox: a message list guarded by a dedicated mutex and
//! signaled through a dedicated condition variable.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::list::TrackedList;
use crate::message::Message;

pub(crate) struct Mailbox {
    queue: Mutex<TrackedList<Message>>,
    cond: Condvar,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Mailbox {
            queue: Mutex::new(TrackedList::new()),
            cond: Condvar::new(),
        }
    }

    /// append a message and wake exactly one waiter. Called with the
    /// registry lock already held by the sender, per the strict
    /// registry -> mailbox lock order.
    pub(crate) fn push(&self, msg: Message) {
        let mut queue = self.queue.lock().unwrap();
        queue.append(msg);
        self.cond.notify_one();
    }

    /// attempt a non-blocking pop; used both as the fast path and as the
    /// "one more pop" after a wait/timeout.
    pub(crate) fn try_pop(&self) -> Option<Message> {
        self.queue.lock().unwrap().pop_front()
    }

    /// block until a message is available or `timeout` elapses (`None`
    /// means wait indefinitely). Returns `None` only on a genuine timeout
    /// with an empty mailbox.
    pub(crate) fn wait_pop(&self, timeout: Option<Duration>) -> Option<Message> {
        let mut queue = self.queue.lock().unwrap();
        let deadline = timeout.map(|d| std::time::Instant::now() + d);
        loop {
            if let Some(msg) = queue.pop_front() {
                return Some(msg);
            }
            match deadline {
                None => {
                    queue = self.cond.wait(queue).unwrap();
                }
                Some(deadline) => {
                    let now = std::time::Instant::now();
                    if now >= deadline {
                        return queue.pop_front();
                    }
                    let (guard, result) = self.cond.wait_timeout(queue, deadline - now).unwrap();
                    queue = guard;
                    if result.timed_out() {
                        // one more pop attempt, then give up
                        return queue.pop_front();
                    }
                }
            }
        }
    }
}
