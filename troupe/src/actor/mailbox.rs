/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// What a drain loop found when it looked at the queue again after releasing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recheck {
    /// Nothing was queued. A pending graceful shutdown has been told the mailbox drained.
    Drained,
    /// Something was queued and this loop took the mailbox back.
    Reclaimed,
    /// Something was queued but a producer already started the next loop, which now owns the
    /// queue and any pending drain waiter.
    HandedOver,
}

/// Multi-producer queue plus the two lifecycle flags of a runner.
///
/// `idle` is the processing flag: `true` while no drain loop owns the queue. Producers swap it
/// to `false` after every push and whoever observes the previous value `true` must start the
/// drain loop. Only the drain loop sets it back to `true`.
///
/// `alive` turns `false` exactly once. Afterwards nothing is accepted and the queue is purged.
pub(crate) struct Mailbox<E> {
    sender: Sender<E>,
    receiver: Receiver<E>,
    idle: AtomicBool,
    alive: AtomicBool,
    graceful: AtomicBool,
    drained: Mutex<Option<oneshot::Sender<bool>>>,
}

impl<E> Mailbox<E> {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            idle: AtomicBool::new(true),
            alive: AtomicBool::new(true),
            graceful: AtomicBool::new(false),
            drained: Mutex::new(None),
        }
    }

    pub(crate) fn push(&self, envelope: E) {
        // The mailbox owns its receiver, so the channel can never be disconnected here.
        let _ = self.sender.send(envelope);
    }

    /// Claims the drain loop. Returns `true` if the caller flipped the flag from idle.
    pub(crate) fn activate(&self) -> bool {
        self.idle.swap(false, Ordering::AcqRel)
    }

    /// Hands the drain loop back. Fails only if someone else already marked the mailbox idle.
    pub(crate) fn try_release(&self) -> bool {
        self.idle
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Looks at the queue once more after a successful [`try_release`](Mailbox::try_release).
    pub(crate) fn recheck(&self) -> Recheck {
        if self.is_empty() {
            self.notify_drained(true);
            Recheck::Drained
        } else if self.activate() {
            Recheck::Reclaimed
        } else {
            Recheck::HandedOver
        }
    }

    pub(crate) fn release(&self) {
        self.idle.store(true, Ordering::Release);
    }

    /// Next envelope for the drain loop, or `None` once the queue is empty or the mailbox closed.
    pub(crate) fn next(&self) -> Option<E> {
        if !self.is_alive() {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Everything visible in the queue right now, in arrival order.
    pub(crate) fn take_visible(&self) -> Vec<E> {
        if !self.is_alive() {
            return Vec::new();
        }
        let visible = self.receiver.len();
        self.receiver.try_iter().take(visible).collect()
    }

    /// Drops whatever is still queued. Returns how many envelopes were abandoned.
    pub(crate) fn purge(&self) -> usize {
        self.receiver.try_iter().count()
    }

    /// Marks the mailbox as shut down. Returns `true` only for the caller that did it.
    pub(crate) fn close(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn is_idle(&self) -> bool {
        self.idle.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.is_idle() && self.is_empty()
    }

    /// Marks a graceful shutdown as in flight. Returns `false` if one already was.
    pub(crate) fn arm_graceful(&self) -> bool {
        !self.graceful.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn set_drain_waiter(&self, waiter: oneshot::Sender<bool>) {
        *self.drained.lock() = Some(waiter);
    }

    /// Wakes a pending graceful shutdown. `completed` is `false` when draining stopped early.
    pub(crate) fn notify_drained(&self, completed: bool) {
        if let Some(waiter) = self.drained.lock().take() {
            let _ = waiter.send(completed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_activation_wins_until_released() {
        let mailbox = Mailbox::<u32>::new();
        assert!(mailbox.is_idle());
        assert!(mailbox.activate());
        assert!(!mailbox.activate());
        assert!(!mailbox.is_idle());

        assert!(mailbox.try_release());
        assert!(!mailbox.try_release());
        assert!(mailbox.activate());
    }

    #[test]
    fn closed_mailbox_yields_nothing() {
        let mailbox = Mailbox::new();
        mailbox.push(1_u32);
        mailbox.push(2);
        assert_eq!(mailbox.len(), 2);
        assert!(mailbox.close());
        assert!(!mailbox.close());
        assert_eq!(mailbox.next(), None);
        assert!(mailbox.take_visible().is_empty());
        assert_eq!(mailbox.purge(), 2);
        assert!(mailbox.is_empty());
    }

    #[test]
    fn take_visible_keeps_order() {
        let mailbox = Mailbox::new();
        for value in 0..5_u32 {
            mailbox.push(value);
        }
        assert_eq!(mailbox.take_visible(), vec![0, 1, 2, 3, 4]);
        assert!(mailbox.take_visible().is_empty());
    }

    #[test]
    fn recheck_of_an_empty_queue_reports_drained() {
        let mailbox = Mailbox::<u32>::new();
        let (tx, mut rx) = oneshot::channel();
        mailbox.set_drain_waiter(tx);
        assert!(mailbox.activate());
        assert!(mailbox.try_release());

        assert_eq!(mailbox.recheck(), Recheck::Drained);
        assert!(mailbox.is_idle());
        assert_eq!(rx.try_recv(), Ok(true));
    }

    #[test]
    fn recheck_reclaims_a_late_push() {
        let mailbox = Mailbox::new();
        assert!(mailbox.activate());
        mailbox.push(7_u32);
        assert!(mailbox.try_release());

        assert_eq!(mailbox.recheck(), Recheck::Reclaimed);
        assert!(!mailbox.is_idle());
        assert_eq!(mailbox.next(), Some(7));
    }

    #[test]
    fn recheck_leaves_the_waiter_to_the_loop_that_took_over() {
        let mailbox = Mailbox::new();
        let (tx, mut rx) = oneshot::channel();
        mailbox.set_drain_waiter(tx);
        assert!(mailbox.activate());
        assert!(mailbox.try_release());
        // A producer pushes and wins the flag before the old loop looks again.
        mailbox.push(7_u32);
        assert!(mailbox.activate());

        assert_eq!(mailbox.recheck(), Recheck::HandedOver);
        assert!(rx.try_recv().is_err(), "drained was signalled with a message still queued");
        assert_eq!(mailbox.len(), 1);

        // The newer loop drains and signals in its turn.
        assert_eq!(mailbox.next(), Some(7));
        assert!(mailbox.try_release());
        assert_eq!(mailbox.recheck(), Recheck::Drained);
        assert_eq!(rx.try_recv(), Ok(true));
    }

    #[test]
    fn graceful_arms_once() {
        let mailbox = Mailbox::<()>::new();
        assert!(mailbox.arm_graceful());
        assert!(!mailbox.arm_graceful());
    }

    #[test]
    fn drain_waiter_fires_once() {
        let mailbox = Mailbox::<()>::new();
        let (tx, mut rx) = oneshot::channel();
        mailbox.set_drain_waiter(tx);
        mailbox.notify_drained(true);
        mailbox.notify_drained(false);
        assert_eq!(rx.try_recv(), Ok(true));
    }
}
