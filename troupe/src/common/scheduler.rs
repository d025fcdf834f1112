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

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::message::{ActorError, ActorId};
use crate::traits::Reference;

/// Identifies a timer within its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// A periodic timer, named by the caller.
    Named(String),
    /// A one-shot timer, numbered by the scheduler.
    Sequence(u64),
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKey::Named(name) => f.write_str(name),
            TimerKey::Sequence(number) => write!(f, "once-{number}"),
        }
    }
}

/// A running timer. Cancelling it stops future firings; dropping it does not.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    owner: ActorId,
    key: TimerKey,
    serial: u64,
    token: CancellationToken,
}

impl TimerHandle {
    /// The actor the timer delivers to.
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// The timer's key within its owner.
    pub fn key(&self) -> &TimerKey {
        &self.key
    }

    /// Stops the timer. It will not fire again.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the timer was cancelled, explicitly or because its owner shut down.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Default)]
struct SchedulerInner {
    periodic: DashMap<(ActorId, String), TimerHandle>,
    once: DashMap<(ActorId, u64), TimerHandle>,
    serial: AtomicU64,
    runtime: Option<Handle>,
}

/// Periodic and one-shot timers bound to actor references.
///
/// Timers only ever call [`Reference::tell`] or [`Reference::shutdown`] on their target; they
/// never touch a mailbox directly. All timers owned by an actor are cancelled when that actor
/// shuts down. Timers run on the Tokio runtime, so scheduling requires one.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

impl Scheduler {
    /// Creates an empty scheduler. Timers run on the runtime current at this call, if any,
    /// otherwise on whichever runtime schedules them.
    pub fn new() -> Self {
        match Handle::try_current() {
            Ok(runtime) => Self::on_runtime(runtime),
            Err(_) => Self::default(),
        }
    }

    pub(crate) fn on_runtime(runtime: Handle) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                runtime: Some(runtime),
                ..SchedulerInner::default()
            }),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        match &self.inner.runtime {
            Some(runtime) => {
                runtime.spawn(task);
            }
            None => {
                tokio::spawn(task);
            }
        }
    }

    fn next_serial(&self) -> u64 {
        self.inner.serial.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends a clone of `message` to `target` after `initial_delay` and then every `interval`.
    ///
    /// Fails with [`ActorError::DuplicateTimer`] if `target` already has a periodic timer named
    /// `name`. The timer ends by itself once the target stops accepting messages. A zero
    /// interval is treated as one millisecond.
    pub fn start_periodic<R>(
        &self,
        target: &R,
        name: &str,
        message: R::Message,
        initial_delay: Duration,
        interval: Duration,
    ) -> Result<TimerHandle, ActorError>
    where
        R: Reference,
        R::Message: Clone,
    {
        let key = (target.id(), name.to_string());
        let handle = match self.inner.periodic.entry(key.clone()) {
            Entry::Occupied(_) => {
                return Err(ActorError::DuplicateTimer {
                    owner: target.name().to_string(),
                    timer: name.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                let handle = TimerHandle {
                    owner: target.id(),
                    key: TimerKey::Named(name.to_string()),
                    serial: self.next_serial(),
                    token: CancellationToken::new(),
                };
                slot.insert(handle.clone());
                handle
            }
        };
        debug!(actor = %target.name(), timer = name, ?interval, "periodic timer started");

        let scheduler = self.clone();
        let target = target.clone();
        let token = handle.token.clone();
        let serial = handle.serial;
        let interval = interval.max(Duration::from_millis(1));
        self.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if !target.tell(message.clone(), None) {
                            trace!(actor = %target.name(), timer = %key.1, "target gone, timer ends");
                            break;
                        }
                    }
                }
            }
            scheduler
                .inner
                .periodic
                .remove_if(&key, |_, current| current.serial == serial);
        });

        Ok(handle)
    }

    /// Sends `message` to `target` once, after `delay`.
    pub fn schedule_once<R: Reference>(
        &self,
        target: &R,
        message: R::Message,
        delay: Duration,
    ) -> TimerHandle {
        let receiver = target.clone();
        self.once_with(target.id(), delay, move || {
            receiver.tell(message, None);
        })
    }

    /// Shuts `target` down after `delay`.
    pub fn schedule_shutdown<R: Reference>(&self, target: &R, delay: Duration) -> TimerHandle {
        let receiver = target.clone();
        self.once_with(target.id(), delay, move || {
            receiver.shutdown();
        })
    }

    fn once_with<F>(&self, owner: ActorId, delay: Duration, action: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let serial = self.next_serial();
        let handle = TimerHandle {
            owner,
            key: TimerKey::Sequence(serial),
            serial,
            token: CancellationToken::new(),
        };
        self.inner.once.insert((owner, serial), handle.clone());

        let scheduler = self.clone();
        let token = handle.token.clone();
        self.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    scheduler.inner.once.remove(&(owner, serial));
                    action();
                    return;
                }
            }
            scheduler.inner.once.remove(&(owner, serial));
        });

        handle
    }

    /// Cancels and forgets the periodic timer `name` of `target`.
    pub fn stop_periodic<R: Reference>(&self, target: &R, name: &str) -> Result<(), ActorError> {
        match self.inner.periodic.remove(&(target.id(), name.to_string())) {
            Some((_, handle)) => {
                handle.cancel();
                debug!(actor = %target.name(), timer = name, "periodic timer stopped");
                Ok(())
            }
            None => Err(ActorError::TimerNotFound {
                owner: target.name().to_string(),
                timer: name.to_string(),
            }),
        }
    }

    /// Cancels every timer owned by `target`. Returns how many were cancelled.
    pub fn stop_all<R: Reference>(&self, target: &R) -> usize {
        self.cancel_owned(target.id())
    }

    pub(crate) fn cancel_owned(&self, owner: ActorId) -> usize {
        let mut cancelled = 0;
        self.inner.periodic.retain(|(id, _), handle| {
            if *id == owner {
                handle.cancel();
                cancelled += 1;
                false
            } else {
                true
            }
        });
        self.inner.once.retain(|(id, _), handle| {
            if *id == owner {
                handle.cancel();
                cancelled += 1;
                false
            } else {
                true
            }
        });
        cancelled
    }

    /// Whether `target` has a periodic timer named `name`.
    pub fn has_periodic<R: Reference>(&self, target: &R, name: &str) -> bool {
        self.inner
            .periodic
            .contains_key(&(target.id(), name.to_string()))
    }

    /// Number of timers that have not fired or been cancelled yet.
    pub fn active_timers(&self) -> usize {
        self.inner.periodic.len() + self.inner.once.len()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("periodic", &self.inner.periodic.len())
            .field("once", &self.inner.once.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_keys_display() {
        assert_eq!(TimerKey::Named("tick".into()).to_string(), "tick");
        assert_eq!(TimerKey::Sequence(4).to_string(), "once-4");
    }

    #[tokio::test]
    async fn cancel_owned_only_touches_that_owner() {
        let scheduler = Scheduler::new();
        let first = ActorId::next();
        let second = ActorId::next();
        let a = scheduler.once_with(first, Duration::from_secs(60), || {});
        let b = scheduler.once_with(first, Duration::from_secs(60), || {});
        let c = scheduler.once_with(second, Duration::from_secs(60), || {});
        assert_eq!(scheduler.active_timers(), 3);

        assert_eq!(scheduler.cancel_owned(first), 2);
        assert!(a.is_cancelled() && b.is_cancelled());
        assert!(!c.is_cancelled());
        assert_eq!(scheduler.active_timers(), 1);
        assert_eq!(a.key(), &TimerKey::Sequence(a.serial));
        assert_eq!(c.owner(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_runs_once_and_forgets_itself() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        scheduler.once_with(ActorId::next(), Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active_timers(), 0);
    }
}
