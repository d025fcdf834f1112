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

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::actor::dispatch::{Dispatcher, Scope};
use crate::actor::mailbox::{Mailbox, Recheck};
use crate::common::Scheduler;
use crate::message::{ActorId, ActorName, Address};
use crate::traits::ErrorSink;

/// A one-shot observer fired when the runner is shut down.
pub(crate) type ShutdownHook = Box<dyn FnOnce() + Send + 'static>;

/// Identity shared by every handle to one runner.
#[derive(Debug)]
pub(crate) struct RunnerMeta {
    pub(crate) id: ActorId,
    pub(crate) name: ActorName,
    pub(crate) actor_type: &'static str,
    pub(crate) sentinel: bool,
}

impl RunnerMeta {
    pub(crate) fn new(name: ActorName, actor_type: &'static str) -> Self {
        Self {
            id: ActorId::next(),
            name,
            actor_type,
            sentinel: false,
        }
    }

    pub(crate) fn sentinel(name: ActorName, actor_type: &'static str) -> Self {
        Self {
            sentinel: true,
            ..Self::new(name, actor_type)
        }
    }
}

/// Everything a runner needs from its system, gathered before the actor itself is built.
pub(crate) struct RunnerSeed {
    pub(crate) meta: RunnerMeta,
    pub(crate) scheduler: Scheduler,
    pub(crate) nobody: Option<Address>,
    pub(crate) sink: Option<Arc<dyn ErrorSink>>,
    pub(crate) runtime: Handle,
}

/// Owns one actor (inside its dispatcher) and the mailbox feeding it.
///
/// Producers call [`post`](Runner::post) from any thread, inside a runtime or not: drain loops
/// are started on the runtime captured at spawn time. At most one drain loop runs at a time;
/// the loop holds the dispatcher lock for its whole lifetime, so even a loop started while the
/// previous one is still unwinding waits instead of overlapping.
pub(crate) struct Runner<E> {
    meta: RunnerMeta,
    mailbox: Mailbox<E>,
    dispatcher: tokio::sync::Mutex<Box<dyn Dispatcher<E>>>,
    scheduler: Scheduler,
    nobody: Option<Address>,
    sink: Option<Arc<dyn ErrorSink>>,
    runtime: Handle,
    hooks: parking_lot::Mutex<Vec<ShutdownHook>>,
}

impl<E: Send + 'static> Runner<E> {
    pub(crate) fn launch(
        seed: RunnerSeed,
        dispatcher: Box<dyn Dispatcher<E>>,
        hooks: Vec<ShutdownHook>,
    ) -> Arc<Self> {
        trace!(actor = %seed.meta.name, id = %seed.meta.id, "runner created");
        Arc::new(Self {
            meta: seed.meta,
            mailbox: Mailbox::new(),
            dispatcher: tokio::sync::Mutex::new(dispatcher),
            scheduler: seed.scheduler,
            nobody: seed.nobody,
            sink: seed.sink,
            runtime: seed.runtime,
            hooks: parking_lot::Mutex::new(hooks),
        })
    }

    #[inline]
    pub(crate) fn meta(&self) -> &RunnerMeta {
        &self.meta
    }

    /// The given sender, or the sentinel. The sentinel runner is its own fallback.
    pub(crate) fn sender_or_nobody(self: &Arc<Self>, sender: Option<Address>) -> Address {
        match sender {
            Some(sender) => sender,
            None => match &self.nobody {
                Some(nobody) => nobody.clone(),
                None => Address::new(Arc::clone(self) as Arc<dyn ErasedRunner>),
            },
        }
    }

    /// Enqueues an envelope, starting a drain loop if none owns the mailbox.
    ///
    /// Returns `false` (and drops the envelope) once the runner has been shut down.
    pub(crate) fn post(self: &Arc<Self>, envelope: E) -> bool {
        if !self.mailbox.is_alive() {
            trace!(actor = %self.meta.name, "dropping message for a shut-down actor");
            return false;
        }
        self.mailbox.push(envelope);
        if self.mailbox.activate() {
            trace!(actor = %self.meta.name, "starting drain loop");
            self.runtime.spawn(Arc::clone(self).drive());
        }
        true
    }

    async fn drive(self: Arc<Self>) {
        let mut dispatcher = self.dispatcher.lock().await;
        let scope = Scope::new(
            Address::new(Arc::clone(&self) as Arc<dyn ErasedRunner>),
            self.scheduler.clone(),
            self.sink.clone(),
        );

        loop {
            dispatcher.run_pass(&self.mailbox, &scope).await;

            if !self.mailbox.is_alive() {
                self.mailbox.release();
                let abandoned = self.mailbox.purge();
                debug!(actor = %self.meta.name, abandoned, "drain loop stopped by shutdown");
                self.mailbox.notify_drained(false);
                return;
            }

            if self.mailbox.try_release() {
                // A push that landed between the last dequeue and the release saw the loop
                // still active and did not start a new one, so look again before leaving.
                match self.mailbox.recheck() {
                    Recheck::Drained => {
                        trace!(actor = %self.meta.name, "drain loop idle");
                        return;
                    }
                    Recheck::HandedOver => {
                        trace!(actor = %self.meta.name, "handed mailbox to a newer drain loop");
                        return;
                    }
                    Recheck::Reclaimed => {
                        trace!(actor = %self.meta.name, "reclaimed mailbox after release");
                    }
                }
            }
        }
    }

    /// Stops accepting messages. Only the first call returns `true` and fires the hooks.
    pub(crate) fn shutdown(&self) -> bool {
        if !self.mailbox.close() {
            return false;
        }
        debug!(actor = %self.meta.name, id = %self.meta.id, "actor shut down");

        let hooks = std::mem::take(&mut *self.hooks.lock());
        for hook in hooks {
            hook();
        }

        let timers = self.scheduler.cancel_owned(self.meta.id);
        if timers > 0 {
            trace!(actor = %self.meta.name, timers, "cancelled timers");
        }

        if self.mailbox.is_idle() {
            self.mailbox.purge();
        }
        self.mailbox.notify_drained(false);
        true
    }

    /// Waits for the mailbox to drain and then shuts down, forcing the shutdown after
    /// `max_wait`. Returns `true` only if the drain completed in time.
    pub(crate) async fn graceful_shutdown(&self, max_wait: Duration) -> bool {
        if !self.mailbox.is_alive() {
            return false;
        }
        if self.mailbox.is_empty() {
            return self.shutdown();
        }
        if !self.mailbox.arm_graceful() {
            debug!(actor = %self.meta.name, "graceful shutdown already in flight");
            return false;
        }

        let (waiter, drained) = oneshot::channel();
        self.mailbox.set_drain_waiter(waiter);
        if self.mailbox.is_drained() {
            self.mailbox.notify_drained(true);
        }

        tokio::select! {
            outcome = drained => match outcome {
                Ok(true) => self.shutdown(),
                _ => false,
            },
            _ = tokio::time::sleep(max_wait) => {
                warn!(
                    actor = %self.meta.name,
                    ?max_wait,
                    remaining = self.mailbox.len(),
                    "graceful shutdown timed out, forcing shutdown"
                );
                self.shutdown();
                false
            }
        }
    }

    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.mailbox.is_alive()
    }

    #[inline]
    pub(crate) fn is_idle(&self) -> bool {
        self.mailbox.is_idle()
    }

    #[inline]
    pub(crate) fn queued(&self) -> usize {
        self.mailbox.len()
    }
}

/// The message-type-independent view of a runner held by an [`Address`].
pub(crate) trait ErasedRunner: Send + Sync + 'static {
    fn meta(&self) -> &RunnerMeta;
    fn is_alive(&self) -> bool;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<E: Send + 'static> ErasedRunner for Runner<E> {
    fn meta(&self) -> &RunnerMeta {
        &self.meta
    }

    fn is_alive(&self) -> bool {
        self.mailbox.is_alive()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
