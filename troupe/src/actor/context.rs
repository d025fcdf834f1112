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
use std::ops::{Deref, DerefMut};

use crate::actor::runner::ShutdownHook;
use crate::common::Scheduler;
use crate::message::{ActorName, Address, Promise};

/// What an actor knows about the invocation it is handling.
pub struct Context {
    myself: Address,
    sender: Address,
    scheduler: Scheduler,
}

impl Context {
    pub(crate) fn new(myself: Address, sender: Address, scheduler: Scheduler) -> Self {
        Self {
            myself,
            sender,
            scheduler,
        }
    }

    /// The address of the running actor.
    #[inline]
    pub fn myself(&self) -> &Address {
        &self.myself
    }

    /// Who sent the current message. The system sentinel when no sender was given.
    #[inline]
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// The running actor's name.
    #[inline]
    pub fn name(&self) -> &ActorName {
        self.myself.name()
    }

    /// The system scheduler, for timers targeting this or any other actor.
    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("myself", &self.myself)
            .field("sender", &self.sender)
            .finish()
    }
}

/// The context of a request/response invocation.
///
/// Dereferences to [`Context`]. The caller's promise is completed with the value returned from
/// `receive` unless the actor takes it with [`bypass_reply`](ReplyContext::bypass_reply), in
/// which case completing it becomes the actor's job (or the job of whoever it hands it to).
pub struct ReplyContext<Res> {
    context: Context,
    promise: Option<Promise<Res>>,
    bypassed: bool,
}

impl<Res> ReplyContext<Res> {
    pub(crate) fn new(context: Context, promise: Option<Promise<Res>>) -> Self {
        Self {
            context,
            promise,
            bypassed: false,
        }
    }

    /// Takes the caller's promise and marks this invocation as reply-bypassed.
    ///
    /// Returns `None` if the request was sent fire-and-forget.
    pub fn bypass_reply(&mut self) -> Option<Promise<Res>> {
        self.bypassed = true;
        self.promise.take()
    }

    /// Whether [`bypass_reply`](ReplyContext::bypass_reply) was called.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Whether somebody is waiting for the response.
    pub fn expects_reply(&self) -> bool {
        self.promise.is_some()
    }

    pub(crate) fn take_promise(&mut self) -> Option<Promise<Res>> {
        self.promise.take()
    }
}

impl<Res> Deref for ReplyContext<Res> {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}

impl<Res> DerefMut for ReplyContext<Res> {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

/// Handed to an [`ActorFactory`](crate::traits::ActorFactory) while the actor is being built.
pub struct SpawnContext {
    name: ActorName,
    hooks: Vec<ShutdownHook>,
}

impl SpawnContext {
    pub(crate) fn new(name: ActorName) -> Self {
        Self {
            name,
            hooks: Vec::new(),
        }
    }

    /// The name the actor is being registered under.
    pub fn name(&self) -> &ActorName {
        &self.name
    }

    /// Subscribes to the post-shutdown notification, fired exactly once when the actor is
    /// first shut down.
    pub fn on_shutdown<F>(&mut self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    pub(crate) fn into_hooks(self) -> Vec<ShutdownHook> {
        self.hooks
    }
}

impl fmt::Debug for SpawnContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnContext")
            .field("name", &self.name)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
