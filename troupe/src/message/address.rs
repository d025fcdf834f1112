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
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::actor::{ActorRef, ErasedRunner, ReplyRef, Runner};
use crate::message::{ActorId, ActorName, Envelope, ReplyEnvelope};

/// The type-erased identity of an actor, used as the sender of a message.
///
/// An `Address` can be compared, logged and passed around without knowing the actor's message
/// type. To talk back to the actor, recover a typed handle with [`reference`](Address::reference)
/// or [`reply_reference`](Address::reply_reference).
#[derive(Clone)]
pub struct Address {
    runner: Arc<dyn ErasedRunner>,
}

impl Address {
    pub(crate) fn new(runner: Arc<dyn ErasedRunner>) -> Self {
        Self { runner }
    }

    /// The actor's name.
    pub fn name(&self) -> &ActorName {
        &self.runner.meta().name
    }

    /// The actor's process-unique id.
    pub fn id(&self) -> ActorId {
        self.runner.meta().id
    }

    /// The Rust type name of the actor behind this address.
    pub fn actor_type(&self) -> &'static str {
        self.runner.meta().actor_type
    }

    /// Returns `true` until the actor has been shut down.
    pub fn is_alive(&self) -> bool {
        self.runner.is_alive()
    }

    /// Returns `true` for the sentinel that stands in for a missing sender.
    pub fn is_nobody(&self) -> bool {
        self.runner.meta().sentinel
    }

    /// Recovers a fire-and-forget handle, if the actor accepts `M`.
    pub fn reference<M>(&self) -> Option<ActorRef<M>>
    where
        M: Send + 'static,
    {
        Arc::clone(&self.runner)
            .into_any()
            .downcast::<Runner<Envelope<M>>>()
            .ok()
            .map(ActorRef::from_runner)
    }

    /// Recovers a request/response handle, if the actor answers `Req` with `Res`.
    pub fn reply_reference<Req, Res>(&self) -> Option<ReplyRef<Req, Res>>
    where
        Req: Send + 'static,
        Res: Clone + Send + Sync + 'static,
    {
        Arc::clone(&self.runner)
            .into_any()
            .downcast::<Runner<ReplyEnvelope<Req, Res>>>()
            .ok()
            .map(ReplyRef::from_runner)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({} {})", self.name(), self.id())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}
