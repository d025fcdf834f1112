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
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::actor::runner::{ErasedRunner, Runner};
use crate::message::{ActorId, ActorName, Address, Envelope};
use crate::traits::Reference;

/// A cloneable handle for fire-and-forget delivery to an actor that accepts `M`.
///
/// Sending never blocks and never fails loudly: once the actor has been shut down, messages are
/// dropped and [`send`](ActorRef::send) returns `false`.
pub struct ActorRef<M> {
    runner: Arc<Runner<Envelope<M>>>,
}

impl<M: Send + 'static> ActorRef<M> {
    pub(crate) fn from_runner(runner: Arc<Runner<Envelope<M>>>) -> Self {
        Self { runner }
    }

    /// Sends a message with the system sentinel as sender.
    pub fn send(&self, message: M) -> bool {
        self.send_from(message, None)
    }

    /// Sends a message on behalf of `sender`.
    pub fn send_from(&self, message: M, sender: Option<Address>) -> bool {
        let sender = self.runner.sender_or_nobody(sender);
        self.runner.post(Envelope::new(message, sender))
    }
}

#[async_trait]
impl<M: Send + 'static> Reference for ActorRef<M> {
    type Message = M;

    fn address(&self) -> Address {
        Address::new(Arc::clone(&self.runner) as Arc<dyn ErasedRunner>)
    }

    fn name(&self) -> &ActorName {
        &self.runner.meta().name
    }

    fn id(&self) -> ActorId {
        self.runner.meta().id
    }

    fn is_alive(&self) -> bool {
        self.runner.is_alive()
    }

    fn is_idle(&self) -> bool {
        self.runner.is_idle()
    }

    fn queued(&self) -> usize {
        self.runner.queued()
    }

    fn tell(&self, message: M, sender: Option<Address>) -> bool {
        self.send_from(message, sender)
    }

    fn shutdown(&self) -> bool {
        self.runner.shutdown()
    }

    #[instrument(skip(self), fields(actor = %self.name()))]
    async fn graceful_shutdown(&self, max_wait: Duration) -> bool {
        self.runner.graceful_shutdown(max_wait).await
    }
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<M: Send + 'static> PartialEq for ActorRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<M: Send + 'static> Eq for ActorRef<M> {}

impl<M: Send + 'static> Hash for ActorRef<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<M: Send + 'static> fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("name", self.name())
            .field("id", &self.id())
            .field("alive", &self.is_alive())
            .finish()
    }
}
