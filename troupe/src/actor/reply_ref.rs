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
use tracing::{instrument, trace, warn};

use crate::actor::runner::{ErasedRunner, Runner};
use crate::message::{
    ActorError, ActorId, ActorName, Address, Cancelled, Promise, Reply, ReplyEnvelope,
};
use crate::traits::Reference;

/// A cloneable handle to an actor that answers `Req` with `Res`.
///
/// Besides fire-and-forget delivery through [`Reference::tell`], it supports asking: the
/// request travels with a [`Promise`] that the actor completes once. Asking a shut-down actor
/// fails with [`ActorError::Cancelled`] right away.
pub struct ReplyRef<Req, Res> {
    runner: Arc<Runner<ReplyEnvelope<Req, Res>>>,
}

impl<Req, Res> ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    pub(crate) fn from_runner(runner: Arc<Runner<ReplyEnvelope<Req, Res>>>) -> Self {
        Self { runner }
    }

    /// Sends a request and returns its reply without waiting for it.
    pub fn request(&self, request: Req) -> Reply<Res> {
        self.request_from(request, None)
    }

    /// Sends a request on behalf of `sender` and returns its reply without waiting for it.
    pub fn request_from(&self, request: Req, sender: Option<Address>) -> Reply<Res> {
        let (promise, reply) = Promise::pair();
        // A rejected envelope drops its promise, which cancels the reply.
        self.forward(request, sender, Some(promise));
        reply
    }

    /// Asks and waits for the response without a deadline.
    pub async fn ask(&self, request: Req) -> Result<Option<Res>, ActorError> {
        self.ask_with(request, None, None).await
    }

    /// Asks on behalf of `sender`.
    pub async fn ask_from(&self, request: Req, sender: Address) -> Result<Option<Res>, ActorError> {
        self.ask_with(request, Some(sender), None).await
    }

    /// Asks and gives up waiting after `timeout`.
    ///
    /// The actor still processes the request; a late response is discarded.
    pub async fn ask_timeout(
        &self,
        request: Req,
        timeout: Duration,
    ) -> Result<Option<Res>, ActorError> {
        self.ask_with(request, None, Some(timeout)).await
    }

    /// Asks with every option spelled out.
    ///
    /// Resolves to `Ok(None)` when the actor's receive logic failed or chose not to answer.
    #[instrument(skip(self, request, sender), fields(actor = %self.name()))]
    pub async fn ask_with(
        &self,
        request: Req,
        sender: Option<Address>,
        timeout: Option<Duration>,
    ) -> Result<Option<Res>, ActorError> {
        let reply = self.request_from(request, sender);
        let outcome = match timeout {
            None => reply.await,
            Some(limit) => match tokio::time::timeout(limit, reply).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(?limit, "ask timed out");
                    return Err(ActorError::AskTimeout {
                        actor: self.name().to_string(),
                        after: limit,
                    });
                }
            },
        };
        outcome.map_err(|Cancelled| ActorError::Cancelled {
            actor: self.name().to_string(),
        })
    }

    /// Enqueues a request that carries someone else's promise.
    ///
    /// Routers use this to let the chosen routee answer the original caller directly.
    pub fn forward(
        &self,
        request: Req,
        sender: Option<Address>,
        promise: Option<Promise<Res>>,
    ) -> bool {
        let sender = self.runner.sender_or_nobody(sender);
        let accepted = self.runner.post(ReplyEnvelope::new(request, sender, promise));
        if !accepted {
            trace!(actor = %self.name(), "request rejected, actor is shut down");
        }
        accepted
    }
}

#[async_trait]
impl<Req, Res> Reference for ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    type Message = Req;

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

    fn tell(&self, message: Req, sender: Option<Address>) -> bool {
        self.forward(message, sender, None)
    }

    fn shutdown(&self) -> bool {
        self.runner.shutdown()
    }

    #[instrument(skip(self), fields(actor = %self.name()))]
    async fn graceful_shutdown(&self, max_wait: Duration) -> bool {
        self.runner.graceful_shutdown(max_wait).await
    }
}

impl<Req, Res> Clone for ReplyRef<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
        }
    }
}

impl<Req, Res> PartialEq for ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<Req, Res> Eq for ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
}

impl<Req, Res> Hash for ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl<Req, Res> fmt::Debug for ReplyRef<Req, Res>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyRef")
            .field("name", self.name())
            .field("id", &self.id())
            .field("alive", &self.is_alive())
            .finish()
    }
}
