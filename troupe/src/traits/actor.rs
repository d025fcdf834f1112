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

use async_trait::async_trait;

use crate::actor::{Context, ReplyContext};
use crate::message::Envelope;

/// A fire-and-forget actor.
///
/// `receive` is never called concurrently for one instance. An `Err` (or a panic) is logged and
/// reported to the system's error sink; the next message is processed as usual.
///
/// ```rust,ignore
/// #[troupe_actor]
/// struct Counter {
///     seen: usize,
/// }
///
/// #[async_trait]
/// impl Actor for Counter {
///     type Message = u32;
///
///     async fn receive(&mut self, _message: u32, _ctx: &mut Context) -> anyhow::Result<()> {
///         self.seen += 1;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + 'static {
    /// The message type this actor accepts.
    type Message: Send + 'static;

    /// Handles one message.
    async fn receive(&mut self, message: Self::Message, ctx: &mut Context) -> anyhow::Result<()>;
}

/// A request/response actor.
///
/// The returned value completes the caller's promise. `Ok(None)` and `Err(_)` both resolve the
/// caller with "no value". An actor that hands the promise elsewhere calls
/// [`ReplyContext::bypass_reply`] and its return value is then ignored.
#[async_trait]
pub trait ReplyActor: Send + 'static {
    /// The request type this actor accepts.
    type Request: Send + 'static;
    /// The response type it produces.
    type Response: Clone + Send + Sync + 'static;

    /// Handles one request.
    async fn receive(
        &mut self,
        request: Self::Request,
        ctx: &mut ReplyContext<Self::Response>,
    ) -> anyhow::Result<Option<Self::Response>>;
}

/// An actor that consumes its mailbox in batches.
///
/// Each call receives everything that was visible in the queue when the batch was taken, in
/// arrival order. The context's sender is the sender of the last envelope; each envelope keeps
/// its own.
#[async_trait]
pub trait AggregateActor: Send + 'static {
    /// The message type this actor accepts.
    type Message: Send + 'static;

    /// Handles one batch.
    async fn receive_batch(
        &mut self,
        batch: Vec<Envelope<Self::Message>>,
        ctx: &mut Context,
    ) -> anyhow::Result<()>;
}
