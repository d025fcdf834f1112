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

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::message::{ActorId, ActorName, Address};

/// What every actor handle can do, regardless of the actor kind behind it.
///
/// Registries, the scheduler and routers are written against this trait, so they work the same
/// for [`ActorRef`](crate::ActorRef) and [`ReplyRef`](crate::ReplyRef).
#[async_trait]
pub trait Reference: Clone + Debug + Send + Sync + 'static {
    /// The message type delivered by [`tell`](Reference::tell).
    type Message: Send + 'static;

    /// The type-erased address, usable as a sender.
    fn address(&self) -> Address;

    /// The actor's name.
    fn name(&self) -> &ActorName;

    /// The actor's process-unique id.
    fn id(&self) -> ActorId;

    /// `false` once the actor has been shut down.
    fn is_alive(&self) -> bool;

    /// `true` while no drain loop is running for the actor.
    fn is_idle(&self) -> bool;

    /// Number of envelopes waiting in the mailbox.
    fn queued(&self) -> usize;

    /// Fire-and-forget delivery. Returns `false` if the actor was already shut down.
    fn tell(&self, message: Self::Message, sender: Option<Address>) -> bool;

    /// Stops the actor immediately. Only the first call returns `true`.
    fn shutdown(&self) -> bool;

    /// Lets the mailbox drain for up to `max_wait`, then stops the actor.
    ///
    /// Returns `true` when the mailbox drained in time, `false` when the shutdown had to be
    /// forced or another graceful shutdown was already in flight.
    async fn graceful_shutdown(&self, max_wait: Duration) -> bool;
}
