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

use static_assertions::assert_impl_all;

use crate::message::{Address, Promise};

/// A queued message together with the address of whoever sent it.
///
/// The sender is never absent: when a message is sent without one, the sentinel address of the
/// system is recorded instead, so receivers can always reply or compare without a null check.
pub struct Envelope<M> {
    message: M,
    sender: Address,
}

impl<M> Envelope<M> {
    pub(crate) fn new(message: M, sender: Address) -> Self {
        Self { message, sender }
    }

    /// The carried message.
    #[inline]
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Who sent the message.
    #[inline]
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// Consumes the envelope, keeping only the message.
    pub fn into_message(self) -> M {
        self.message
    }

    /// Consumes the envelope into its message and sender.
    pub fn into_parts(self) -> (M, Address) {
        (self.message, self.sender)
    }
}

impl<M: fmt::Debug> fmt::Debug for Envelope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("message", &self.message)
            .field("sender", &self.sender)
            .finish()
    }
}

/// An envelope for a reply-capable actor. `promise` is absent for fire-and-forget delivery.
pub(crate) struct ReplyEnvelope<Req, Res> {
    pub(crate) request: Req,
    pub(crate) sender: Address,
    pub(crate) promise: Option<Promise<Res>>,
}

impl<Req, Res> ReplyEnvelope<Req, Res> {
    pub(crate) fn new(request: Req, sender: Address, promise: Option<Promise<Res>>) -> Self {
        Self {
            request,
            sender,
            promise,
        }
    }
}

assert_impl_all!(Envelope<String>: Send, Sync);
assert_impl_all!(ReplyEnvelope<String, u64>: Send);
