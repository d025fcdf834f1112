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
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

/// The completing half of a request/response exchange.
///
/// A `Promise` is consumed by [`fulfill`](Promise::fulfill) or [`complete`](Promise::complete),
/// so it can be completed at most once. Dropping it without completing resolves every waiter
/// with [`Cancelled`].
pub struct Promise<T> {
    sender: oneshot::Sender<Option<T>>,
}

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a linked promise and reply.
    pub fn pair() -> (Promise<T>, Reply<T>) {
        let (sender, receiver) = oneshot::channel();
        let inner = receiver.map(|outcome| outcome.map_err(|_| Cancelled)).boxed().shared();
        (Promise { sender }, Reply { inner })
    }
}

impl<T> Promise<T> {
    /// Resolves the reply with a value. Returns `false` if every waiter has gone away.
    pub fn fulfill(self, value: T) -> bool {
        self.complete(Some(value))
    }

    /// Resolves the reply with a value or with "no value".
    pub fn complete(self, value: Option<T>) -> bool {
        self.sender.send(value).is_ok()
    }

    /// Returns `true` once nobody is waiting on the reply anymore.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("abandoned", &self.sender.is_closed())
            .finish()
    }
}

/// The promise was dropped before it was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the reply was cancelled before it was completed")
    }
}

impl std::error::Error for Cancelled {}

type SharedOutcome<T> = Shared<BoxFuture<'static, Result<Option<T>, Cancelled>>>;

/// The awaiting half of a request/response exchange.
///
/// Clones observe the same outcome, so several tasks may wait on one ask.
pub struct Reply<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: SharedOutcome<T>,
}

impl<T> Reply<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A reply that is already cancelled.
    pub fn cancelled() -> Self {
        let inner = future::ready(Err(Cancelled)).boxed().shared();
        Self { inner }
    }

    /// The outcome, if the promise has already been completed or dropped.
    pub fn peek(&self) -> Option<Result<Option<T>, Cancelled>> {
        self.inner.peek().cloned()
    }

    /// Returns `true` once the outcome is known and has been observed by a poll.
    pub fn is_completed(&self) -> bool {
        self.inner.peek().is_some()
    }
}

impl<T> Clone for Reply<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Future for Reply<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<Option<T>, Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T> fmt::Debug for Reply<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply").field("outcome", &self.peek()).finish()
    }
}
