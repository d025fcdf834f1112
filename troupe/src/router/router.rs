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

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{trace, warn};

use crate::actor::{Context, ReplyContext, ReplyRef};
use crate::traits::{Actor, Reference, ReplyActor, RoutingStrategy};

/// An actor that forwards each message to one routee of a fixed pool.
///
/// The original sender travels with the forwarded message. Spawn it like any other actor:
///
/// ```rust,ignore
/// let router = system.spawn_with(
///     Some("workers"),
///     &|_: &mut SpawnContext, pool| Ok(Router::new(pool, RoundRobin::new())),
///     workers,
/// )?;
/// ```
pub struct Router<R, S> {
    pool: Vec<R>,
    strategy: S,
}

impl<R, S> Router<R, S>
where
    R: Reference,
    S: RoutingStrategy<R::Message>,
{
    /// Creates a router over `pool`.
    pub fn new(pool: Vec<R>, strategy: S) -> Self {
        Self { pool, strategy }
    }

    /// The routees, in pool order.
    pub fn pool(&self) -> &[R] {
        &self.pool
    }
}

#[async_trait]
impl<R, S> Actor for Router<R, S>
where
    R: Reference,
    S: RoutingStrategy<R::Message>,
{
    type Message = R::Message;

    async fn receive(&mut self, message: R::Message, ctx: &mut Context) -> anyhow::Result<()> {
        let Some(index) = self.strategy.select(&message, &self.pool) else {
            warn!(router = %ctx.name(), "no routee available, message dropped");
            return Ok(());
        };
        let routee = self.pool.get(index).ok_or_else(|| {
            anyhow!("strategy picked routee {index} of a pool of {}", self.pool.len())
        })?;
        trace!(router = %ctx.name(), routee = %routee.name(), "forwarding");
        if !routee.tell(message, Some(ctx.sender().clone())) {
            warn!(router = %ctx.name(), routee = %routee.name(), "routee is shut down, message dropped");
        }
        Ok(())
    }
}

impl<R: Reference, S> fmt::Debug for Router<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("pool", &self.pool).finish()
    }
}

/// A request/response router.
///
/// It never answers by itself: it takes the caller's promise and forwards it with the request,
/// so the chosen routee completes it directly.
pub struct ReplyRouter<Req, Res, S> {
    pool: Vec<ReplyRef<Req, Res>>,
    strategy: S,
}

impl<Req, Res, S> ReplyRouter<Req, Res, S>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
    S: RoutingStrategy<Req>,
{
    /// Creates a router over `pool`.
    pub fn new(pool: Vec<ReplyRef<Req, Res>>, strategy: S) -> Self {
        Self { pool, strategy }
    }

    /// The routees, in pool order.
    pub fn pool(&self) -> &[ReplyRef<Req, Res>] {
        &self.pool
    }
}

#[async_trait]
impl<Req, Res, S> ReplyActor for ReplyRouter<Req, Res, S>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
    S: RoutingStrategy<Req>,
{
    type Request = Req;
    type Response = Res;

    async fn receive(
        &mut self,
        request: Req,
        ctx: &mut ReplyContext<Res>,
    ) -> anyhow::Result<Option<Res>> {
        let Some(index) = self.strategy.select(&request, &self.pool) else {
            warn!(router = %ctx.name(), "no routee available, answering with no value");
            return Ok(None);
        };
        let routee = self.pool.get(index).ok_or_else(|| {
            anyhow!("strategy picked routee {index} of a pool of {}", self.pool.len())
        })?;
        let promise = ctx.bypass_reply();
        trace!(router = %ctx.name(), routee = %routee.name(), "forwarding request");
        // A rejected request drops the promise, which cancels the caller's ask.
        routee.forward(request, Some(ctx.sender().clone()), promise);
        Ok(None)
    }
}

impl<Req, Res, S> fmt::Debug for ReplyRouter<Req, Res, S>
where
    Req: Send + 'static,
    Res: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyRouter").field("pool", &self.pool).finish()
    }
}
