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

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::trace;

use crate::actor::dispatch::SingleDispatch;
use crate::actor::runner::{ErasedRunner, Runner, RunnerMeta, RunnerSeed};
use crate::actor::Context;
use crate::common::Scheduler;
use crate::message::{ActorName, Address, Envelope};
use crate::traits::Actor;

/// The sentinel actor. It stands in as the sender of messages sent without one and ignores
/// anything delivered to it.
#[derive(Debug, Default)]
pub(crate) struct Nobody;

#[async_trait]
impl Actor for Nobody {
    type Message = ();

    async fn receive(&mut self, _message: (), ctx: &mut Context) -> anyhow::Result<()> {
        trace!(from = %ctx.sender(), "nobody ignored a message");
        Ok(())
    }
}

/// Starts the sentinel runner of a system. Its sender fallback is itself.
pub(crate) fn launch_nobody(name: &str, scheduler: Scheduler, runtime: Handle) -> Address {
    let seed = RunnerSeed {
        meta: RunnerMeta::sentinel(ActorName::new(name), std::any::type_name::<Nobody>()),
        scheduler,
        nobody: None,
        sink: None,
        runtime,
    };
    let runner =
        Runner::<Envelope<()>>::launch(seed, Box::new(SingleDispatch::new(Nobody)), Vec::new());
    Address::new(runner as Arc<dyn ErasedRunner>)
}
