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


use std::time::Duration;

use troupe::prelude::*;

use crate::setup::actors::Probe;

/// Records the size of every batch, then lingers so the next batch can build up.
#[troupe_actor]
pub struct Batcher {
    pub probe: Probe,
    pub linger: Duration,
}

impl Batcher {
    pub fn observed(
        _ctx: &mut SpawnContext,
        (probe, linger): (Probe, Duration),
    ) -> anyhow::Result<Self> {
        Ok(Self { probe, linger })
    }
}

#[async_trait]
impl AggregateActor for Batcher {
    type Message = u64;

    async fn receive_batch(
        &mut self,
        batch: Vec<Envelope<u64>>,
        _ctx: &mut Context,
    ) -> anyhow::Result<()> {
        self.probe.record_batch(batch.len());
        for envelope in batch {
            let (value, sender) = envelope.into_parts();
            self.probe.record(value, sender);
        }
        tokio::time::sleep(self.linger).await;
        Ok(())
    }
}
