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

use anyhow::anyhow;
use troupe::prelude::*;

use crate::setup::actors::Probe;
use crate::setup::messages::Tally;

/// Records every `Tally` it receives in its probe.
#[troupe_actor]
pub struct Counter {
    pub probe: Probe,
}

impl Counter {
    /// Factory sharing `probe` with the test.
    pub fn observed(_ctx: &mut SpawnContext, probe: Probe) -> anyhow::Result<Self> {
        Ok(Self { probe })
    }
}

#[async_trait]
impl Actor for Counter {
    type Message = Tally;

    async fn receive(&mut self, message: Tally, ctx: &mut Context) -> anyhow::Result<()> {
        self.probe.enter();
        let outcome = match message {
            Tally::Add(value) => {
                // Give another drive loop the chance to run, if one (wrongly) could.
                tokio::task::yield_now().await;
                self.probe.record(value, ctx.sender().clone());
                Ok(())
            }
            Tally::Pause(millis) => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                self.probe.record(millis, ctx.sender().clone());
                Ok(())
            }
            Tally::Fail => Err(anyhow!("tally refused")),
            Tally::Panic => {
                self.probe.exit();
                panic!("tally panicked");
            }
        };
        self.probe.exit();
        outcome
    }
}
