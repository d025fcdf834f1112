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


use anyhow::anyhow;
use troupe::prelude::*;

use crate::setup::messages::Query;

/// Asks another `Calculator`-style actor from inside its own `receive` and adds one.
#[troupe_actor(no_default)]
pub struct Relay {
    pub upstream: ReplyRef<Query, u64>,
}

impl Relay {
    pub fn towards(_ctx: &mut SpawnContext, upstream: ReplyRef<Query, u64>) -> anyhow::Result<Self> {
        Ok(Self { upstream })
    }
}

#[async_trait]
impl ReplyActor for Relay {
    type Request = u64;
    type Response = u64;

    async fn receive(
        &mut self,
        value: u64,
        ctx: &mut ReplyContext<u64>,
    ) -> anyhow::Result<Option<u64>> {
        let answer = self
            .upstream
            .ask_from(Query::Double(value), ctx.myself().clone())
            .await?
            .ok_or_else(|| anyhow!("upstream had no answer"))?;
        Ok(Some(answer + 1))
    }
}
