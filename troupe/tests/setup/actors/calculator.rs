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

use anyhow::bail;
use troupe::prelude::*;

use crate::setup::messages::Query;

/// Answers `Query` requests.
#[troupe_actor]
pub struct Calculator {
    pub answered: usize,
}

#[async_trait]
impl ReplyActor for Calculator {
    type Request = Query;
    type Response = u64;

    async fn receive(
        &mut self,
        request: Query,
        _ctx: &mut ReplyContext<u64>,
    ) -> anyhow::Result<Option<u64>> {
        let answer = match request {
            Query::Double(value) => Some(value * 2),
            Query::Slow(millis, value) => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Some(value)
            }
            Query::Nothing => None,
            Query::Fail => bail!("calculator refused"),
            Query::Panic => panic!("calculator panicked"),
        };
        self.answered += 1;
        Ok(answer)
    }
}
