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

use crate::traits::{Reference, RoutingStrategy};

/// Routes to the least busy routee, by a point-in-time look at each mailbox.
///
/// Prefers the first idle routee, then the first one with an empty mailbox, then the one with
/// the fewest queued messages (earliest in the pool on ties). Nothing stops the picked routee
/// from getting busier between the look and the delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeastLoaded;

impl<M> RoutingStrategy<M> for LeastLoaded {
    fn select<R: Reference>(&mut self, _message: &M, pool: &[R]) -> Option<usize> {
        pool.iter()
            .position(Reference::is_idle)
            .or_else(|| pool.iter().position(|routee| routee.queued() == 0))
            .or_else(|| {
                pool.iter()
                    .enumerate()
                    .min_by_key(|(_, routee)| routee.queued())
                    .map(|(index, _)| index)
            })
    }
}
