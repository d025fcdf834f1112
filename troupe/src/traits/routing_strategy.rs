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

use crate::traits::Reference;

/// Picks the routee that receives a message.
///
/// A strategy is owned by its router actor, so `select` is never called concurrently and may
/// keep mutable state.
pub trait RoutingStrategy<M>: Send + 'static {
    /// Index into `pool` of the chosen routee, or `None` when the pool is empty.
    fn select<R: Reference>(&mut self, message: &M, pool: &[R]) -> Option<usize>;
}
