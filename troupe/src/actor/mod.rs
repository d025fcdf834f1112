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

//! Runners and the handles that reach them.
//!
//! A runner owns one actor instance behind a dispatcher, a multi-producer queue and the two
//! flags (`idle`, `alive`) implementing the single-consumer protocol. [`ActorRef`] and
//! [`ReplyRef`] are the only way in.

pub use actor_ref::ActorRef;
pub use context::{Context, ReplyContext, SpawnContext};
pub use reply_ref::ReplyRef;

pub(crate) use dispatch::{AggregateDispatch, ReplyDispatch, SingleDispatch};
pub(crate) use nobody::launch_nobody;
pub(crate) use runner::{ErasedRunner, Runner, RunnerMeta, RunnerSeed};

mod actor_ref;
mod context;
mod dispatch;
mod mailbox;
mod nobody;
mod reply_ref;
mod runner;
