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

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Troupe
//!
//! An in-process actor runtime built on Tokio.
//!
//! ## Key Concepts
//!
//! - **Actors**: user types implementing [`Actor`], [`ReplyActor`] or [`AggregateActor`].
//!   An actor instance handles at most one message at a time, in arrival order.
//! - **References**: [`ActorRef`] and [`ReplyRef`] are the only way to reach an actor.
//!   Senders are identified by an [`Address`].
//! - **Ask/reply**: [`ReplyRef::ask`] returns the response, or `None` when the actor failed
//!   or chose not to answer. Requests may carry a timeout.
//! - **Shutdown**: immediate ([`Reference::shutdown`]) or graceful, which waits for the
//!   mailbox to drain up to a bound.
//! - **System**: [`ActorSystem`] holds one name registry per actor kind, the [`Scheduler`]
//!   and the `nobody` sentinel used as the sender of anonymous messages.
//! - **Routers**: [`Router`] and [`ReplyRouter`] forward to a pool by [`RoundRobin`],
//!   [`HashSharding`] or [`LeastLoaded`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use troupe::prelude::*;
//!
//! #[troupe_actor]
//! struct Greeter;
//!
//! #[async_trait]
//! impl ReplyActor for Greeter {
//!     type Request = String;
//!     type Response = String;
//!
//!     async fn receive(
//!         &mut self,
//!         name: String,
//!         _ctx: &mut ReplyContext<String>,
//!     ) -> anyhow::Result<Option<String>> {
//!         Ok(Some(format!("hello, {name}")))
//!     }
//! }
//!
//! let system = ActorSystem::launch();
//! let greeter = system.spawn_reply::<Greeter>(Some("greeter"))?;
//! assert_eq!(greeter.ask("troupe".into()).await.as_deref(), Some("hello, troupe"));
//! ```

/// Runners, mailboxes, contexts and actor references.
pub(crate) mod actor;

/// The actor system, registries, scheduler and configuration.
pub(crate) mod common;

/// Names, addresses, envelopes, promises and errors.
pub(crate) mod message;

/// Routing actors and strategies.
pub(crate) mod router;

/// Core traits implemented by actors, references and strategies.
pub(crate) mod traits;

pub use actor::{ActorRef, Context, ReplyContext, ReplyRef, SpawnContext};
pub use common::config;
pub use common::{
    ActorSystem, Registry, Scheduler, SystemBuilder, TimerHandle, TimerKey, TracingSink,
};
pub use message::{
    ActorError, ActorId, ActorName, Address, Cancelled, Envelope, Promise, Reply,
};
pub use router::{HashSharding, LeastLoaded, ReplyRouter, RoundRobin, Router};
pub use traits::{
    Actor, ActorFactory, AggregateActor, DefaultFactory, ErrorKind, ErrorReport, ErrorSink,
    Reference, ReplyActor, RoutingStrategy,
};

/// A prelude module for conveniently importing the most commonly used items.
///
/// ## Macros (from `troupe-macro`)
/// *   [`troupe_macro::troupe_message`]: Attribute macro for declaring messages.
/// *   [`troupe_macro::troupe_actor`]: Attribute macro for declaring actors.
///
/// ## External Crates
/// *   [`async_trait::async_trait`](https://docs.rs/async-trait/latest/async_trait/attr.async_trait.html): The macro for defining async functions in traits.
pub mod prelude {
    // Macros from troupe-macro
    pub use troupe_macro::*;

    // External crate re-exports
    pub use async_trait::async_trait;

    // Core types
    pub use crate::actor::{ActorRef, Context, ReplyContext, ReplyRef, SpawnContext};
    pub use crate::common::{ActorSystem, Scheduler, SystemBuilder, TimerHandle, TroupeConfig};
    pub use crate::message::{ActorError, ActorName, Address, Envelope, Promise, Reply};
    pub use crate::router::{HashSharding, LeastLoaded, ReplyRouter, RoundRobin, Router};
    pub use crate::traits::{
        Actor, ActorFactory, AggregateActor, ErrorKind, ErrorReport, ErrorSink, Reference,
        ReplyActor, RoutingStrategy,
    };
}
