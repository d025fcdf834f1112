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

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, instrument, trace, warn};

use crate::actor::{
    launch_nobody, ActorRef, AggregateDispatch, ReplyDispatch, ReplyRef, Runner, RunnerMeta,
    RunnerSeed, SingleDispatch, SpawnContext,
};
use crate::common::registry::AnyRegistry;
use crate::common::{Registry, Scheduler, TroupeConfig, CONFIG};
use crate::message::{ActorError, ActorId, ActorName, Address, Envelope, ReplyEnvelope};
use crate::traits::{
    Actor, ActorFactory, AggregateActor, DefaultFactory, ErrorSink, Reference, ReplyActor,
};

/// Registries are keyed by dispatcher type (actor type plus kind) and handle type.
type RegistryKey = (TypeId, TypeId);

struct SystemInner {
    registries: DashMap<RegistryKey, Arc<dyn AnyRegistry>>,
    scheduler: Scheduler,
    nobody: Address,
    config: TroupeConfig,
    sink: Option<Arc<dyn ErrorSink>>,
    runtime: Handle,
}

/// The top-level handle of a Troupe runtime.
///
/// Owns one [`Registry`] per actor kind, the [`Scheduler`] and the sentinel address that stands
/// in for missing senders. Cloning is cheap and every clone refers to the same system. Actor
/// names are scoped to a system: two systems may each have an actor called `"ledger"`.
///
/// A system must be started inside a Tokio runtime. Drain loops and timers run as tasks on that
/// runtime, so references can then be used from any thread, including plain `std::thread`s.
///
/// ```rust,ignore
/// let system = ActorSystem::launch();
/// let counter = system.spawn::<Counter>(Some("counter"))?;
/// counter.send(1);
/// system.wait().await;
/// ```
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

impl ActorSystem {
    /// Starts a system configured from the global [`CONFIG`].
    pub fn launch() -> Self {
        Self::builder().build()
    }

    /// Starts a system with an explicit configuration.
    pub fn with_config(config: TroupeConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// A builder for systems that need an error sink or a custom configuration.
    pub fn builder() -> SystemBuilder {
        SystemBuilder::default()
    }

    /// The configuration in effect.
    pub fn config(&self) -> &TroupeConfig {
        &self.inner.config
    }

    /// The system scheduler.
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// The sentinel address substituted for missing senders.
    pub fn nobody(&self) -> &Address {
        &self.inner.nobody
    }

    /// Spawns a fire-and-forget actor built from its `Default`.
    pub fn spawn<A>(&self, name: Option<&str>) -> Result<ActorRef<A::Message>, ActorError>
    where
        A: Actor + Default,
    {
        self.spawn_with::<A, (), DefaultFactory>(name, &DefaultFactory, ())
    }

    /// Spawns a fire-and-forget actor built by `factory`.
    ///
    /// Without a name, a unique one is generated. Fails with [`ActorError::DuplicateActor`] if a
    /// live actor of this type already has the name, and with [`ActorError::Construction`] if
    /// the factory fails.
    pub fn spawn_with<A, Args, F>(
        &self,
        name: Option<&str>,
        factory: &F,
        args: Args,
    ) -> Result<ActorRef<A::Message>, ActorError>
    where
        A: Actor,
        F: ActorFactory<A, Args> + ?Sized,
    {
        let registry = self.registry::<SingleDispatch<A>, ActorRef<A::Message>>(type_name::<A>());
        registry.spawn_with(resolve_name(name), |name| {
            let (actor, ctx) = construct::<A, Args, F>(name, factory, args)?;
            let runner = Runner::<Envelope<A::Message>>::launch(
                self.seed(name, type_name::<A>()),
                Box::new(SingleDispatch::new(actor)),
                ctx.into_hooks(),
            );
            Ok(ActorRef::from_runner(runner))
        })
    }

    /// Spawns a request/response actor built from its `Default`.
    pub fn spawn_reply<A>(
        &self,
        name: Option<&str>,
    ) -> Result<ReplyRef<A::Request, A::Response>, ActorError>
    where
        A: ReplyActor + Default,
    {
        self.spawn_reply_with::<A, (), DefaultFactory>(name, &DefaultFactory, ())
    }

    /// Spawns a request/response actor built by `factory`.
    pub fn spawn_reply_with<A, Args, F>(
        &self,
        name: Option<&str>,
        factory: &F,
        args: Args,
    ) -> Result<ReplyRef<A::Request, A::Response>, ActorError>
    where
        A: ReplyActor,
        F: ActorFactory<A, Args> + ?Sized,
    {
        let registry = self
            .registry::<ReplyDispatch<A>, ReplyRef<A::Request, A::Response>>(type_name::<A>());
        registry.spawn_with(resolve_name(name), |name| {
            let (actor, ctx) = construct::<A, Args, F>(name, factory, args)?;
            let runner = Runner::<ReplyEnvelope<A::Request, A::Response>>::launch(
                self.seed(name, type_name::<A>()),
                Box::new(ReplyDispatch::new(actor)),
                ctx.into_hooks(),
            );
            Ok(ReplyRef::from_runner(runner))
        })
    }

    /// Spawns a batching actor built from its `Default`.
    pub fn spawn_aggregate<A>(&self, name: Option<&str>) -> Result<ActorRef<A::Message>, ActorError>
    where
        A: AggregateActor + Default,
    {
        self.spawn_aggregate_with::<A, (), DefaultFactory>(name, &DefaultFactory, ())
    }

    /// Spawns a batching actor built by `factory`.
    pub fn spawn_aggregate_with<A, Args, F>(
        &self,
        name: Option<&str>,
        factory: &F,
        args: Args,
    ) -> Result<ActorRef<A::Message>, ActorError>
    where
        A: AggregateActor,
        F: ActorFactory<A, Args> + ?Sized,
    {
        let registry =
            self.registry::<AggregateDispatch<A>, ActorRef<A::Message>>(type_name::<A>());
        registry.spawn_with(resolve_name(name), |name| {
            let (actor, ctx) = construct::<A, Args, F>(name, factory, args)?;
            let runner = Runner::<Envelope<A::Message>>::launch(
                self.seed(name, type_name::<A>()),
                Box::new(AggregateDispatch::new(actor)),
                ctx.into_hooks(),
            );
            Ok(ActorRef::from_runner(runner))
        })
    }

    /// The registry of fire-and-forget actors of type `A`.
    pub fn actors<A: Actor>(&self) -> Arc<Registry<ActorRef<A::Message>>> {
        self.registry::<SingleDispatch<A>, ActorRef<A::Message>>(type_name::<A>())
    }

    /// The registry of request/response actors of type `A`.
    pub fn reply_actors<A: ReplyActor>(&self) -> Arc<Registry<ReplyRef<A::Request, A::Response>>> {
        self.registry::<ReplyDispatch<A>, ReplyRef<A::Request, A::Response>>(type_name::<A>())
    }

    /// The registry of batching actors of type `A`.
    pub fn aggregate_actors<A: AggregateActor>(&self) -> Arc<Registry<ActorRef<A::Message>>> {
        self.registry::<AggregateDispatch<A>, ActorRef<A::Message>>(type_name::<A>())
    }

    /// Shuts `reference` down and removes its registration.
    pub fn shutdown<R: Reference>(&self, reference: &R) -> bool {
        let stopped = reference.shutdown();
        self.forget(reference.name(), reference.id());
        stopped
    }

    /// Gracefully shuts `reference` down and removes its registration.
    #[instrument(skip(self, reference), fields(actor = %reference.name()))]
    pub async fn graceful_shutdown<R: Reference>(&self, reference: &R, max_wait: Duration) -> bool {
        let drained = reference.graceful_shutdown(max_wait).await;
        self.forget(reference.name(), reference.id());
        drained
    }

    /// Number of live registered actors, across all kinds.
    pub fn actor_count(&self) -> usize {
        self.inner
            .registries
            .iter()
            .map(|entry| entry.value().live_count())
            .sum()
    }

    /// Polls every registry until no actor has queued or in-flight messages.
    ///
    /// Gives up after the configured `system_wait_ms` and returns `false`. Meant for tests and
    /// orderly exits; it proves nothing about messages sent concurrently with the wait.
    #[instrument(skip(self))]
    pub async fn wait(&self) -> bool {
        let limit = self.inner.config.system_wait_timeout();
        let poll = self.inner.config.wait_poll_interval();
        let started = Instant::now();
        loop {
            let pending = self
                .inner
                .registries
                .iter()
                .any(|entry| entry.value().has_pending());
            if !pending {
                trace!(elapsed = ?started.elapsed(), "system drained");
                return true;
            }
            if started.elapsed() >= limit {
                warn!(?limit, "gave up waiting for actors to drain");
                return false;
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Gracefully shuts down every registered actor concurrently, each with the configured
    /// `graceful_shutdown_ms` deadline. Returns `true` if all of them drained in time.
    #[instrument(skip(self))]
    pub async fn shutdown_all(&self) -> bool {
        let registries: Vec<Arc<dyn AnyRegistry>> = self
            .inner
            .registries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let total: usize = registries.iter().map(|registry| registry.live_count()).sum();
        let max_wait = self.inner.config.graceful_shutdown_timeout();

        let drained: usize = join_all(
            registries
                .into_iter()
                .map(|registry| registry.graceful_shutdown_all(max_wait)),
        )
        .await
        .into_iter()
        .sum();

        debug!(total, drained, "system shut down");
        drained == total
    }

    fn registry<D: 'static, R: Reference>(&self, actor_type: &'static str) -> Arc<Registry<R>> {
        let key = (TypeId::of::<D>(), TypeId::of::<R>());
        let erased = Arc::clone(
            self.inner
                .registries
                .entry(key)
                .or_insert_with(|| Arc::new(Registry::<R>::new(actor_type)) as Arc<dyn AnyRegistry>)
                .value(),
        );
        erased
            .into_any()
            .downcast::<Registry<R>>()
            .expect("registries are keyed by their handle type")
    }

    fn seed(&self, name: &ActorName, actor_type: &'static str) -> RunnerSeed {
        RunnerSeed {
            meta: RunnerMeta::new(name.clone(), actor_type),
            scheduler: self.inner.scheduler.clone(),
            nobody: Some(self.inner.nobody.clone()),
            sink: self.inner.sink.clone(),
            runtime: self.inner.runtime.clone(),
        }
    }

    fn forget(&self, name: &ActorName, id: ActorId) {
        for entry in self.inner.registries.iter() {
            entry.value().forget(name.key(), id);
        }
    }
}

fn resolve_name(name: Option<&str>) -> ActorName {
    name.map_or_else(ActorName::generate, ActorName::new)
}

fn construct<A, Args, F>(
    name: &ActorName,
    factory: &F,
    args: Args,
) -> Result<(A, SpawnContext), ActorError>
where
    F: ActorFactory<A, Args> + ?Sized,
{
    let mut ctx = SpawnContext::new(name.clone());
    match factory.construct(&mut ctx, args) {
        Ok(actor) => Ok((actor, ctx)),
        Err(source) => Err(ActorError::Construction {
            actor_type: type_name::<A>(),
            name: name.to_string(),
            source,
        }),
    }
}

impl fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("registries", &self.inner.registries.len())
            .field("scheduler", &self.inner.scheduler)
            .field("nobody", &self.inner.nobody)
            .finish()
    }
}

/// Configures an [`ActorSystem`] before it starts.
#[derive(Default)]
pub struct SystemBuilder {
    config: Option<TroupeConfig>,
    sink: Option<Arc<dyn ErrorSink>>,
}

impl SystemBuilder {
    /// Uses `config` instead of the global configuration.
    pub fn config(mut self, config: TroupeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sends every caught actor failure to `sink`.
    pub fn error_sink<S: ErrorSink>(self, sink: S) -> Self {
        self.shared_error_sink(Arc::new(sink))
    }

    /// Like [`error_sink`](SystemBuilder::error_sink), for a sink that is shared elsewhere.
    pub fn shared_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Starts the system on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn build(self) -> ActorSystem {
        let config = self.config.unwrap_or_else(|| CONFIG.clone());
        let runtime = Handle::current();
        let scheduler = Scheduler::on_runtime(runtime.clone());
        let nobody = launch_nobody(
            &config.defaults.nobody_name,
            scheduler.clone(),
            runtime.clone(),
        );
        debug!(nobody = %nobody, "actor system started");
        ActorSystem {
            inner: Arc::new(SystemInner {
                registries: DashMap::new(),
                scheduler,
                nobody,
                config,
                sink: self.sink,
                runtime,
            }),
        }
    }
}

impl fmt::Debug for SystemBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemBuilder")
            .field("config", &self.config)
            .field("error_sink", &self.sink.is_some())
            .finish()
    }
}
