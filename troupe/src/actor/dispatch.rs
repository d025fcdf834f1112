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

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{error, trace};

use crate::actor::mailbox::Mailbox;
use crate::actor::{Context, ReplyContext};
use crate::common::Scheduler;
use crate::message::{Address, Envelope, ReplyEnvelope};
use crate::traits::{Actor, AggregateActor, ErrorKind, ErrorReport, ErrorSink, ReplyActor};

/// How a runner feeds its actor. One implementation per actor kind.
#[async_trait]
pub(crate) trait Dispatcher<E>: Send {
    /// Consumes envelopes until the mailbox is empty or closed.
    async fn run_pass(&mut self, mailbox: &Mailbox<E>, scope: &Scope);
}

/// Per-loop state shared by every invocation in one drain loop.
pub(crate) struct Scope {
    myself: Address,
    scheduler: Scheduler,
    sink: Option<Arc<dyn ErrorSink>>,
}

impl Scope {
    pub(crate) fn new(
        myself: Address,
        scheduler: Scheduler,
        sink: Option<Arc<dyn ErrorSink>>,
    ) -> Self {
        Self {
            myself,
            scheduler,
            sink,
        }
    }

    fn context(&self, sender: Address) -> Context {
        Context::new(self.myself.clone(), sender, self.scheduler.clone())
    }

    /// Turns the caught outcome of one receive call into its value, reporting failures.
    fn settle<T>(&self, outcome: std::thread::Result<anyhow::Result<T>>) -> Option<T> {
        match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(failure)) => {
                self.report(ErrorKind::Failed, failure.to_string(), format!("{failure:?}"));
                None
            }
            Err(payload) => {
                self.report(ErrorKind::Panicked, panic_message(payload.as_ref()), String::new());
                None
            }
        }
    }

    fn report(&self, error_kind: ErrorKind, message: String, trace: String) {
        error!(
            actor = %self.myself.name(),
            kind = %error_kind,
            "receive failed: {}",
            message
        );
        if let Some(sink) = &self.sink {
            sink.report(&ErrorReport {
                actor_name: self.myself.name().to_string(),
                error_kind,
                message,
                trace,
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// One `receive` call per message.
pub(crate) struct SingleDispatch<A> {
    actor: A,
}

impl<A> SingleDispatch<A> {
    pub(crate) fn new(actor: A) -> Self {
        Self { actor }
    }
}

#[async_trait]
impl<A: Actor> Dispatcher<Envelope<A::Message>> for SingleDispatch<A> {
    async fn run_pass(&mut self, mailbox: &Mailbox<Envelope<A::Message>>, scope: &Scope) {
        while let Some(envelope) = mailbox.next() {
            let (message, sender) = envelope.into_parts();
            let mut ctx = scope.context(sender);
            let outcome = AssertUnwindSafe(self.actor.receive(message, &mut ctx))
                .catch_unwind()
                .await;
            let _ = scope.settle(outcome);
        }
    }
}

/// One `receive` call per request, completing the caller's promise with the result.
pub(crate) struct ReplyDispatch<A> {
    actor: A,
}

impl<A> ReplyDispatch<A> {
    pub(crate) fn new(actor: A) -> Self {
        Self { actor }
    }
}

#[async_trait]
impl<A: ReplyActor> Dispatcher<ReplyEnvelope<A::Request, A::Response>> for ReplyDispatch<A> {
    async fn run_pass(
        &mut self,
        mailbox: &Mailbox<ReplyEnvelope<A::Request, A::Response>>,
        scope: &Scope,
    ) {
        while let Some(envelope) = mailbox.next() {
            let ReplyEnvelope {
                request,
                sender,
                promise,
            } = envelope;
            let mut ctx = ReplyContext::new(scope.context(sender), promise);
            let outcome = AssertUnwindSafe(self.actor.receive(request, &mut ctx))
                .catch_unwind()
                .await;
            let response = scope.settle(outcome).flatten();

            // A bypassed invocation has already handed its promise away.
            if let Some(promise) = ctx.take_promise() {
                if !promise.complete(response) {
                    trace!(actor = %scope.myself.name(), "reply dropped, caller stopped waiting");
                }
            }
        }
    }
}

/// One `receive_batch` call per visible run of messages.
pub(crate) struct AggregateDispatch<A> {
    actor: A,
}

impl<A> AggregateDispatch<A> {
    pub(crate) fn new(actor: A) -> Self {
        Self { actor }
    }
}

#[async_trait]
impl<A: AggregateActor> Dispatcher<Envelope<A::Message>> for AggregateDispatch<A> {
    async fn run_pass(&mut self, mailbox: &Mailbox<Envelope<A::Message>>, scope: &Scope) {
        loop {
            let batch = mailbox.take_visible();
            let Some(last) = batch.last() else {
                break;
            };
            trace!(actor = %scope.myself.name(), size = batch.len(), "dispatching batch");
            let mut ctx = scope.context(last.sender().clone());
            let outcome = AssertUnwindSafe(self.actor.receive_batch(batch, &mut ctx))
                .catch_unwind()
                .await;
            let _ = scope.settle(outcome);
        }
    }
}
