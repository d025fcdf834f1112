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

#[troupe_message]
struct Job {
    customer: u64,
    cost_ms: u64,
}

#[troupe_actor]
struct Worker {
    done: usize,
}

#[async_trait]
impl Actor for Worker {
    type Message = Job;

    async fn receive(&mut self, job: Job, ctx: &mut Context) -> anyhow::Result<()> {
        tokio::time::sleep(Duration::from_millis(job.cost_ms)).await;
        self.done += 1;
        println!("{} finished customer {} ({} so far)", ctx.name(), job.customer, self.done);
        Ok(())
    }
}

#[troupe_actor]
struct Quote;

#[async_trait]
impl ReplyActor for Quote {
    type Request = u64;
    type Response = u64;

    async fn receive(&mut self, weight: u64, ctx: &mut ReplyContext<u64>) -> anyhow::Result<Option<u64>> {
        println!("{} quoting {weight}", ctx.name());
        Ok(Some(weight * 3))
    }
}

fn router<S>(
    _ctx: &mut SpawnContext,
    (pool, strategy): (Vec<ActorRef<Job>>, S),
) -> anyhow::Result<Router<ActorRef<Job>, S>>
where
    S: RoutingStrategy<Job>,
{
    Ok(Router::new(pool, strategy))
}

fn quote_router(
    _ctx: &mut SpawnContext,
    pool: Vec<ReplyRef<u64, u64>>,
) -> anyhow::Result<ReplyRouter<u64, u64, RoundRobin>> {
    Ok(ReplyRouter::new(pool, RoundRobin::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let system = ActorSystem::builder().error_sink(troupe::TracingSink).build();

    let mut workers = Vec::new();
    for index in 0..4 {
        workers.push(system.spawn::<Worker>(Some(&format!("worker-{index}")))?);
    }

    // Jobs for one customer always land on the same worker.
    let sharded = system.spawn_with::<Router<ActorRef<Job>, HashSharding<Job>>, _, _>(
        Some("by-customer"),
        &router,
        (
            workers.clone(),
            HashSharding::new(|job: &Job| job.customer as i64),
        ),
    )?;
    for customer in [1, 2, 1, 3, 1] {
        sharded.send(Job { customer, cost_ms: 20 });
    }

    // Uneven jobs go wherever there is the least work waiting.
    let balanced = system.spawn_with::<Router<ActorRef<Job>, LeastLoaded>, _, _>(
        Some("least-loaded"),
        &router,
        (workers, LeastLoaded),
    )?;
    for (customer, cost_ms) in [(10, 200), (11, 10), (12, 10), (13, 10)] {
        balanced.send(Job { customer, cost_ms });
    }

    let mut quoters = Vec::new();
    for _ in 0..2 {
        quoters.push(system.spawn_reply::<Quote>(None)?);
    }
    let quotes = system.spawn_reply_with::<ReplyRouter<u64, u64, RoundRobin>, _, _>(
        Some("quotes"),
        &quote_router,
        quoters,
    )?;
    for weight in 1..=4 {
        println!("quote for {weight}: {:?}", quotes.ask(weight).await?);
    }

    system.wait().await;
    system.shutdown_all().await;
    Ok(())
}
