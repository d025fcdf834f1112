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


//! Round-robin, hash-sharding and least-loaded routing, for both actor kinds.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use troupe::prelude::*;
use troupe_test::prelude::*;

use crate::setup::actors::{Calculator, Counter, Probe};
use crate::setup::initialize_tracing;
use crate::setup::messages::{Query, Tally};

mod setup;

const SETTLE: Duration = Duration::from_secs(10);

/// Remembers the words it was sent.
#[troupe_actor]
struct Scribe {
    words: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Actor for Scribe {
    type Message = String;

    async fn receive(&mut self, word: String, _ctx: &mut Context) -> anyhow::Result<()> {
        self.words.lock().push(word);
        Ok(())
    }
}

fn scribe(_ctx: &mut SpawnContext, words: Arc<Mutex<Vec<String>>>) -> anyhow::Result<Scribe> {
    Ok(Scribe { words })
}

fn routing<R, S>(_ctx: &mut SpawnContext, (pool, strategy): (Vec<R>, S)) -> anyhow::Result<Router<R, S>>
where
    R: Reference,
    S: RoutingStrategy<R::Message>,
{
    Ok(Router::new(pool, strategy))
}

fn reply_routing<S>(
    _ctx: &mut SpawnContext,
    (pool, strategy): (Vec<ReplyRef<Query, u64>>, S),
) -> anyhow::Result<ReplyRouter<Query, u64, S>>
where
    S: RoutingStrategy<Query>,
{
    Ok(ReplyRouter::new(pool, strategy))
}

fn counters(system: &ActorSystem, size: usize) -> anyhow::Result<(Vec<ActorRef<Tally>>, Vec<Probe>)> {
    let probes: Vec<Probe> = (0..size).map(|_| Probe::default()).collect();
    let mut pool = Vec::with_capacity(size);
    for probe in &probes {
        pool.push(system.spawn_with::<Counter, _, _>(None, &Counter::observed, probe.clone())?);
    }
    Ok((pool, probes))
}

#[troupe_test]
async fn test_round_robin_gives_each_routee_one_of_n() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, probes) = counters(&system, 5)?;
    let router = system.spawn_with::<Router<ActorRef<Tally>, RoundRobin>, _, _>(
        Some("round-robin"),
        &routing,
        (pool, RoundRobin::new()),
    )?;

    for value in 0..5 {
        router.send(Tally::Add(value));
    }

    assert!(system.wait().await);
    for (index, probe) in probes.iter().enumerate() {
        assert_eq!(probe.values(), vec![index as u64]);
    }
    Ok(())
}

#[troupe_test]
async fn test_round_robin_cycles_in_pool_order() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, probes) = counters(&system, 4)?;
    let router = system.spawn_with::<Router<ActorRef<Tally>, RoundRobin>, _, _>(
        None,
        &routing,
        (pool, RoundRobin::new()),
    )?;

    let rounds = 3;
    for value in 0..(4 * rounds) {
        router.send(Tally::Add(value));
    }

    assert!(system.wait().await);
    for (index, probe) in probes.iter().enumerate() {
        let expected: Vec<u64> = (0..rounds).map(|round| round * 4 + index as u64).collect();
        assert_eq!(probe.values(), expected);
    }
    Ok(())
}

#[troupe_test]
async fn test_router_keeps_the_original_sender() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, probes) = counters(&system, 2)?;
    let origin = system.spawn::<Counter>(Some("origin"))?;
    let router = system.spawn_with::<Router<ActorRef<Tally>, RoundRobin>, _, _>(
        None,
        &routing,
        (pool, RoundRobin::new()),
    )?;

    router.send_from(Tally::Add(1), Some(origin.address()));
    router.send(Tally::Add(2));

    assert!(system.wait().await);
    assert_eq!(probes[0].senders(), vec![origin.address()]);
    assert!(probes[1].senders()[0].is_nobody());
    Ok(())
}

#[troupe_test]
async fn test_hash_sharding_spreads_distinct_keys() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let logs: Vec<Arc<Mutex<Vec<String>>>> = (0..5).map(|_| Arc::default()).collect();
    let mut pool = Vec::new();
    for log in &logs {
        pool.push(system.spawn_with::<Scribe, _, _>(None, &scribe, log.clone())?);
    }
    let by_first_letter = HashSharding::new(|word: &String| i64::from(word.as_bytes()[0]));
    let router = system.spawn_with::<Router<ActorRef<String>, HashSharding<String>>, _, _>(
        Some("sharded"),
        &routing,
        (pool, by_first_letter),
    )?;

    for word in ["aaa", "bbb", "ccc", "ddd", "eee"] {
        router.send(word.to_string());
    }
    // Same key, same routee.
    router.send("aardvark".to_string());

    assert!(system.wait().await);
    let received: Vec<Vec<String>> = logs.iter().map(|log| log.lock().clone()).collect();
    assert!(received.iter().all(|words| !words.is_empty()));
    // 'a' is 97, and 97 % 5 == 2.
    assert_eq!(received[2], vec!["aaa".to_string(), "aardvark".to_string()]);
    assert_eq!(received[3], vec!["bbb".to_string()]);
    assert_eq!(received[0], vec!["ddd".to_string()]);
    Ok(())
}

#[troupe_test]
async fn test_hashed_strategy_is_stable_per_message() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, probes) = counters(&system, 3)?;
    let mut strategy = HashSharding::<u64>::hashed();

    let first = strategy.select(&42, &pool);
    assert!(first.is_some());
    for _ in 0..10 {
        assert_eq!(strategy.select(&42, &pool), first);
    }
    assert_eq!(strategy.select(&42, &pool[..0]), None);
    assert!(probes.iter().all(|probe| probe.count() == 0));
    Ok(())
}

#[troupe_test]
async fn test_least_loaded_prefers_idle_then_empty_then_shortest() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, _probes) = counters(&system, 3)?;
    let mut strategy = LeastLoaded;
    let probe_message = Tally::Add(0);

    assert_eq!(strategy.select(&probe_message, &pool), Some(0));

    // 0 busy with two waiting, 1 busy with none waiting, 2 idle.
    for _ in 0..3 {
        pool[0].send(Tally::Pause(400));
    }
    pool[1].send(Tally::Pause(400));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(strategy.select(&probe_message, &pool), Some(2));

    // Nobody idle: the busy routee with an empty mailbox wins.
    for _ in 0..3 {
        pool[2].send(Tally::Pause(400));
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(strategy.select(&probe_message, &pool), Some(1));

    // Everyone has a backlog: the shortest wins.
    pool[1].send(Tally::Pause(400));
    pool[0].send(Tally::Pause(400));
    assert_eq!(pool[0].queued(), 3);
    assert_eq!(pool[1].queued(), 1);
    assert_eq!(pool[2].queued(), 2);
    assert_eq!(strategy.select(&probe_message, &pool), Some(1));

    assert_eq!(strategy.select(&probe_message, &pool[..0]), None);
    Ok(())
}

#[troupe_test]
async fn test_least_loaded_router_spreads_a_burst() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let (pool, probes) = counters(&system, 3)?;
    let router = system.spawn_with::<Router<ActorRef<Tally>, LeastLoaded>, _, _>(
        None,
        &routing,
        (pool, LeastLoaded),
    )?;

    for value in 0..30 {
        router.send(Tally::Add(value));
    }

    assert!(system.wait().await);
    let total: usize = probes.iter().map(Probe::count).sum();
    assert_eq!(total, 30);
    Ok(())
}

#[troupe_test]
async fn test_reply_router_lets_the_routee_answer() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let mut pool = Vec::new();
    for _ in 0..3 {
        pool.push(system.spawn_reply::<Calculator>(None)?);
    }
    let router = system.spawn_reply_with::<ReplyRouter<Query, u64, RoundRobin>, _, _>(
        Some("calculators"),
        &reply_routing,
        (pool, RoundRobin::new()),
    )?;

    for value in 0..9 {
        assert_eq!(router.ask(Query::Double(value)).await?, Some(value * 2));
    }
    assert_eq!(router.ask(Query::Nothing).await?, None);

    let answers = futures::future::join_all((0..6).map(|value| router.request(Query::Slow(20, value)))).await;
    let answers: Vec<_> = answers.into_iter().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(answers, (0..6).map(Some).collect::<Vec<_>>());
    Ok(())
}

#[troupe_test]
async fn test_reply_router_with_a_dead_routee_cancels_the_ask() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let calculator = system.spawn_reply::<Calculator>(None)?;
    let router = system.spawn_reply_with::<ReplyRouter<Query, u64, RoundRobin>, _, _>(
        None,
        &reply_routing,
        (vec![calculator.clone()], RoundRobin::new()),
    )?;

    assert_eq!(router.ask(Query::Double(1)).await?, Some(2));
    calculator.shutdown();
    let error = router
        .ask(Query::Double(1))
        .await
        .expect_err("the only routee is gone");
    assert!(error.is_cancelled());
    Ok(())
}

#[troupe_test]
async fn test_empty_pools_drop_messages_and_answer_nothing() -> anyhow::Result<()> {
    initialize_tracing();
    let system = ActorSystem::launch();
    let router = system.spawn_with::<Router<ActorRef<Tally>, RoundRobin>, _, _>(
        None,
        &routing,
        (Vec::new(), RoundRobin::new()),
    )?;
    let reply_router = system.spawn_reply_with::<ReplyRouter<Query, u64, LeastLoaded>, _, _>(
        None,
        &reply_routing,
        (Vec::new(), LeastLoaded),
    )?;

    assert!(router.send(Tally::Add(1)));
    assert_eq!(reply_router.ask(Query::Double(1)).await?, None);
    assert!(system.wait().await);
    assert!(router.is_alive());
    Ok(())
}
