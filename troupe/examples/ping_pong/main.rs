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
enum Volley {
    Ping(u32),
    Pong(u32),
}

// A player hits the ball back to whoever sent it, until the rally is long enough.
#[troupe_actor]
struct Player {
    hits: u32,
}

#[async_trait]
impl Actor for Player {
    type Message = Volley;

    async fn receive(&mut self, message: Volley, ctx: &mut Context) -> anyhow::Result<()> {
        self.hits += 1;
        let reply = match message {
            Volley::Ping(count) => Volley::Pong(count + 1),
            Volley::Pong(count) => Volley::Ping(count + 1),
        };
        println!("{} got {message:?} from {}", ctx.name(), ctx.sender().name());
        if matches!(reply, Volley::Ping(count) | Volley::Pong(count) if count >= 10) {
            println!("{} ends the rally after {} hits", ctx.name(), self.hits);
            return Ok(());
        }
        // The sender address can be turned back into something we can talk to.
        if let Some(opponent) = ctx.sender().reference::<Volley>() {
            opponent.send_from(reply, Some(ctx.myself().clone()));
        }
        Ok(())
    }
}

#[troupe_actor]
struct Scoreboard;

#[async_trait]
impl ReplyActor for Scoreboard {
    type Request = (u32, u32);
    type Response = String;

    async fn receive(
        &mut self,
        (left, right): (u32, u32),
        _ctx: &mut ReplyContext<String>,
    ) -> anyhow::Result<Option<String>> {
        Ok(Some(format!("{left} : {right}")))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let system = ActorSystem::launch();
    let alice = system.spawn::<Player>(Some("alice"))?;
    let bob = system.spawn::<Player>(Some("bob"))?;

    // Serve to bob on alice's behalf.
    bob.send_from(Volley::Ping(0), Some(alice.address()));
    system.wait().await;

    let scoreboard = system.spawn_reply::<Scoreboard>(Some("scoreboard"))?;
    let score = scoreboard
        .ask_timeout((5, 5), Duration::from_secs(1))
        .await?
        .unwrap_or_default();
    println!("final score {score}");

    system.shutdown_all().await;
    Ok(())
}
