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


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use troupe::Address;

/// Shared observation point between a test and the actors it spawns.
#[derive(Clone, Default, Debug)]
pub struct Probe {
    values: Arc<Mutex<Vec<u64>>>,
    senders: Arc<Mutex<Vec<Address>>>,
    batches: Arc<Mutex<Vec<usize>>>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl Probe {
    /// Marks the start of a `receive` call.
    pub fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    /// Marks the end of a `receive` call.
    pub fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn record(&self, value: u64, sender: Address) {
        self.values.lock().push(value);
        self.senders.lock().push(sender);
    }

    pub fn record_batch(&self, size: usize) {
        self.batches.lock().push(size);
    }

    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn values(&self) -> Vec<u64> {
        self.values.lock().clone()
    }

    pub fn senders(&self) -> Vec<Address> {
        self.senders.lock().clone()
    }

    pub fn batches(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }

    /// Highest number of overlapping `receive` calls seen so far.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Polls until at least `expected` values were recorded or `limit` elapses.
    pub async fn wait_for(&self, expected: usize, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        while self.count() < expected {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}
