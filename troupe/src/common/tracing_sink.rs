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

use tracing::warn;

use crate::traits::{ErrorReport, ErrorSink};

/// An [`ErrorSink`] that re-emits reports as structured `tracing` events under the
/// `troupe::errors` target, so they can be filtered or routed apart from runtime logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, report: &ErrorReport) {
        warn!(
            target: "troupe::errors",
            actor = %report.actor_name,
            kind = %report.error_kind,
            trace = %report.trace,
            "{}",
            report.message
        );
    }
}
