// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Sliding-interval rate gate for REST requests.

use std::time::Duration;

use tokio::{
    sync::Mutex,
    time::{self, Instant},
};

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    count: u32,
}

/// Blocks callers once the request budget for the current interval is spent,
/// until the interval rolls over.
#[derive(Debug)]
pub struct RateLimiter {
    max_per_interval: u32,
    interval: Duration,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    /// Creates a new [`RateLimiter`] allowing `max_per_interval` acquisitions
    /// per `interval`.
    #[must_use]
    pub fn new(max_per_interval: u32, interval: Duration) -> Self {
        Self {
            max_per_interval,
            interval,
            state: Mutex::new(WindowState {
                window_start: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Waits until capacity is available within the current interval, then
    /// consumes one unit of it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();

                if now.saturating_duration_since(state.window_start) >= self.interval {
                    state.window_start = now;
                    state.count = 0;
                }

                if state.count < self.max_per_interval {
                    state.count += 1;
                    return;
                }

                (state.window_start + self.interval).saturating_duration_since(now)
            };

            tracing::debug!(?wait, "Rate limit reached, waiting for reset");
            time::sleep(wait).await;
        }
    }
}
