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

//! VALR client configuration structures.

use std::{sync::Arc, time::Duration};

use crate::{
    common::consts::{
        DEFAULT_ATTEMPT_RESET_SECS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PING_INTERVAL_SECS,
        DEFAULT_RATE_LIMIT_INTERVAL_SECS, DEFAULT_RATE_LIMIT_MAX, DEFAULT_READ_TIMEOUT_SECS,
    },
    websocket::{backoff::BackoffPolicy, client::UpdateCallback, messages::TradeUpdate},
};

/// Configuration for the VALR REST client.
#[derive(Clone, Debug)]
pub struct ValrHttpConfig {
    /// Optional base URL override.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// API key for authenticated endpoints.
    pub api_key: Option<String>,
    /// API secret for request signing.
    pub api_secret: Option<String>,
    /// Requests allowed per rate-limit interval.
    pub rate_limit_max: u32,
    /// Rate-limit interval.
    pub rate_limit_interval: Duration,
}

impl Default for ValrHttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            api_key: None,
            api_secret: None,
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_interval: Duration::from_secs(DEFAULT_RATE_LIMIT_INTERVAL_SECS),
        }
    }
}

/// Configuration for the VALR streaming client.
///
/// The update callback executes on the supervisor task and must not block
/// indefinitely: it sits on the critical path of further message delivery.
#[derive(Clone)]
pub struct ValrStreamConfig {
    /// Optional WebSocket URL override.
    pub url: Option<String>,
    /// Quiet period after which the failure episode resets.
    pub attempt_reset: Duration,
    /// Liveness probe interval.
    pub ping_interval: Duration,
    /// Read deadline: the session is torn down when no inbound frame arrives
    /// within this window.
    pub read_timeout: Duration,
    /// Callback invoked for each decoded trade update.
    pub update_callback: Option<UpdateCallback>,
    /// Maps the failure episode's attempt count to a reconnect wait.
    pub backoff_policy: Option<BackoffPolicy>,
}

impl Default for ValrStreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            attempt_reset: Duration::from_secs(DEFAULT_ATTEMPT_RESET_SECS),
            ping_interval: Duration::from_secs(DEFAULT_PING_INTERVAL_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            update_callback: None,
            backoff_policy: None,
        }
    }
}

impl std::fmt::Debug for ValrStreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ValrStreamConfig))
            .field("url", &self.url)
            .field("attempt_reset", &self.attempt_reset)
            .field("ping_interval", &self.ping_interval)
            .field("read_timeout", &self.read_timeout)
            .field("has_update_callback", &self.update_callback.is_some())
            .field("has_backoff_policy", &self.backoff_policy.is_some())
            .finish()
    }
}

impl ValrStreamConfig {
    /// Sets the WebSocket URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the callback invoked for each decoded trade update.
    #[must_use]
    pub fn with_update_callback(
        mut self,
        callback: impl Fn(TradeUpdate) + Send + Sync + 'static,
    ) -> Self {
        self.update_callback = Some(Arc::new(callback));
        self
    }

    /// Sets the backoff policy.
    #[must_use]
    pub fn with_backoff_policy(
        mut self,
        policy: impl Fn(u32) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.backoff_policy = Some(Arc::new(policy));
        self
    }

    /// Sets the failure-episode reset threshold.
    #[must_use]
    pub fn with_attempt_reset(mut self, attempt_reset: Duration) -> Self {
        self.attempt_reset = attempt_reset;
        self
    }

    /// Sets the liveness probe interval.
    #[must_use]
    pub fn with_ping_interval(mut self, ping_interval: Duration) -> Self {
        self.ping_interval = ping_interval;
        self
    }

    /// Sets the read deadline window.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
