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

//! Core constants for the VALR client.

/// Venue identifier string.
pub const VALR: &str = "VALR";

// Production URLs
pub const VALR_HTTP_URL: &str = "https://api.valr.com/v1";
pub const VALR_WS_TRADE_URL: &str = "wss://api.valr.com/ws/trade";
pub const VALR_WS_ACCOUNT_URL: &str = "wss://api.valr.com/ws/account";

// Authentication header names
pub const HEADER_API_KEY: &str = "X-VALR-API-KEY";
pub const HEADER_SIGNATURE: &str = "X-VALR-SIGNATURE";
pub const HEADER_TIMESTAMP: &str = "X-VALR-TIMESTAMP";

/// Default REST request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default REST rate limit: requests allowed per interval.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 1_000;

/// Default REST rate limit interval in seconds.
pub const DEFAULT_RATE_LIMIT_INTERVAL_SECS: u64 = 60;

/// Default liveness probe interval in seconds.
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 30;

/// Default read deadline in seconds: the session is considered dead when no
/// inbound frame arrives within this window.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

/// Default quiet period after which a failure episode resets, in seconds.
pub const DEFAULT_ATTEMPT_RESET_SECS: u64 = 30 * 60;
