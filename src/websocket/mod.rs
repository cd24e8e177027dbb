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

//! Streaming client for the VALR trade feed.
//!
//! This module provides a two-layer architecture:
//! - Outer handle ([`client::ValrStreamClient`]): validates credentials,
//!   records desired subscriptions, exposes close.
//! - Inner supervisor: a dedicated Tokio task owning the connect → serve →
//!   backoff → reconnect state machine over an injectable transport.
//!
//! Features:
//! - Signed handshake headers over the upgrade request
//! - Automatic reconnection under a pluggable backoff policy
//! - Failure episodes that reset after a quiet period
//! - Unconditional subscription replay after every reconnect
//! - Ping/read-deadline keepalive where any inbound frame is proof of life

pub mod backoff;
pub mod client;
pub mod error;
pub mod messages;
pub mod transport;

pub(crate) mod supervisor;

pub use backoff::{BackoffPolicy, default_backoff};
pub use client::{UpdateCallback, ValrStreamClient};
pub use error::{ValrWsError, ValrWsResult};
pub use messages::{Subscription, TradeUpdate};
pub use transport::{Frame, TungsteniteConnector, WsConnector, WsWriter};
