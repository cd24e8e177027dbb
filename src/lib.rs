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

//! Client library for the [VALR](https://www.valr.com) cryptocurrency exchange.
//!
//! This crate provides two client surfaces:
//!
//! - [`http::client::ValrHttpClient`]: typed REST endpoints with HMAC-SHA512
//!   request signing and a sliding-interval rate gate.
//! - [`websocket::client::ValrStreamClient`]: a resilient streaming feed that
//!   keeps a market-data subscription alive across disconnects. The stream
//!   client reconnects automatically under a pluggable backoff policy, replays
//!   all desired subscriptions after every reconnect, and detects silently-dead
//!   connections through a ping/read-deadline keepalive.
//!
//! # Streaming example
//!
//! ```no_run
//! use valr_client::{ValrStreamClient, ValrStreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ValrStreamConfig::default()
//!         .with_update_callback(|update| println!("{update:?}"));
//!
//!     let client = ValrStreamClient::dial("key-id".into(), "key-secret".into(), config)?;
//!     client.subscribe_new_trades(vec!["BTCZAR".to_string()]);
//!
//!     tokio::signal::ctrl_c().await?;
//!     client.close();
//!     Ok(())
//! }
//! ```

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod http;
pub mod websocket;

pub use config::{ValrHttpConfig, ValrStreamConfig};
pub use http::{client::ValrHttpClient, error::ValrHttpError};
pub use websocket::{
    client::ValrStreamClient,
    error::ValrWsError,
    messages::TradeUpdate,
};
