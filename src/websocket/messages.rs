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

//! Data structures and decoding for VALR streaming messages.
//!
//! Inbound frames are decoded in two phases: the `type` discriminator is
//! extracted first, then the payload shape keyed by that tag is parsed. An
//! unknown discriminator is not an error; a known discriminator with a
//! malformed payload is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::error::{ValrWsError, ValrWsResult};
use crate::common::enums::Side;

/// Event name for trade subscriptions.
pub const EVENT_NEW_TRADE: &str = "NEW_TRADE";

/// Known inbound message discriminators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WsMessageKind {
    /// A trade executed on a subscribed pair.
    NewTrade,
    /// The handshake credentials were accepted.
    Authenticated,
    /// A subscription request was acknowledged.
    Subscribed,
}

/// Envelope carrying only the message-kind discriminator.
#[derive(Debug, Clone, Deserialize)]
struct MessageEnvelope {
    #[serde(rename = "type")]
    kind: String,
}

/// Wire shape of a `NEW_TRADE` message.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeMsg {
    #[serde(rename = "type")]
    pub message_type: String,
    pub currency_pair_symbol: String,
    pub data: NewTradeData,
}

/// Trade fields nested inside a `NEW_TRADE` message.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeData {
    pub price: String,
    pub quantity: String,
    #[serde(default)]
    pub currency_pair: Option<String>,
    pub traded_at: DateTime<Utc>,
    pub taker_side: Side,
    pub id: String,
}

/// A decoded trade update delivered to the caller's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeUpdate {
    /// Currency pair symbol, e.g. `BTCZAR`.
    pub pair: String,
    /// Trade price as a decimal string.
    pub price: String,
    /// Trade quantity as a decimal string.
    pub quantity: String,
    /// Side of the taker.
    pub taker_side: Side,
    /// Execution timestamp.
    pub traded_at: DateTime<Utc>,
    /// Venue-assigned trade identifier.
    pub trade_id: String,
}

impl From<NewTradeMsg> for TradeUpdate {
    fn from(msg: NewTradeMsg) -> Self {
        Self {
            pair: msg.currency_pair_symbol,
            price: msg.data.price,
            quantity: msg.data.quantity,
            taker_side: msg.data.taker_side,
            traded_at: msg.data.traded_at,
            trade_id: msg.data.id,
        }
    }
}

/// A decoded inbound streaming message.
#[derive(Debug, Clone)]
pub enum ValrWsMessage {
    /// Data-bearing update, forwarded to the caller.
    TradeUpdate(TradeUpdate),
    /// Authentication acknowledgment, consumed internally.
    Authenticated,
    /// Subscription acknowledgment, consumed internally.
    Subscribed,
    /// A discriminator outside the known set; logged and discarded.
    Unknown(String),
}

/// One batch of a subscription request: an event kind and the pairs it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub event: String,
    pub pairs: Vec<String>,
}

impl Subscription {
    /// Creates a `NEW_TRADE` subscription batch for the given pairs.
    #[must_use]
    pub fn new_trades(pairs: Vec<String>) -> Self {
        Self {
            event: EVENT_NEW_TRADE.to_string(),
            pairs,
        }
    }
}

/// Outgoing frame subscribing to one or more event batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub message_type: String,
    pub subscriptions: Vec<Subscription>,
}

impl SubscribeRequest {
    /// Wraps a single subscription batch into an outgoing frame.
    #[must_use]
    pub fn single(subscription: Subscription) -> Self {
        Self {
            message_type: "SUBSCRIBE".to_string(),
            subscriptions: vec![subscription],
        }
    }
}

/// Decodes a raw text frame into a [`ValrWsMessage`].
///
/// # Errors
///
/// Returns [`ValrWsError::Decode`] if the frame is not valid JSON, carries no
/// `type` discriminator, or carries a known discriminator with a payload that
/// fails to parse. Unknown discriminators are not errors.
pub fn decode_frame(text: &str) -> ValrWsResult<ValrWsMessage> {
    let envelope: MessageEnvelope = serde_json::from_str(text)?;

    let Ok(kind) = envelope.kind.parse::<WsMessageKind>() else {
        return Ok(ValrWsMessage::Unknown(envelope.kind));
    };

    match kind {
        WsMessageKind::NewTrade => {
            let msg: NewTradeMsg = serde_json::from_str(text)?;
            Ok(ValrWsMessage::TradeUpdate(msg.into()))
        }
        WsMessageKind::Authenticated => Ok(ValrWsMessage::Authenticated),
        WsMessageKind::Subscribed => Ok(ValrWsMessage::Subscribed),
    }
}
