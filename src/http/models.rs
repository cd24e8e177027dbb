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

//! Typed responses for the VALR REST API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::enums::Side;

/// Error payload returned by the VALR API on non-success statuses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValrErrorResponse {
    /// Stable error code, usable even when the message is localised.
    #[serde(rename = "error_code")]
    pub code: String,
    /// Human-readable message; may be localised for authenticated calls.
    #[serde(rename = "error")]
    pub message: String,
}

/// Response for `GET /v1/public/time`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub epoch_time: i64,
    pub time: DateTime<Utc>,
}

/// One executed trade from `GET /v1/marketdata/{pair}/tradehistory`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryEntry {
    pub price: Decimal,
    pub quantity: Decimal,
    pub currency_pair: String,
    pub traded_at: DateTime<Utc>,
    pub taker_side: Side,
    #[serde(default)]
    pub sequence_id: Option<i64>,
    pub id: String,
    #[serde(default)]
    pub quote_volume: Option<Decimal>,
}

/// Response for `GET /v1/wallet/crypto/{currency}/deposit/address`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
}

/// Response for `GET /v1/wallet/crypto/{currency}/withdraw`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawInfo {
    pub currency: String,
    pub minimum_withdraw_amount: Decimal,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    pub withdraw_cost: Decimal,
    pub supports_payment_reference: bool,
}

/// Response for `GET /v1/simple/{pair}/order/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderStatus {
    pub order_id: String,
    pub success: bool,
    pub processing: bool,
    pub paid_amount: Decimal,
    pub paid_currency: String,
    #[serde(rename = "receivedAmount")]
    pub receive_amount: Decimal,
    pub fee_amount: Decimal,
    pub fee_currency: String,
    pub order_executed_at: DateTime<Utc>,
}

/// Response for `GET /v1/orders/{pair}/orderid/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub order_id: String,
    pub order_status_type: String,
    pub currency_pair: String,
    pub original_price: Decimal,
    pub remaining_quantity: Decimal,
    pub original_quantity: Decimal,
    pub order_side: Side,
    pub order_type: String,
    #[serde(default)]
    pub failed_reason: String,
    #[serde(default)]
    pub customer_order_id: Option<String>,
    pub order_updated_at: DateTime<Utc>,
    pub order_created_at: DateTime<Utc>,
}

/// Response for the order history summary endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistorySummary {
    pub order_id: String,
    #[serde(default)]
    pub customer_order_id: Option<String>,
    pub order_status_type: String,
    pub currency_pair: String,
    pub average_price: Decimal,
    pub original_price: Decimal,
    pub remaining_quantity: Decimal,
    pub original_quantity: Decimal,
    pub total: Decimal,
    pub total_fee: Decimal,
    pub fee_currency: String,
    pub order_side: Side,
    pub order_type: String,
    #[serde(default)]
    pub failed_reason: String,
    pub order_updated_at: DateTime<Utc>,
    pub order_created_at: DateTime<Utc>,
}

/// Response for `POST /v1/simple/{pair}/quote`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleQuote {
    pub currency_pair: String,
    pub pay_amount: Decimal,
    pub receive_amount: Decimal,
    pub fee: Decimal,
    pub fee_currency: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "id")]
    pub order_id: String,
}

/// Response for `POST /v1/simple/{pair}/order`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderAck {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Response carrying only a venue-assigned order identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdResponse {
    pub id: String,
}
