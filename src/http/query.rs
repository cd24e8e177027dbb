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

//! Typed request parameters for VALR REST endpoints.
//!
//! GET parameters are URL-encoded into the query string; POST and DELETE
//! parameters are URL-encoded into the request body, matching what the venue
//! accepts for form submissions. Timestamps encode as RFC 3339.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::enums::Side;

/// Query parameters for `GET /v1/marketdata/{pair}/tradehistory`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryParams {
    /// Maximum number of trades to return (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of trades to skip, for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Only include trades at or after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Only include trades at or before this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Body parameters for `POST /v1/simple/{pair}/quote` and
/// `POST /v1/simple/{pair}/order`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderRequest {
    /// Currency the `pay_amount` is denominated in.
    pub pay_in_currency: String,
    pub pay_amount: Decimal,
    pub side: Side,
}

/// Body parameters for `POST /v1/orders/limit`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitOrderRequest {
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub pair: String,
    pub post_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_order_id: Option<String>,
}

/// Body parameters for `POST /v1/orders/market`.
///
/// Exactly one of `base_amount` or `quote_amount` should be set.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<Decimal>,
    pub pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_order_id: Option<String>,
}

/// Body parameters for `DELETE /v1/orders/order`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: String,
    pub pair: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_trade_history_params_encoding() {
        let params = TradeHistoryParams {
            limit: Some(100),
            skip: Some(0),
            start_time: Some(Utc.with_ymd_and_hms(2019, 4, 25, 0, 0, 0).unwrap()),
            end_time: None,
        };
        let encoded = serde_urlencoded::to_string(&params).unwrap();

        assert_eq!(
            encoded,
            "limit=100&skip=0&startTime=2019-04-25T00%3A00%3A00Z"
        );
    }

    #[rstest]
    fn test_trade_history_params_default_is_empty() {
        let encoded = serde_urlencoded::to_string(TradeHistoryParams::default()).unwrap();
        assert!(encoded.is_empty());
    }

    #[rstest]
    fn test_limit_order_request_encoding() {
        let request = LimitOrderRequest {
            side: Side::Sell,
            quantity: Decimal::new(1, 1),
            price: Decimal::from(800_000),
            pair: "BTCZAR".to_string(),
            post_only: true,
            customer_order_id: None,
        };
        let encoded = serde_urlencoded::to_string(&request).unwrap();

        assert_eq!(
            encoded,
            "side=SELL&quantity=0.1&price=800000&pair=BTCZAR&postOnly=true"
        );
    }

    #[rstest]
    fn test_cancel_order_request_encoding() {
        let request = CancelOrderRequest {
            order_id: "abc".to_string(),
            pair: "BTCZAR".to_string(),
        };

        assert_eq!(
            serde_urlencoded::to_string(&request).unwrap(),
            "orderId=abc&pair=BTCZAR"
        );
    }
}
