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

//! VALR HTTP client implementation.

use std::sync::Arc;

use reqwest::{Method, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};

use super::{
    error::{ValrHttpError, ValrHttpResult},
    models::{
        DepositAddress, OrderHistorySummary, OrderIdResponse, OrderStatus, ServerTime,
        SimpleOrderAck, SimpleOrderStatus, SimpleQuote, TradeHistoryEntry, ValrErrorResponse,
        WithdrawInfo,
    },
    query::{
        CancelOrderRequest, LimitOrderRequest, MarketOrderRequest, SimpleOrderRequest,
        TradeHistoryParams,
    },
    ratelimit::RateLimiter,
};
use crate::{
    common::{consts::VALR_HTTP_URL, credential::Credential},
    config::ValrHttpConfig,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client for the VALR REST API.
///
/// Handles:
/// - Base URL resolution with an optional override.
/// - HMAC SHA512 signing for private endpoints.
/// - A sliding-interval rate gate applied to every request.
/// - Error deserialization for VALR error payloads.
#[derive(Debug, Clone)]
pub struct ValrHttpClient {
    client: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
    limiter: Arc<RateLimiter>,
}

impl ValrHttpClient {
    /// Creates a new [`ValrHttpClient`] from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build, or if
    /// only one of the two credential fields is provided or either is empty.
    pub fn new(config: ValrHttpConfig) -> ValrHttpResult<Self> {
        let credential = match (config.api_key, config.api_secret) {
            (Some(key), Some(secret)) => {
                if key.is_empty() || secret.is_empty() {
                    return Err(ValrHttpError::MissingCredentials);
                }
                Some(Credential::new(key, secret))
            }
            (None, None) => None,
            _ => return Err(ValrHttpError::MissingCredentials),
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ValrHttpError::Network(e.to_string()))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| VALR_HTTP_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            credential,
            limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max,
                config.rate_limit_interval,
            )),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether the client has credentials configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credential.is_some()
    }

    async fn request<P, T>(
        &self,
        method: Method,
        path: &str,
        params: Option<&P>,
        auth: bool,
    ) -> ValrHttpResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(method, path, params, auth).await?;
        serde_json::from_str::<T>(&body).map_err(|e| ValrHttpError::Json(e.to_string()))
    }

    async fn request_no_content<P>(
        &self,
        method: Method,
        path: &str,
        params: Option<&P>,
        auth: bool,
    ) -> ValrHttpResult<()>
    where
        P: Serialize + ?Sized,
    {
        self.send(method, path, params, auth).await.map(|_| ())
    }

    async fn send<P>(
        &self,
        method: Method,
        path: &str,
        params: Option<&P>,
        auth: bool,
    ) -> ValrHttpResult<String>
    where
        P: Serialize + ?Sized,
    {
        self.limiter.acquire().await;

        let encoded = params
            .map(serde_urlencoded::to_string)
            .transpose()?
            .unwrap_or_default();

        let mut url = format!("{}{}", self.base_url, path);
        let mut body = String::new();
        if method == Method::GET {
            if !encoded.is_empty() {
                url.push('?');
                url.push_str(&encoded);
            }
        } else {
            body = encoded;
        }

        tracing::debug!(%method, %url, "Sending request");

        let mut builder = self.client.request(method.clone(), &url);
        if method != Method::GET {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        if auth {
            let credential = self
                .credential
                .as_ref()
                .ok_or(ValrHttpError::MissingCredentials)?;
            for (name, value) in credential.auth_headers(&url, method.as_str(), &body)? {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ValrHttpError::TooManyRequests);
        }
        if !status.is_success() {
            return Err(Self::parse_error_response(status.as_u16(), text));
        }

        Ok(text)
    }

    fn parse_error_response(status: u16, body: String) -> ValrHttpError {
        if let Ok(err) = serde_json::from_str::<ValrErrorResponse>(&body) {
            return ValrHttpError::Api {
                code: err.code,
                message: err.message,
            };
        }
        ValrHttpError::UnexpectedStatus { status, body }
    }

    // ------------------------------------------------------------------------------------------------
    // Public endpoints
    // ------------------------------------------------------------------------------------------------

    /// Returns the venue's server time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn server_time(&self) -> ValrHttpResult<ServerTime> {
        self.request(Method::GET, "/public/time", None::<&()>, false)
            .await
    }

    // ------------------------------------------------------------------------------------------------
    // Private endpoints
    // ------------------------------------------------------------------------------------------------

    /// Returns the authenticated trade history for a currency pair.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn trade_history(
        &self,
        pair: &str,
        params: &TradeHistoryParams,
    ) -> ValrHttpResult<Vec<TradeHistoryEntry>> {
        let path = format!("/marketdata/{pair}/tradehistory");
        self.request(Method::GET, &path, Some(params), true).await
    }

    /// Returns the default deposit address for a currency.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn deposit_address(&self, currency: &str) -> ValrHttpResult<DepositAddress> {
        let path = format!("/wallet/crypto/{currency}/deposit/address");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Returns withdrawal constraints for a currency.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn withdraw_info(&self, currency: &str) -> ValrHttpResult<WithdrawInfo> {
        let path = format!("/wallet/crypto/{currency}/withdraw");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Requests a simple buy/sell quote for a currency pair.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn simple_quote(
        &self,
        pair: &str,
        request: &SimpleOrderRequest,
    ) -> ValrHttpResult<SimpleQuote> {
        let path = format!("/simple/{pair}/quote");
        self.request(Method::POST, &path, Some(request), true).await
    }

    /// Submits a simple buy/sell order for a currency pair.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn simple_order(
        &self,
        pair: &str,
        request: &SimpleOrderRequest,
    ) -> ValrHttpResult<SimpleOrderAck> {
        let path = format!("/simple/{pair}/order");
        self.request(Method::POST, &path, Some(request), true).await
    }

    /// Returns the status of a simple buy/sell order.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn simple_order_status(
        &self,
        pair: &str,
        order_id: &str,
    ) -> ValrHttpResult<SimpleOrderStatus> {
        let path = format!("/simple/{pair}/order/{order_id}");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Returns the status of an order by its venue-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn order_status(&self, pair: &str, order_id: &str) -> ValrHttpResult<OrderStatus> {
        let path = format!("/orders/{pair}/orderid/{order_id}");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Returns the history summary of an order by its venue-assigned
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn order_history_summary(
        &self,
        order_id: &str,
    ) -> ValrHttpResult<OrderHistorySummary> {
        let path = format!("/orders/history/summary/orderid/{order_id}");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Returns the history summary of an order by its customer-assigned
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn order_history_summary_by_customer_id(
        &self,
        customer_order_id: &str,
    ) -> ValrHttpResult<OrderHistorySummary> {
        let path = format!("/orders/history/summary/customerorderid/{customer_order_id}");
        self.request(Method::GET, &path, None::<&()>, true).await
    }

    /// Places a limit order.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn place_limit_order(
        &self,
        request: &LimitOrderRequest,
    ) -> ValrHttpResult<OrderIdResponse> {
        self.request(Method::POST, "/orders/limit", Some(request), true)
            .await
    }

    /// Places a market order.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn place_market_order(
        &self,
        request: &MarketOrderRequest,
    ) -> ValrHttpResult<OrderIdResponse> {
        self.request(Method::POST, "/orders/market", Some(request), true)
            .await
    }

    /// Cancels an open order. The venue acknowledges with an empty 202.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the request fails.
    pub async fn cancel_order(&self, request: &CancelOrderRequest) -> ValrHttpResult<()> {
        self.request_no_content(Method::DELETE, "/orders/order", Some(request), true)
            .await
    }
}
