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

//! VALR HTTP client error types.

use thiserror::Error;

use crate::common::credential::CredentialError;

/// Error types for the VALR HTTP client.
#[derive(Debug, Clone, Error)]
pub enum ValrHttpError {
    /// Credentials were missing or empty.
    #[error("valr: no credentials provided")]
    MissingCredentials,
    /// The venue rejected the request with HTTP 429. Surfaced to the caller
    /// rather than silently retried: it implies a rate policy violation.
    #[error("valr: too many requests")]
    TooManyRequests,
    /// Error payload returned by the VALR API.
    #[error("valr: {message} ({code})")]
    Api {
        /// The error code from VALR.
        code: String,
        /// The error message from VALR; may be localised.
        message: String,
    },
    /// Non-success status with an unrecognized body.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },
    /// Failed to build the signed request headers.
    #[error("signing error: {0}")]
    Signing(String),
    /// Failed to encode request parameters.
    #[error("encoding error: {0}")]
    Encode(String),
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
    /// Failed to decode a response body.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<reqwest::Error> for ValrHttpError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<CredentialError> for ValrHttpError {
    fn from(error: CredentialError) -> Self {
        Self::Signing(error.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ValrHttpError {
    fn from(error: serde_urlencoded::ser::Error) -> Self {
        Self::Encode(error.to_string())
    }
}

/// Result type alias for VALR HTTP operations.
pub type ValrHttpResult<T> = Result<T, ValrHttpError>;
