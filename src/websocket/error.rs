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

//! VALR streaming client error types.

use thiserror::Error;

use crate::common::credential::CredentialError;

/// Error types for the VALR streaming client.
///
/// Only [`ValrWsError::InvalidCredentials`] is ever returned to the caller
/// (synchronously, from `dial`). Every other variant is a session-level
/// failure: the supervisor catches it, tears the session down, and retries
/// under backoff without surfacing it beyond logging.
#[derive(Debug, Clone, Error)]
pub enum ValrWsError {
    /// Credentials were missing or empty at dial time.
    #[error("streaming API requires credentials")]
    InvalidCredentials,
    /// Failed to build the signed handshake; treated as a transient connect
    /// failure and retried under backoff.
    #[error("signing error: {0}")]
    Signing(String),
    /// Transport-level failure during handshake, read, or write.
    #[error("transport error: {0}")]
    Transport(String),
    /// A recognized message kind carried a payload that failed to parse; fatal
    /// for the session.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<CredentialError> for ValrWsError {
    fn from(error: CredentialError) -> Self {
        Self::Signing(error.to_string())
    }
}

impl From<serde_json::Error> for ValrWsError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Result type alias for VALR streaming operations.
pub type ValrWsResult<T> = Result<T, ValrWsError>;
