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

//! VALR API credential handling and request signing.

use std::fmt::Debug;

use aws_lc_rs::hmac;
use thiserror::Error;
use zeroize::ZeroizeOnDrop;

use super::consts::{HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};

/// Error building signed authentication headers.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The URL scheme is not one the signing scheme recognizes.
    #[error("unrecognized URL scheme: {0}")]
    UnrecognizedScheme(String),
}

/// VALR API credentials for signing requests.
///
/// Uses HMAC SHA512 with hexadecimal encoding over the concatenation of the
/// millisecond timestamp, the uppercased HTTP verb, the request path (including
/// any query string), and the request body, as required by VALR API signing.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    #[zeroize(skip)]
    pub api_key: String,
    api_secret: Box<[u8]>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Creates a new [`Credential`] instance.
    #[must_use]
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret: api_secret.into_bytes().into_boxed_slice(),
        }
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Signs a request and returns a lowercase hex digest.
    ///
    /// The signature covers the literal request path (with query string) and
    /// the verb as sent on the wire.
    #[must_use]
    pub fn sign(&self, timestamp: &str, verb: &str, path: &str, body: &str) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA512, &self.api_secret);
        let mut ctx = hmac::Context::with_key(&key);
        ctx.update(timestamp.as_bytes());
        ctx.update(verb.to_uppercase().as_bytes());
        ctx.update(path.as_bytes());
        ctx.update(body.as_bytes());
        hex::encode(ctx.sign().as_ref())
    }

    /// Builds the signed authentication header set for a request to `url`,
    /// timestamped with the current wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or its scheme is
    /// unrecognized.
    pub fn auth_headers(
        &self,
        url: &str,
        verb: &str,
        body: &str,
    ) -> Result<Vec<(String, String)>, CredentialError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        self.auth_headers_at(url, verb, body, timestamp)
    }

    /// Builds the signed authentication header set with an explicit timestamp
    /// in Unix milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or its scheme is
    /// unrecognized.
    pub fn auth_headers_at(
        &self,
        url: &str,
        verb: &str,
        body: &str,
        timestamp_ms: i64,
    ) -> Result<Vec<(String, String)>, CredentialError> {
        let path = request_path(url)?;
        let timestamp = timestamp_ms.to_string();
        let signature = self.sign(&timestamp, verb, &path, body);

        Ok(vec![
            (HEADER_API_KEY.to_string(), self.api_key.clone()),
            (HEADER_SIGNATURE.to_string(), signature),
            (HEADER_TIMESTAMP.to_string(), timestamp),
        ])
    }
}

/// Derives the signed request path (path plus query string) from a full URL.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or its scheme is not one of
/// `http`, `https`, `ws`, or `wss`.
pub fn request_path(url: &str) -> Result<String, CredentialError> {
    let parsed = url::Url::parse(url).map_err(|e| CredentialError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" | "ws" | "wss" => {}
        other => return Err(CredentialError::UnrecognizedScheme(other.to_string())),
    }

    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // Official VALR signing example from:
    // https://docs.valr.com/#authentication
    const VALR_TEST_SECRET: &str =
        "4961b74efac86b25cce8fbe4c9811c4c7a787b7a5996660afcc2e287ad864363";

    fn test_credential() -> Credential {
        Credential::new("test_key".to_string(), VALR_TEST_SECRET.to_string())
    }

    #[rstest]
    fn test_sign_matches_valr_docs_example() {
        let cred = test_credential();
        let signature = cred.sign("1558014486185", "GET", "/v1/account/balances", "");
        let expected = "9d52c181ed69460b49307b7891f04658e938b21181173844b5018b2fe783a6d4c62b8e67a03de4d099e7437ebfabe12c56233b73c6a0cc0f7ae87e05f6289928";

        assert_eq!(signature, expected);
    }

    #[rstest]
    fn test_sign_uppercases_verb() {
        let cred = test_credential();

        assert_eq!(
            cred.sign("1558014486185", "get", "/v1/account/balances", ""),
            cred.sign("1558014486185", "GET", "/v1/account/balances", ""),
        );
    }

    #[rstest]
    #[case("wss://api.valr.com/ws/trade", "/ws/trade")]
    #[case("https://api.valr.com/v1/public/time", "/v1/public/time")]
    #[case(
        "https://api.valr.com/v1/marketdata/BTCZAR/tradehistory?limit=100&skip=0",
        "/v1/marketdata/BTCZAR/tradehistory?limit=100&skip=0"
    )]
    fn test_request_path(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(request_path(url).unwrap(), expected);
    }

    #[rstest]
    fn test_request_path_rejects_unrecognized_scheme() {
        let result = request_path("ftp://api.valr.com/ws/trade");

        assert!(matches!(
            result,
            Err(CredentialError::UnrecognizedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[rstest]
    fn test_auth_headers_at_contains_full_set() {
        let cred = test_credential();
        let headers = cred
            .auth_headers_at("wss://api.valr.com/ws/trade", "GET", "", 1558014486185)
            .unwrap();

        let expected_signature = cred.sign("1558014486185", "GET", "/ws/trade", "");
        assert_eq!(
            headers,
            vec![
                ("X-VALR-API-KEY".to_string(), "test_key".to_string()),
                ("X-VALR-SIGNATURE".to_string(), expected_signature),
                ("X-VALR-TIMESTAMP".to_string(), "1558014486185".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", test_credential());

        assert!(output.contains("<redacted>"));
        assert!(!output.contains(VALR_TEST_SECRET));
    }
}
