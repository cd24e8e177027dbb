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

//! Enumerations shared by the VALR REST and streaming clients.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Order or trade side.
///
/// VALR sends `buy`/`sell` in trade payloads and expects `BUY`/`SELL` when
/// placing orders; deserialization accepts either casing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum Side {
    /// The taker bought; or an order to buy.
    #[serde(alias = "buy")]
    Buy,
    /// The taker sold; or an order to sell.
    #[serde(alias = "sell")]
    Sell,
}

impl Side {
    /// Returns the lowercase wire form used in trade payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r#""buy""#, Side::Buy)]
    #[case(r#""sell""#, Side::Sell)]
    #[case(r#""BUY""#, Side::Buy)]
    #[case(r#""SELL""#, Side::Sell)]
    fn test_side_deserialize_both_casings(#[case] json: &str, #[case] expected: Side) {
        let side: Side = serde_json::from_str(json).unwrap();
        assert_eq!(side, expected);
    }

    #[rstest]
    fn test_side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), r#""SELL""#);
    }

    #[rstest]
    fn test_side_display_lowercase() {
        assert_eq!(Side::Buy.to_string(), "buy");
    }
}
