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

//! Streams live trades for a currency pair until interrupted.
//!
//! Reads `VALR_API_KEY` and `VALR_API_SECRET` from the environment; the pair
//! defaults to `BTCZAR` and can be overridden with the first argument.

use valr_client::{ValrStreamClient, ValrStreamConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let api_key = std::env::var("VALR_API_KEY")?;
    let api_secret = std::env::var("VALR_API_SECRET")?;
    let pair = std::env::args().nth(1).unwrap_or_else(|| "BTCZAR".to_string());

    let config = ValrStreamConfig::default().with_update_callback(|update| {
        println!(
            "{} {} {} @ {} ({})",
            update.pair, update.taker_side, update.quantity, update.price, update.trade_id,
        );
    });

    let client = ValrStreamClient::dial(api_key, api_secret, config)?;
    client.subscribe_new_trades(vec![pair]);

    tokio::signal::ctrl_c().await?;
    client.close();
    Ok(())
}
