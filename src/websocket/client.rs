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

//! Streaming client handle for the VALR trade feed.
//!
//! [`ValrStreamClient::dial`] validates credentials, spawns the connection
//! supervisor as an independent task, and returns immediately. The handle and
//! the supervisor share only the closed flag and the subscription registry;
//! the live session itself is owned exclusively by the supervisor task.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{
    error::{ValrWsError, ValrWsResult},
    messages::{Subscription, TradeUpdate},
    supervisor::ConnectionSupervisor,
    transport::{TungsteniteConnector, WsConnector},
};
use crate::{
    common::{consts::VALR_WS_TRADE_URL, credential::Credential},
    config::ValrStreamConfig,
};

/// Callback invoked for each decoded trade update.
///
/// Executes on the supervisor task, sequentially and never reentrantly. It
/// must not block indefinitely: it sits on the critical path of further
/// message delivery.
pub type UpdateCallback = Arc<dyn Fn(TradeUpdate) + Send + Sync>;

/// Desired subscriptions, merged per event kind.
///
/// The registry is replayed in full after every successful reconnection,
/// because the venue holds no subscription state across sessions.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionRegistry {
    batches: Vec<Subscription>,
}

impl SubscriptionRegistry {
    /// Records a batch, merging its pairs into an existing batch for the same
    /// event kind.
    pub(crate) fn record(&mut self, subscription: Subscription) {
        if let Some(batch) = self
            .batches
            .iter_mut()
            .find(|b| b.event == subscription.event)
        {
            for pair in subscription.pairs {
                if !batch.pairs.contains(&pair) {
                    batch.pairs.push(pair);
                }
            }
        } else {
            self.batches.push(subscription);
        }
    }

    /// Returns a snapshot of all desired batches.
    pub(crate) fn batches(&self) -> Vec<Subscription> {
        self.batches.clone()
    }
}

/// State shared between the handle and the supervisor task.
#[derive(Debug, Default)]
pub(crate) struct StreamShared {
    closed: AtomicBool,
    registry: Mutex<SubscriptionRegistry>,
}

impl StreamShared {
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Sets the closed flag; returns whether this call flipped it.
    pub(crate) fn set_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn record(&self, subscription: Subscription) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(subscription);
    }

    pub(crate) fn batches(&self) -> Vec<Subscription> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .batches()
    }
}

/// Streaming client for the VALR trade feed.
///
/// The underlying transport session may be torn down and recreated many times
/// during the handle's lifetime; the handle stays valid until [`Self::close`].
#[derive(Clone)]
pub struct ValrStreamClient {
    url: String,
    shared: Arc<StreamShared>,
    sub_tx: mpsc::UnboundedSender<Subscription>,
    cancel: CancellationToken,
    task_handle: Arc<tokio::task::JoinHandle<()>>,
}

impl std::fmt::Debug for ValrStreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(ValrStreamClient))
            .field("url", &self.url)
            .field("is_closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl ValrStreamClient {
    /// Dials the VALR trade stream and starts processing updates.
    ///
    /// The connection is established by a background supervisor task which
    /// reconnects automatically on error; this call returns without waiting
    /// for the first connection.
    ///
    /// # Errors
    ///
    /// Returns [`ValrWsError::InvalidCredentials`] if either credential is
    /// empty. No task is started in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn dial(
        key_id: String,
        key_secret: String,
        config: ValrStreamConfig,
    ) -> ValrWsResult<Self> {
        Self::dial_with_connector(key_id, key_secret, config, TungsteniteConnector)
    }

    /// Dials with a custom transport connector.
    ///
    /// This is the seam used by tests to inject scripted transports; callers
    /// with bespoke transport needs can use it the same way.
    ///
    /// # Errors
    ///
    /// Returns [`ValrWsError::InvalidCredentials`] if either credential is
    /// empty. No task is started in that case.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn dial_with_connector<C: WsConnector>(
        key_id: String,
        key_secret: String,
        config: ValrStreamConfig,
        connector: C,
    ) -> ValrWsResult<Self> {
        if key_id.is_empty() || key_secret.is_empty() {
            return Err(ValrWsError::InvalidCredentials);
        }

        let credential = Credential::new(key_id, key_secret);
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| VALR_WS_TRADE_URL.to_string());

        let shared = Arc::new(StreamShared::default());
        let (sub_tx, sub_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let supervisor = ConnectionSupervisor::new(
            connector,
            url.clone(),
            credential,
            config,
            shared.clone(),
            sub_rx,
            cancel.clone(),
        );
        let task_handle = tokio::spawn(supervisor.run());

        Ok(Self {
            url,
            shared,
            sub_tx,
            cancel,
            task_handle: Arc::new(task_handle),
        })
    }

    /// Subscribes to trade updates for the given currency pairs.
    ///
    /// Fire-and-forget: the batch is recorded in the registry and handed off
    /// to the supervisor without blocking on network I/O. If no session is
    /// currently live, the subscription is replayed at the next successful
    /// connection. A no-op after [`Self::close`].
    pub fn subscribe_new_trades(&self, pairs: Vec<String>) {
        let subscription = Subscription::new_trades(pairs);
        self.shared.record(subscription.clone());
        let _ = self.sub_tx.send(subscription);
    }

    /// Closes the stream.
    ///
    /// Idempotent. Any live session is torn down and no further reconnect
    /// attempts are started; the update callback does not fire once the close
    /// is observed by the supervisor.
    pub fn close(&self) {
        if self.shared.set_closed() {
            tracing::debug!("Closing stream client");
        }
        self.cancel.cancel();
    }

    /// Returns whether the client has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Returns the WebSocket URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether the supervisor task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }
}
