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

//! Connection supervisor: owns the connect → serve → backoff → reconnect loop.
//!
//! The supervisor runs in a dedicated Tokio task and exclusively owns the live
//! session for its entire lifetime. The serve loop multiplexes inbound frames,
//! the liveness probe, and the subscription hand-off queue with
//! `tokio::select!`. Any session-level failure (handshake, signing, read,
//! write, decode, keepalive timeout) tears the session down and re-enters the
//! loop under backoff; only a close is terminal.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

use super::{
    backoff::{BackoffPolicy, FailureEpisode, default_backoff, next_wait},
    client::{StreamShared, UpdateCallback},
    error::{ValrWsError, ValrWsResult},
    messages::{SubscribeRequest, Subscription, ValrWsMessage, decode_frame},
    transport::{Frame, WsConnector, WsWriter},
};
use crate::{common::credential::Credential, config::ValrStreamConfig};

/// Server keepalive frames arrive as an empty JSON string.
const SERVER_KEEPALIVE: &str = "\"\"";

/// Supervisor states; transitions are logged for observability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SupervisorState {
    Connecting,
    Serving,
    Backoff,
    Closed,
}

impl std::fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Serving => write!(f, "SERVING"),
            Self::Backoff => write!(f, "BACKOFF"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Supervises one logical subscription feed across many transport sessions.
pub(crate) struct ConnectionSupervisor<C: WsConnector> {
    connector: C,
    url: String,
    credential: Credential,
    shared: Arc<StreamShared>,
    sub_rx: mpsc::UnboundedReceiver<Subscription>,
    callback: Option<UpdateCallback>,
    backoff: BackoffPolicy,
    attempt_reset: Duration,
    ping_interval: Duration,
    read_timeout: Duration,
    cancel: CancellationToken,
    state: SupervisorState,
}

impl<C: WsConnector> ConnectionSupervisor<C> {
    pub(crate) fn new(
        connector: C,
        url: String,
        credential: Credential,
        config: ValrStreamConfig,
        shared: Arc<StreamShared>,
        sub_rx: mpsc::UnboundedReceiver<Subscription>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            connector,
            url,
            credential,
            shared,
            sub_rx,
            callback: config.update_callback,
            backoff: config
                .backoff_policy
                .unwrap_or_else(|| Arc::new(default_backoff)),
            attempt_reset: config.attempt_reset,
            ping_interval: config.ping_interval,
            read_timeout: config.read_timeout,
            cancel,
            state: SupervisorState::Connecting,
        }
    }

    /// Runs the supervision loop until the handle is closed.
    pub(crate) async fn run(mut self) {
        let mut episode = FailureEpisode::new();

        loop {
            if self.should_stop() {
                break;
            }

            self.transition(SupervisorState::Connecting);
            match self.connect_and_serve(&mut episode).await {
                Ok(()) => break,
                Err(e) => {
                    tracing::warn!(url = %self.url, error = %e, "Connection error");
                }
            }
            if self.should_stop() {
                break;
            }

            let attempt = episode.record_failure(Instant::now(), self.attempt_reset);
            let wait = next_wait(&self.backoff, attempt);
            self.transition(SupervisorState::Backoff);
            tracing::info!(attempt, ?wait, "Waiting before reconnecting");

            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = time::sleep(wait) => {}
            }
        }

        self.transition(SupervisorState::Closed);
        tracing::debug!(url = %self.url, "Stream supervisor stopped");
    }

    fn should_stop(&self) -> bool {
        self.shared.is_closed() || self.cancel.is_cancelled()
    }

    fn transition(&mut self, next: SupervisorState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "State transition");
            self.state = next;
        }
    }

    /// One full session: signed handshake, subscription replay, serve loop.
    ///
    /// Returns `Ok(())` only when the close was observed; every `Err` is a
    /// session-level failure the run loop retries under backoff. A signing
    /// failure is deliberately indistinguishable from a transport failure
    /// here.
    async fn connect_and_serve(&mut self, episode: &mut FailureEpisode) -> ValrWsResult<()> {
        let headers = self.credential.auth_headers(&self.url, "GET", "")?;

        let cancel = self.cancel.clone();
        let (mut writer, mut frame_rx) = tokio::select! {
            () = cancel.cancelled() => return Ok(()),
            result = self.connector.connect(&self.url, headers) => result?,
        };

        tracing::info!(url = %self.url, key_id = %self.credential.api_key(), "Connection established");
        episode.reset();

        // Anything still sitting in the hand-off queue is already recorded in
        // the registry, which is about to be replayed in full.
        while self.sub_rx.try_recv().is_ok() {}

        for batch in self.shared.batches() {
            let payload = encode_subscribe(batch)?;
            writer.send_text(payload).await?;
        }

        self.transition(SupervisorState::Serving);
        let result = self.serve(&mut writer, &mut frame_rx).await;
        writer.close().await;
        result
    }

    async fn serve(
        &mut self,
        writer: &mut C::Writer,
        frame_rx: &mut mpsc::UnboundedReceiver<Frame>,
    ) -> ValrWsResult<()> {
        let cancel = self.cancel.clone();
        let mut ping = time::interval_at(Instant::now() + self.ping_interval, self.ping_interval);
        ping.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        let mut read_deadline = Instant::now() + self.read_timeout;

        loop {
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                _ = ping.tick() => {
                    if let Err(e) = writer.send_ping().await {
                        tracing::warn!(error = %e, "Failed to ping server");
                    }
                }
                subscription = self.sub_rx.recv() => {
                    match subscription {
                        Some(batch) => match encode_subscribe(batch) {
                            Ok(payload) => {
                                tracing::debug!(payload = %payload, "Sending subscription");
                                if let Err(e) = writer.send_text(payload).await {
                                    tracing::warn!(error = %e, "Failed to subscribe to pairs");
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "Failed to encode subscription"),
                        },
                        None => {
                            // Handle dropped without an explicit close
                            self.shared.set_closed();
                            return Ok(());
                        }
                    }
                }
                frame = time::timeout_at(read_deadline, frame_rx.recv()) => {
                    let frame = match frame {
                        Err(_) => {
                            return Err(ValrWsError::Transport(
                                "read deadline elapsed".to_string(),
                            ));
                        }
                        Ok(None) => {
                            return Err(ValrWsError::Transport(
                                "frame channel closed".to_string(),
                            ));
                        }
                        Ok(Some(frame)) => frame,
                    };

                    // Any inbound traffic is proof of life, not just pongs
                    read_deadline = Instant::now() + self.read_timeout;

                    match frame {
                        Frame::Pong => {}
                        Frame::Disconnected(reason) => {
                            return Err(ValrWsError::Transport(reason));
                        }
                        Frame::Text(text) => self.handle_text(&text)?,
                    }
                }
            }

            if self.shared.is_closed() {
                return Ok(());
            }
        }
    }

    fn handle_text(&self, text: &str) -> ValrWsResult<()> {
        if text == SERVER_KEEPALIVE {
            return Ok(());
        }

        match decode_frame(text)? {
            ValrWsMessage::TradeUpdate(update) => {
                if self.shared.is_closed() {
                    return Ok(());
                }
                tracing::trace!(pair = %update.pair, trade_id = %update.trade_id, "Trade update");
                if let Some(callback) = &self.callback {
                    callback(update);
                }
            }
            ValrWsMessage::Authenticated => tracing::debug!("Authenticated"),
            ValrWsMessage::Subscribed => tracing::debug!("Subscription acknowledged"),
            ValrWsMessage::Unknown(kind) => {
                tracing::warn!(kind = %kind, "Unknown message type");
            }
        }
        Ok(())
    }
}

fn encode_subscribe(batch: Subscription) -> ValrWsResult<String> {
    serde_json::to_string(&SubscribeRequest::single(batch)).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicU32, Ordering},
        },
    };

    use super::*;

    const TRADE_JSON: &str = r#"{"type":"NEW_TRADE","currencyPairSymbol":"BTCZAR","data":{"price":"500000","quantity":"0.01","currencyPair":"BTCZAR","tradedAt":"2019-04-25T19:51:35.393Z","takerSide":"buy","id":"abc"}}"#;
    const BAD_TRADE_JSON: &str = r#"{"type":"NEW_TRADE","currencyPairSymbol":"BTCZAR","data":42}"#;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Connect,
        Sent(String),
        Ping,
        Delivered(String),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: StdMutex<Vec<Event>>,
    }

    impl Recorder {
        fn push(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
            self.events().into_iter().filter(predicate).count()
        }
    }

    enum ConnectScript {
        Fail,
        Session { frames: Vec<Frame>, hold_open: bool },
    }

    struct MockConnector {
        script: StdMutex<VecDeque<ConnectScript>>,
        recorder: Arc<Recorder>,
        attempts: AtomicU32,
        attempt_times: StdMutex<Vec<Instant>>,
        session_tx: StdMutex<Option<mpsc::UnboundedSender<Frame>>>,
    }

    impl MockConnector {
        fn new(recorder: Arc<Recorder>, script: Vec<ConnectScript>) -> Arc<Self> {
            Arc::new(Self {
                script: StdMutex::new(script.into()),
                recorder,
                attempts: AtomicU32::new(0),
                attempt_times: StdMutex::new(Vec::new()),
                session_tx: StdMutex::new(None),
            })
        }

        fn attempts(&self) -> u32 {
            self.attempts.load(Ordering::SeqCst)
        }

        fn attempt_times(&self) -> Vec<Instant> {
            self.attempt_times.lock().unwrap().clone()
        }
    }

    struct MockWriter {
        recorder: Arc<Recorder>,
    }

    #[async_trait::async_trait]
    impl WsWriter for MockWriter {
        async fn send_text(&mut self, payload: String) -> ValrWsResult<()> {
            self.recorder.push(Event::Sent(payload));
            Ok(())
        }

        async fn send_ping(&mut self) -> ValrWsResult<()> {
            self.recorder.push(Event::Ping);
            Ok(())
        }

        async fn close(&mut self) {}
    }

    #[async_trait::async_trait]
    impl WsConnector for Arc<MockConnector> {
        type Writer = MockWriter;

        async fn connect(
            &self,
            _url: &str,
            _headers: Vec<(String, String)>,
        ) -> ValrWsResult<(MockWriter, mpsc::UnboundedReceiver<Frame>)> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.attempt_times.lock().unwrap().push(Instant::now());
            self.recorder.push(Event::Connect);

            match self.script.lock().unwrap().pop_front() {
                None | Some(ConnectScript::Fail) => {
                    Err(ValrWsError::Transport("connection refused".to_string()))
                }
                Some(ConnectScript::Session { frames, hold_open }) => {
                    let (tx, rx) = mpsc::unbounded_channel();
                    for frame in frames {
                        let _ = tx.send(frame);
                    }
                    *self.session_tx.lock().unwrap() = hold_open.then(|| tx);
                    Ok((
                        MockWriter {
                            recorder: self.recorder.clone(),
                        },
                        rx,
                    ))
                }
            }
        }
    }

    struct Harness {
        recorder: Arc<Recorder>,
        connector: Arc<MockConnector>,
        shared: Arc<StreamShared>,
        sub_tx: mpsc::UnboundedSender<Subscription>,
        cancel: CancellationToken,
        task: tokio::task::JoinHandle<()>,
    }

    impl Harness {
        fn start(script: Vec<ConnectScript>, config: ValrStreamConfig) -> Self {
            let recorder = Arc::new(Recorder::default());
            let connector = MockConnector::new(recorder.clone(), script);
            let shared = Arc::new(StreamShared::default());
            let (sub_tx, sub_rx) = mpsc::unbounded_channel();
            let cancel = CancellationToken::new();

            let delivery = recorder.clone();
            let config = config
                .with_update_callback(move |update| delivery.push(Event::Delivered(update.trade_id)));

            let supervisor = ConnectionSupervisor::new(
                connector.clone(),
                "wss://mock.invalid/ws/trade".to_string(),
                Credential::new("key".to_string(), "secret".to_string()),
                config,
                shared.clone(),
                sub_rx,
                cancel.clone(),
            );
            let task = tokio::spawn(supervisor.run());

            Self {
                recorder,
                connector,
                shared,
                sub_tx,
                cancel,
                task,
            }
        }

        fn subscribe(&self, pairs: Vec<&str>) {
            let subscription =
                Subscription::new_trades(pairs.into_iter().map(String::from).collect());
            self.shared.record(subscription.clone());
            let _ = self.sub_tx.send(subscription);
        }

        fn close(&self) {
            self.shared.set_closed();
            self.cancel.cancel();
        }

        async fn wait_until(&self, mut condition: impl FnMut() -> bool) {
            for _ in 0..5_000 {
                if condition() {
                    return;
                }
                time::sleep(Duration::from_millis(100)).await;
            }
            panic!("condition not met; events: {:?}", self.recorder.events());
        }

        async fn shutdown(self) {
            self.close();
            let _ = self.task.await;
        }
    }

    fn fast_config() -> ValrStreamConfig {
        ValrStreamConfig::default()
            .with_backoff_policy(|attempt| Duration::from_secs(u64::from(attempt)))
            .with_ping_interval(Duration::from_secs(10))
            .with_read_timeout(Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_precedes_first_delivery() {
        let harness = Harness::start(
            vec![ConnectScript::Session {
                frames: vec![Frame::Text(TRADE_JSON.to_string())],
                hold_open: true,
            }],
            fast_config(),
        );
        harness.subscribe(vec!["BTCZAR"]);

        let recorder = harness.recorder.clone();
        harness
            .wait_until(|| recorder.count(|e| matches!(e, Event::Delivered(_))) == 1)
            .await;

        let events = harness.recorder.events();
        assert_eq!(events[0], Event::Connect);
        let Event::Sent(subscribe_payload) = &events[1] else {
            panic!("expected replay before delivery, got {events:?}");
        };
        assert!(subscribe_payload.contains("SUBSCRIBE"));
        assert!(subscribe_payload.contains("BTCZAR"));
        assert_eq!(events[2], Event::Delivered("abc".to_string()));

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_follow_policy() {
        let harness = Harness::start(
            vec![
                ConnectScript::Fail,
                ConnectScript::Fail,
                ConnectScript::Fail,
                ConnectScript::Session {
                    frames: vec![],
                    hold_open: true,
                },
            ],
            fast_config(),
        );

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 4).await;

        let times = harness.connector.attempt_times();
        let waits: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            waits,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3),
            ]
        );

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_error_ends_session_with_one_backoff() {
        let harness = Harness::start(
            vec![
                ConnectScript::Session {
                    frames: vec![Frame::Text(BAD_TRADE_JSON.to_string())],
                    hold_open: true,
                },
                ConnectScript::Session {
                    frames: vec![],
                    hold_open: true,
                },
            ],
            fast_config(),
        );
        harness.subscribe(vec!["BTCZAR"]);

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 2).await;

        // The registry is replayed on each of the two connections
        let recorder = harness.recorder.clone();
        harness
            .wait_until(|| recorder.count(|e| matches!(e, Event::Sent(p) if p.contains("SUBSCRIBE"))) == 2)
            .await;

        // The malformed payload never reaches the callback, and the episode
        // was reset by the first successful connect, so the single backoff
        // used attempt count one
        assert_eq!(harness.recorder.count(|e| matches!(e, Event::Delivered(_))), 0);
        let times = harness.connector.attempt_times();
        assert_eq!(times[1] - times[0], Duration::from_secs(1));

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_kind_does_not_end_session() {
        let harness = Harness::start(
            vec![ConnectScript::Session {
                frames: vec![
                    Frame::Text(r#"{"type":"MARKET_SUMMARY_UPDATE","data":{}}"#.to_string()),
                    Frame::Text(TRADE_JSON.to_string()),
                ],
                hold_open: true,
            }],
            fast_config(),
        );

        let recorder = harness.recorder.clone();
        harness
            .wait_until(|| recorder.count(|e| matches!(e, Event::Delivered(_))) == 1)
            .await;

        assert_eq!(harness.connector.attempts(), 1);
        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_while_disconnected_is_replayed_once() {
        let harness = Harness::start(
            vec![
                ConnectScript::Fail,
                ConnectScript::Session {
                    frames: vec![],
                    hold_open: true,
                },
            ],
            fast_config(),
        );
        harness.subscribe(vec!["BTCZAR"]);

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 2).await;

        let recorder = harness.recorder.clone();
        harness
            .wait_until(|| recorder.count(|e| matches!(e, Event::Sent(_))) >= 1)
            .await;
        // Recorded once in the registry, sent once: the stale hand-off entry
        // is superseded by the replay
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            harness
                .recorder
                .count(|e| matches!(e, Event::Sent(p) if p.contains("SUBSCRIBE"))),
            1
        );

        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_keepalive_timeout_triggers_reconnect() {
        let config = ValrStreamConfig::default()
            .with_backoff_policy(|_| Duration::from_secs(1))
            .with_ping_interval(Duration::from_secs(5))
            .with_read_timeout(Duration::from_secs(12));
        let harness = Harness::start(
            vec![
                ConnectScript::Session {
                    frames: vec![],
                    hold_open: true,
                },
                ConnectScript::Session {
                    frames: vec![],
                    hold_open: true,
                },
            ],
            config,
        );

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 2).await;

        // Probes were sent while the silent session was still considered live
        assert!(harness.recorder.count(|e| matches!(e, Event::Ping)) >= 2);
        harness.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_backoff_is_terminal() {
        let config = ValrStreamConfig::default()
            .with_backoff_policy(|_| Duration::from_secs(3_600))
            .with_ping_interval(Duration::from_secs(10))
            .with_read_timeout(Duration::from_secs(30));
        let harness = Harness::start(vec![ConnectScript::Fail], config);

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 1).await;

        harness.close();
        let task = harness.task;
        tokio::time::timeout(Duration::from_secs(60), task)
            .await
            .expect("supervisor did not stop after close")
            .unwrap();

        assert_eq!(harness.connector.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delivery_after_close() {
        let harness = Harness::start(
            vec![ConnectScript::Session {
                frames: vec![],
                hold_open: true,
            }],
            fast_config(),
        );

        let connector = harness.connector.clone();
        harness.wait_until(|| connector.attempts() == 1).await;

        harness.close();
        harness.close(); // Idempotent
        let recorder = harness.recorder.clone();
        let connector = harness.connector.clone();

        // Feed a trade after the close; it must never reach the callback
        if let Some(tx) = connector.session_tx.lock().unwrap().clone() {
            let _ = tx.send(Frame::Text(TRADE_JSON.to_string()));
        }
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(recorder.count(|e| matches!(e, Event::Delivered(_))), 0);
        let _ = harness.task.await;
    }
}
