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

//! Transport seam for the streaming client.
//!
//! The supervisor is generic over a [`WsConnector`], which establishes one
//! session per call: a write half implementing [`WsWriter`] plus a channel of
//! inbound [`Frame`]s pumped by a reader task the connector owns. Tests inject
//! scripted connectors; production uses [`TungsteniteConnector`].

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{HeaderName, HeaderValue},
        protocol::Message,
    },
};

use super::error::{ValrWsError, ValrWsResult};

/// An inbound frame, reduced to what the serve loop cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text payload to be decoded.
    Text(String),
    /// A liveness response (pong or inbound ping); carries no payload.
    Pong,
    /// The transport ended; the payload describes why.
    Disconnected(String),
}

/// Write half of an established streaming session.
#[async_trait]
pub trait WsWriter: Send {
    /// Sends a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the write.
    async fn send_text(&mut self, payload: String) -> ValrWsResult<()>;

    /// Sends a liveness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the write.
    async fn send_ping(&mut self) -> ValrWsResult<()>;

    /// Closes the session; the reader side observes the close shortly after.
    async fn close(&mut self);
}

/// Establishes streaming sessions.
#[async_trait]
pub trait WsConnector: Send + Sync + 'static {
    /// The write half produced per session.
    type Writer: WsWriter;

    /// Connects to `url` with the given handshake headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails.
    async fn connect(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
    ) -> ValrWsResult<(Self::Writer, mpsc::UnboundedReceiver<Frame>)>;
}

type WsSink = futures_util::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<TcpStream>>,
    Message,
>;

/// Production connector over tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

/// Write half of a tokio-tungstenite session.
#[derive(Debug)]
pub struct TungsteniteWriter {
    sink: WsSink,
}

#[async_trait]
impl WsWriter for TungsteniteWriter {
    async fn send_text(&mut self, payload: String) -> ValrWsResult<()> {
        self.sink
            .send(Message::text(payload))
            .await
            .map_err(|e| ValrWsError::Transport(e.to_string()))
    }

    async fn send_ping(&mut self) -> ValrWsResult<()> {
        self.sink
            .send(Message::Ping(Vec::new().into()))
            .await
            .map_err(|e| ValrWsError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

#[async_trait]
impl WsConnector for TungsteniteConnector {
    type Writer = TungsteniteWriter;

    async fn connect(
        &self,
        url: &str,
        headers: Vec<(String, String)>,
    ) -> ValrWsResult<(Self::Writer, mpsc::UnboundedReceiver<Frame>)> {
        let mut request = url
            .into_client_request()
            .map_err(|e| ValrWsError::Transport(e.to_string()))?;

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ValrWsError::Transport(e.to_string()))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ValrWsError::Transport(e.to_string()))?;
            request.headers_mut().insert(name, value);
        }

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| ValrWsError::Transport(format!("unable to dial server: {e}")))?;

        let (sink, mut read) = stream.split();
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        // Reader task: pumps inbound frames into the channel until the
        // transport ends or the session side is dropped.
        tokio::spawn(async move {
            loop {
                let frame = match read.next().await {
                    None => Frame::Disconnected("connection closed".to_string()),
                    Some(Err(e)) => Frame::Disconnected(e.to_string()),
                    Some(Ok(msg)) => match msg {
                        Message::Text(text) => Frame::Text(text.to_string()),
                        Message::Binary(data) => {
                            Frame::Text(String::from_utf8_lossy(&data).into_owned())
                        }
                        Message::Ping(_) | Message::Pong(_) => Frame::Pong,
                        Message::Close(_) => {
                            Frame::Disconnected("server closed the connection".to_string())
                        }
                        Message::Frame(_) => continue,
                    },
                };

                let ended = matches!(frame, Frame::Disconnected(_));
                if frame_tx.send(frame).is_err() || ended {
                    break;
                }
            }
        });

        Ok((TungsteniteWriter { sink }, frame_rx))
    }
}
