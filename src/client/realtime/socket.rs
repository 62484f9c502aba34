//! Push-channel transport
//!
//! A Socket.IO client over the Engine.IO HTTP long-polling transport. One
//! `tokio` task owns the connection: it performs the handshake, connects the
//! `/board` namespace, answers pings and forwards decoded [`BoardEvent`]s and
//! [`ConnectionStatus`] changes over a channel. When the connection drops
//! it reconnects with exponential backoff and re-joins the last board.
//!
//! Requests go through the API client's `reqwest::Client`, so the session
//! cookie from login authenticates the socket too.

use crate::client::api::ApiClient;
use crate::client::config::Config;
use crate::client::error::ClientError;
use crate::client::realtime::packet::{decode_payload, encode_payload, EnginePacket, Handshake, SocketPacket};
use crate::shared::error::SharedError;
use crate::shared::event::BoardEvent;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Event the client emits to subscribe to a board's room
pub const JOIN_BOARD_EVENT: &str = "board.join";

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Connection status reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Retrying,
    Error(String),
    Disconnected,
}

/// Output of the transport task
#[derive(Debug, Clone, PartialEq)]
pub enum SocketUpdate {
    Event(BoardEvent),
    Status(ConnectionStatus),
}

#[derive(Debug)]
enum SocketCommand {
    JoinBoard(i64),
    Close,
}

/// Sends commands to a running transport task
#[derive(Debug, Clone)]
pub struct SocketControl {
    commands: UnboundedSender<SocketCommand>,
}

impl SocketControl {
    /// Join a board room. The board is re-joined after every reconnect.
    pub fn join_board(&self, board_id: i64) -> bool {
        self.commands.send(SocketCommand::JoinBoard(board_id)).is_ok()
    }

    /// Disconnect and stop the transport task
    pub fn close(&self) {
        let _ = self.commands.send(SocketCommand::Close);
    }
}

/// A running push-channel connection
#[derive(Debug)]
pub struct SocketHandle {
    updates: UnboundedReceiver<SocketUpdate>,
    control: SocketControl,
    task: JoinHandle<()>,
}

impl SocketHandle {
    /// Start the transport task for the API client's server
    pub fn connect(api: &ApiClient) -> Self {
        Self::spawn(api.config().clone(), api.http().clone())
    }

    pub fn spawn(config: Config, client: Client) -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_transport(config, client, command_rx, update_tx));
        Self {
            updates: update_rx,
            control: SocketControl {
                commands: command_tx,
            },
            task,
        }
    }

    pub fn control(&self) -> SocketControl {
        self.control.clone()
    }

    pub fn join_board(&self, board_id: i64) -> bool {
        self.control.join_board(board_id)
    }

    /// Next event or status change; `None` once the task has stopped
    pub async fn next(&mut self) -> Option<SocketUpdate> {
        self.updates.recv().await
    }

    /// Close the connection and wait for the task to finish
    pub async fn shutdown(self) {
        self.control.close();
        if let Err(e) = self.task.await {
            tracing::warn!("[Socket.IO] Transport task ended abnormally: {}", e);
        }
    }
}

enum Exit {
    /// Closed by us
    Closed,
    /// Closed by the server; reconnect
    Dropped,
}

async fn run_transport(
    config: Config,
    client: Client,
    mut commands: UnboundedReceiver<SocketCommand>,
    updates: UnboundedSender<SocketUpdate>,
) {
    let max_delay = config.app().max_reconnect_delay;
    let mut reconnect_delay = INITIAL_RECONNECT_DELAY;
    let mut board_id: Option<i64> = None;

    loop {
        let _ = updates.send(SocketUpdate::Status(ConnectionStatus::Connecting));
        tracing::info!("[Socket.IO] Connecting to {}", config.socket_url());

        let outcome = match PollingSession::open(&client, &config).await {
            Ok(session) => {
                reconnect_delay = INITIAL_RECONNECT_DELAY;
                session.run(&mut commands, &updates, &mut board_id).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(Exit::Closed) => {
                tracing::info!("[Socket.IO] Disconnected");
                let _ = updates.send(SocketUpdate::Status(ConnectionStatus::Disconnected));
                return;
            }
            Ok(Exit::Dropped) => {
                tracing::warn!("[Socket.IO] Connection closed by server, will reconnect");
            }
            Err(e) => {
                tracing::warn!("[Socket.IO] Connection failed (will retry): {}", e);
                let _ = updates.send(SocketUpdate::Status(ConnectionStatus::Error(e.to_string())));
            }
        }

        let _ = updates.send(SocketUpdate::Status(ConnectionStatus::Retrying));
        if !backoff(reconnect_delay, &mut commands, &mut board_id).await {
            let _ = updates.send(SocketUpdate::Status(ConnectionStatus::Disconnected));
            return;
        }
        reconnect_delay = std::cmp::min(reconnect_delay * 2, max_delay);
    }
}

/// Sleep before reconnecting while still taking commands. Returns false
/// when the transport should stop.
async fn backoff(
    delay: Duration,
    commands: &mut UnboundedReceiver<SocketCommand>,
    board_id: &mut Option<i64>,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            command = commands.recv() => match command {
                Some(SocketCommand::JoinBoard(id)) => *board_id = Some(id),
                Some(SocketCommand::Close) | None => return false,
            },
        }
    }
}

/// One Engine.IO session on the polling transport
struct PollingSession {
    client: Client,
    url: String,
    namespace: String,
    handshake: Handshake,
}

impl PollingSession {
    async fn open(client: &Client, config: &Config) -> Result<Self, ClientError> {
        let base = format!("{}?EIO=4&transport=polling", config.socket_url());
        let body = fetch(client.get(&base)).await?;

        let handshake = match decode_payload(&body).into_iter().next() {
            Some(Ok(EnginePacket::Open(handshake))) => handshake,
            Some(Err(e)) => return Err(e.into()),
            _ => return Err(SharedError::protocol("handshake did not start with an open packet").into()),
        };
        tracing::debug!(
            "[Socket.IO] Handshake sid={} ping_interval={}ms",
            handshake.sid,
            handshake.ping_interval
        );

        let session = Self {
            client: client.clone(),
            url: format!("{}&sid={}", base, handshake.sid),
            namespace: config.app().socket_namespace.clone(),
            handshake,
        };
        session
            .send(&[EnginePacket::Message(SocketPacket::connect(&session.namespace).encode())])
            .await?;
        Ok(session)
    }

    async fn send(&self, packets: &[EnginePacket]) -> Result<(), ClientError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(encode_payload(packets))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_else(|_| status.to_string()),
            });
        }
        Ok(())
    }

    async fn emit_join(&self, board_id: i64) -> Result<(), ClientError> {
        tracing::info!("[Socket.IO] Joining board {}", board_id);
        let packet = SocketPacket::event(
            &self.namespace,
            JOIN_BOARD_EVENT,
            serde_json::json!({ "board_id": board_id }),
        );
        self.send(&[EnginePacket::Message(packet.encode())]).await
    }

    fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.handshake.ping_interval + self.handshake.ping_timeout)
    }

    async fn run(
        self,
        commands: &mut UnboundedReceiver<SocketCommand>,
        updates: &UnboundedSender<SocketUpdate>,
        board_id: &mut Option<i64>,
    ) -> Result<Exit, ClientError> {
        // Polls run on their own task: dropping a pending poll request
        // makes the server close the session.
        let (body_tx, mut body_rx) = mpsc::unbounded_channel();
        let poller = tokio::spawn(poll_loop(
            self.client.clone(),
            self.url.clone(),
            self.liveness_window(),
            body_tx,
        ));
        let result = self.pump(&mut body_rx, commands, updates, board_id).await;
        poller.abort();

        if let Ok(Exit::Closed) = result {
            let goodbye = [
                EnginePacket::Message(
                    SocketPacket::Disconnect {
                        namespace: self.namespace.clone(),
                    }
                    .encode(),
                ),
                EnginePacket::Close,
            ];
            if let Err(e) = self.send(&goodbye).await {
                tracing::debug!("[Socket.IO] Close notice not delivered: {}", e);
            }
        }
        result
    }

    async fn pump(
        &self,
        bodies: &mut UnboundedReceiver<Result<String, ClientError>>,
        commands: &mut UnboundedReceiver<SocketCommand>,
        updates: &UnboundedSender<SocketUpdate>,
        board_id: &mut Option<i64>,
    ) -> Result<Exit, ClientError> {
        let mut connected = false;
        let deadline = tokio::time::sleep(self.liveness_window());
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    return Err(SharedError::protocol("no ping from server within timeout").into());
                }
                command = commands.recv() => match command {
                    Some(SocketCommand::JoinBoard(id)) => {
                        *board_id = Some(id);
                        if connected {
                            self.emit_join(id).await?;
                        }
                    }
                    Some(SocketCommand::Close) | None => return Ok(Exit::Closed),
                },
                body = bodies.recv() => {
                    let body = match body {
                        Some(body) => body?,
                        None => return Ok(Exit::Dropped),
                    };
                    deadline.as_mut().reset(Instant::now() + self.liveness_window());

                    for packet in decode_payload(&body) {
                        let packet = match packet {
                            Ok(packet) => packet,
                            Err(e) => {
                                tracing::warn!("[Socket.IO] Skipping frame: {}", e);
                                continue;
                            }
                        };
                        match packet {
                            EnginePacket::Ping => self.send(&[EnginePacket::Pong]).await?,
                            EnginePacket::Close => return Ok(Exit::Dropped),
                            EnginePacket::Message(data) => {
                                match self.handle_message(&data, updates)? {
                                    MessageOutcome::Continue => {}
                                    MessageOutcome::NamespaceConnected => {
                                        connected = true;
                                        if let Some(id) = *board_id {
                                            self.emit_join(id).await?;
                                        }
                                    }
                                    MessageOutcome::NamespaceClosed => return Ok(Exit::Dropped),
                                    MessageOutcome::ListenerGone => return Ok(Exit::Closed),
                                }
                            }
                            EnginePacket::Open(_)
                            | EnginePacket::Pong
                            | EnginePacket::Upgrade
                            | EnginePacket::Noop => {}
                        }
                    }
                }
            }
        }
    }

    fn handle_message(
        &self,
        data: &str,
        updates: &UnboundedSender<SocketUpdate>,
    ) -> Result<MessageOutcome, ClientError> {
        let packet = match SocketPacket::decode(data) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!("[Socket.IO] Skipping packet: {}", e);
                return Ok(MessageOutcome::Continue);
            }
        };
        if packet.namespace() != self.namespace {
            return Ok(MessageOutcome::Continue);
        }

        let forwarded = match packet {
            SocketPacket::Connect { .. } => {
                tracing::info!("[Socket.IO] Connected to namespace {}", self.namespace);
                let sent = updates.send(SocketUpdate::Status(ConnectionStatus::Connected));
                if sent.is_err() {
                    return Ok(MessageOutcome::ListenerGone);
                }
                return Ok(MessageOutcome::NamespaceConnected);
            }
            SocketPacket::Disconnect { .. } => return Ok(MessageOutcome::NamespaceClosed),
            SocketPacket::ConnectError { data, .. } => {
                return Err(SharedError::protocol(format!("namespace connect refused: {}", data)).into());
            }
            SocketPacket::Event { name, payload, .. } => match BoardEvent::decode(&name, payload) {
                Ok(event) => {
                    tracing::debug!("[Socket.IO] Received {}", name);
                    updates.send(SocketUpdate::Event(event))
                }
                Err(e) => {
                    tracing::warn!("[Socket.IO] Ignoring event {}: {}", name, e);
                    Ok(())
                }
            },
            SocketPacket::Binary { .. } => {
                tracing::debug!("[Socket.IO] Skipping binary packet");
                Ok(())
            }
            SocketPacket::Ack { .. } => Ok(()),
        };
        match forwarded {
            Ok(()) => Ok(MessageOutcome::Continue),
            Err(_) => Ok(MessageOutcome::ListenerGone),
        }
    }
}

enum MessageOutcome {
    Continue,
    NamespaceConnected,
    NamespaceClosed,
    ListenerGone,
}

/// Long-poll until a request fails or the session side hangs up.
///
/// The server may hold a poll open for up to the ping interval, so each
/// poll carries the session's liveness window as its timeout in place of
/// the REST request timeout set on the client.
async fn poll_loop(
    client: Client,
    url: String,
    hold: Duration,
    bodies: UnboundedSender<Result<String, ClientError>>,
) {
    loop {
        let result = fetch(client.get(&url).timeout(hold)).await;
        let failed = result.is_err();
        if bodies.send(result).is_err() || failed {
            return;
        }
    }
}

async fn fetch(request: RequestBuilder) -> Result<String, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_else(|_| status.to_string()),
        });
    }
    Ok(response.text().await?)
}
