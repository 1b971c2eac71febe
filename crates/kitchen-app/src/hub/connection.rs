//! # Hub Connection
//!
//! A single WebSocket connection to the real-time hub, fanned out to any number
//! of subscribers through a `broadcast` channel.
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected --ensure_started--> Connecting --handshake ok--> Connected
//!       ^                              |                            |
//!       |<-------- handshake failed ---+                      connection lost
//!       |                                                           v
//!       +<------- retries exhausted -------------------------- Reconnecting
//! ```
//!
//! A failed first start is returned to the caller and not retried. Once connected,
//! a lost connection is retried after each delay of the [`ReconnectPolicy`] in
//! turn; when they run out the connection settles in `Disconnected` and the next
//! `ensure_started` starts over.
//!
//! Records that arrive in the same frame as the handshake answer are dispatched
//! before anything else read from the socket.

use super::protocol::{self, HubMessage};
use super::{HubError, HubEvent};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const PING_INTERVAL: Duration = Duration::from_secs(15);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(15);
const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Delays before each reconnect attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    delays: Vec<Duration>,
}

impl ReconnectPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

impl Default for ReconnectPolicy {
    /// 0 s, 2 s, 10 s, 30 s, then give up.
    fn default() -> Self {
        Self::new(vec![
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::from_secs(10),
            Duration::from_secs(30),
        ])
    }
}

pub struct HubConnection {
    url: String,
    policy: ReconnectPolicy,
    ping_interval: Duration,
    events: broadcast::Sender<HubEvent>,
    state: Arc<watch::Sender<HubState>>,
    runner: Mutex<Option<JoinHandle<()>>>,
}

impl HubConnection {
    /// Creates a stopped connection. Nothing touches the network until
    /// [`ensure_started`](Self::ensure_started).
    pub fn new(url: &str) -> Result<Self, HubError> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (state, _) = watch::channel(HubState::Disconnected);
        Ok(Self {
            url: protocol::websocket_url(url)?,
            policy: ReconnectPolicy::default(),
            ping_interval: PING_INTERVAL,
            events,
            state: Arc::new(state),
            runner: Mutex::new(None),
        })
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ping_interval(mut self, ping_interval: Duration) -> Self {
        self.ping_interval = ping_interval;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> HubState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<HubState> {
        self.state.subscribe()
    }

    /// A new receiver for every event pushed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    /// Starts the connection if it is disconnected; otherwise does nothing.
    pub async fn ensure_started(&self) -> Result<(), HubError> {
        let mut runner = self.runner.lock().await;
        if self.state() != HubState::Disconnected {
            return Ok(());
        }

        self.state.send_replace(HubState::Connecting);
        info!(url = %self.url, "Connecting to hub");
        let (socket, backlog) = match connect(&self.url).await {
            Ok(connected) => connected,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Hub start failed");
                self.state.send_replace(HubState::Disconnected);
                return Err(e);
            }
        };
        self.state.send_replace(HubState::Connected);
        info!(url = %self.url, "Hub connected");

        let task = run(
            socket,
            backlog,
            self.url.clone(),
            self.policy.clone(),
            self.ping_interval,
            self.events.clone(),
            self.state.clone(),
        );
        if let Some(previous) = runner.replace(tokio::spawn(task)) {
            previous.abort();
        }
        Ok(())
    }

    /// Drops the connection without reconnecting.
    pub async fn stop(&self) {
        if let Some(task) = self.runner.lock().await.take() {
            task.abort();
        }
        self.state.send_replace(HubState::Disconnected);
        info!(url = %self.url, "Hub stopped");
    }
}

/// Opens the socket and completes the handshake. Returns the socket with any
/// records that followed the handshake answer in its frame.
async fn connect(url: &str) -> Result<(Socket, Vec<String>), HubError> {
    let (mut socket, _) = connect_async(url)
        .await
        .map_err(|e| HubError::Connect(e.to_string()))?;
    socket
        .send(Message::Text(protocol::handshake_request()))
        .await
        .map_err(|e| HubError::Connect(e.to_string()))?;

    let answer = timeout(HANDSHAKE_TIMEOUT, async {
        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Text(text)) => return Ok(text),
                Ok(Message::Close(_)) => return Err(HubError::Closed),
                Ok(_) => continue,
                Err(e) => return Err(HubError::Connect(e.to_string())),
            }
        }
        Err(HubError::Closed)
    })
    .await
    .map_err(|_| HubError::Handshake("timed out".into()))??;

    let mut records = protocol::split_records(&answer);
    protocol::check_handshake(records.next().unwrap_or("{}"))?;
    let backlog = records.map(str::to_string).collect();
    Ok((socket, backlog))
}

/// Applies one record. Returns `false` when the hub asked to close.
fn dispatch(record: &str, events: &broadcast::Sender<HubEvent>) -> bool {
    match HubMessage::parse(record) {
        Ok(HubMessage::Invocation { target, arguments }) => {
            match HubEvent::from_invocation(&target, &arguments) {
                Ok(Some(event)) => {
                    debug!(event = event.target(), id = %event.order().id, "Hub event");
                    // No subscribers is not an error
                    let _ = events.send(event);
                }
                Ok(None) => debug!(%target, "Ignoring invocation"),
                Err(e) => warn!(%target, error = %e, "Rejected hub payload"),
            }
        }
        Ok(HubMessage::Ping) | Ok(HubMessage::Other(_)) => {}
        Ok(HubMessage::Close { error }) => {
            info!(?error, "Hub sent close");
            return false;
        }
        Err(e) => warn!(error = %e, "Malformed hub record"),
    }
    true
}

/// Pumps one live socket until it closes or fails.
async fn pump(
    socket: Socket,
    backlog: Vec<String>,
    ping_interval: Duration,
    events: &broadcast::Sender<HubEvent>,
) {
    if !backlog.iter().all(|record| dispatch(record, events)) {
        return;
    }
    let (mut sink, mut source) = socket.split();
    let mut ping = interval_at(Instant::now() + ping_interval, ping_interval);

    loop {
        tokio::select! {
            _ = ping.tick() => {
                let Ok(record) = HubMessage::Ping.encode() else { continue };
                if let Err(e) = sink.send(Message::Text(record)).await {
                    warn!(error = %e, "Ping failed");
                    return;
                }
            }
            frame = source.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Hub closed the connection");
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!(error = %e, "Hub connection lost");
                        return;
                    }
                };
                if !protocol::split_records(&text).all(|record| dispatch(record, events)) {
                    return;
                }
            }
        }
    }
}

async fn run(
    mut socket: Socket,
    mut backlog: Vec<String>,
    url: String,
    policy: ReconnectPolicy,
    ping_interval: Duration,
    events: broadcast::Sender<HubEvent>,
    state: Arc<watch::Sender<HubState>>,
) {
    loop {
        pump(socket, backlog, ping_interval, &events).await;

        state.send_replace(HubState::Reconnecting);
        let mut reconnected = None;
        for (attempt, delay) in policy.delays().iter().enumerate() {
            sleep(*delay).await;
            match connect(&url).await {
                Ok(fresh) => {
                    reconnected = Some(fresh);
                    break;
                }
                Err(e) => warn!(attempt = attempt + 1, error = %e, "Reconnect failed"),
            }
        }

        match reconnected {
            Some((fresh, leftover)) => {
                info!(%url, "Hub reconnected");
                state.send_replace(HubState::Connected);
                socket = fresh;
                backlog = leftover;
            }
            None => {
                warn!(%url, "Giving up on hub");
                state.send_replace(HubState::Disconnected);
                return;
            }
        }
    }
}
