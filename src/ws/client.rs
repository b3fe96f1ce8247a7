//! WebSocket client with optional reconnection

use super::types::{WsConfig, WsError, WsMessage};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Floor for the keepalive interval; tokio rejects a zero period
const MIN_PING_INTERVAL: Duration = Duration::from_millis(100);

/// How a single connection ended without error
#[derive(Debug, PartialEq, Eq)]
enum StreamEnd {
    /// Server sent a close frame
    ServerClosed,
    /// Nobody is listening for messages anymore
    ReceiverDropped,
}

/// Streaming WebSocket client with ping/pong handling
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    /// Create a new WebSocket client with the given configuration
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    /// Create a new client with just a URL using default config
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::new(WsConfig::new(url))
    }

    /// Get the configured URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Connect and return a receiver for messages
    ///
    /// Spawns a background task that owns the socket. The last event on the
    /// channel is always [`WsMessage::Closed`] or [`WsMessage::Failed`] unless
    /// the receiver is dropped first.
    pub fn connect(&self) -> mpsc::Receiver<WsMessage> {
        let (tx, rx) = mpsc::channel(1024);
        let config = self.config.clone();

        tokio::spawn(async move {
            Self::run_connection_loop(config, tx).await;
        });

        rx
    }

    /// Run the connection loop, reconnecting while the config allows it
    async fn run_connection_loop(config: WsConfig, tx: mpsc::Sender<WsMessage>) {
        let mut attempts = 0;
        let mut reconnect_delay = config.initial_reconnect_delay;

        loop {
            let result = match Self::open(&config).await {
                Ok(ws_stream) => {
                    // Each outage gets the full retry budget
                    attempts = 0;
                    reconnect_delay = config.initial_reconnect_delay;
                    Self::stream(ws_stream, &config, &tx).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(StreamEnd::ServerClosed) => {
                    tracing::info!("WebSocket connection closed by server");
                    let _ = tx.send(WsMessage::Closed).await;
                    return;
                }
                Ok(StreamEnd::ReceiverDropped) => {
                    tracing::debug!("Receiver dropped, closing connection");
                    return;
                }
                Err(e) => {
                    attempts += 1;

                    if !config.may_retry(attempts) {
                        tracing::error!(error = %e, attempts, "WebSocket connection failed");
                        let _ = tx.send(WsMessage::Failed(e.to_string())).await;
                        return;
                    }

                    if tx.is_closed() {
                        tracing::info!("Receiver dropped, stopping reconnection");
                        return;
                    }

                    tracing::warn!(
                        error = %e,
                        attempt = attempts,
                        delay_ms = reconnect_delay.as_millis() as u64,
                        "WebSocket connection error, reconnecting..."
                    );
                    let _ = tx.send(WsMessage::Reconnecting { attempt: attempts }).await;

                    sleep(reconnect_delay).await;
                    reconnect_delay = config.next_delay(reconnect_delay);
                }
            }
        }
    }

    /// Perform the WebSocket handshake
    async fn open(config: &WsConfig) -> Result<WsStream, WsError> {
        tracing::info!(url = %config.url, "Connecting to WebSocket");

        let (ws_stream, _response) = connect_async(&config.url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;
        Ok(ws_stream)
    }

    /// Stream messages from an open connection until it ends
    async fn stream(
        ws_stream: WsStream,
        config: &WsConfig,
        tx: &mpsc::Sender<WsMessage>,
    ) -> Result<StreamEnd, WsError> {
        let (mut write, mut read) = ws_stream.split();

        if tx.send(WsMessage::Connected).await.is_err() {
            return Ok(StreamEnd::ReceiverDropped);
        }

        let mut ping_interval =
            tokio::time::interval(config.ping_interval.max(MIN_PING_INTERVAL));
        ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately
        ping_interval.tick().await;
        let mut waiting_for_pong = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(WsMessage::Text(text)).await.is_err() {
                                return Ok(StreamEnd::ReceiverDropped);
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            waiting_for_pong = false;
                        }
                        Some(Ok(Message::Close(_))) => {
                            return Ok(StreamEnd::ServerClosed);
                        }
                        Some(Ok(Message::Binary(data))) => {
                            tracing::trace!(len = data.len(), "Ignoring binary frame");
                        }
                        Some(Ok(Message::Frame(_))) => {}
                        Some(Err(e)) => {
                            return Err(WsError::ConnectionFailed(e.to_string()));
                        }
                        None => {
                            return Err(WsError::ConnectionFailed("Stream ended unexpectedly".into()));
                        }
                    }
                }

                _ = ping_interval.tick() => {
                    if waiting_for_pong {
                        return Err(WsError::PongTimeout);
                    }
                    write.send(Message::Ping(vec![])).await
                        .map_err(|e| WsError::SendFailed(e.to_string()))?;
                    waiting_for_pong = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_ws_client_creation() {
        let client = WsClient::with_url("wss://example.com");
        assert_eq!(client.url(), "wss://example.com");
    }

    #[test]
    fn test_ws_client_with_config() {
        let config = WsConfig::new("wss://test.com")
            .max_reconnects(5)
            .ping_interval(Duration::from_secs(15));

        let client = WsClient::new(config);
        assert_eq!(client.url(), "wss://test.com");
        assert_eq!(client.config.max_reconnect_attempts, 5);
        assert_eq!(client.config.ping_interval, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_connection_failure_is_terminal_without_retries() {
        let client = WsClient::new(WsConfig::new("ws://127.0.0.1:1"));
        let mut rx = client.connect();

        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Test timed out");

        assert!(matches!(msg, Some(WsMessage::Failed(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_retry_budget_resets_after_connecting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept three connections and drop each right after the handshake
        let server = tokio::spawn(async move {
            for _ in 0..3 {
                let (tcp, _) = listener.accept().await.unwrap();
                let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
                drop(ws);
            }
        });

        let client = WsClient::new(
            WsConfig::new(format!("ws://{}", addr))
                .max_reconnects(2)
                .initial_delay(Duration::from_millis(10)),
        );
        let mut rx = client.connect();

        let mut events = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), async {
            while events.len() < 6 {
                match rx.recv().await {
                    Some(msg) => events.push(msg),
                    None => break,
                }
            }
        })
        .await
        .expect("Test timed out");

        assert_eq!(
            events,
            vec![
                WsMessage::Connected,
                WsMessage::Reconnecting { attempt: 1 },
                WsMessage::Connected,
                WsMessage::Reconnecting { attempt: 1 },
                WsMessage::Connected,
                WsMessage::Reconnecting { attempt: 1 },
            ]
        );
        server.await.unwrap();
    }

    #[test]
    fn test_zero_ping_interval_is_floored() {
        let config = WsConfig::new("wss://example.com").ping_interval(Duration::ZERO);
        assert_eq!(config.ping_interval.max(MIN_PING_INTERVAL), MIN_PING_INTERVAL);
    }

    #[tokio::test]
    async fn test_connection_failure_reports_reconnects() {
        let client = WsClient::new(
            WsConfig::new("ws://127.0.0.1:1")
                .max_reconnects(3)
                .initial_delay(Duration::from_millis(10)),
        );
        let mut rx = client.connect();

        let mut attempts = Vec::new();
        let mut failed = false;
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(msg) = rx.recv().await {
                match msg {
                    WsMessage::Reconnecting { attempt } => attempts.push(attempt),
                    WsMessage::Failed(_) => {
                        failed = true;
                        break;
                    }
                    _ => {}
                }
            }
        })
        .await
        .expect("Test timed out");

        assert_eq!(attempts, vec![1, 2]);
        assert!(failed, "Should receive Failed message");
    }
}
