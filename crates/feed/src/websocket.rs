//! WebSocket server for real-time fleet telemetry.
//!
//! Provides the push endpoint for dashboard clients to receive:
//! - Robot status changes
//! - Mission lifecycle updates
//! - Simulation start/stop notifications
//!
//! Every frame is JSON with a `type` tag; the first frame on a new
//! connection is an `ack`.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use fleetsim_core::EventBus;

/// WebSocket fan-out server for [`FleetEvent`](fleetsim_core::FleetEvent)s.
pub struct FeedServer {
    events: EventBus,
    addr: SocketAddr,
}

impl FeedServer {
    /// Create a feed server forwarding events from `events`.
    pub fn new(addr: SocketAddr, events: EventBus) -> Self {
        Self { events, addr }
    }

    /// Address the server will bind to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accept connections forever, spawning one task per client.
    pub async fn run(self: Arc<Self>) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("fleet feed listening on {}", self.addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    debug!("new feed connection from {}", peer_addr);
                    let server = Arc::clone(&self);

                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream, peer_addr).await {
                            warn!("feed connection error from {}: {}", peer_addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("failed to accept feed connection: {}", e);
                }
            }
        }
    }

    /// Handle a single client connection.
    async fn handle_connection(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let ws_stream = accept_async(stream).await?;
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        // Subscribe before acking so nothing published after the client
        // observes the ack can be missed. Earlier events are not replayed.
        let mut event_rx = self.events.subscribe();

        let ack = serde_json::json!({
            "type": "ack",
            "message": "Connected to fleetsim event feed",
        });
        ws_sender.send(Message::Text(ack.to_string())).await?;

        loop {
            tokio::select! {
                // Client frames: logged, not interpreted
                Some(msg) = ws_receiver.next() => {
                    match msg {
                        Ok(Message::Text(text)) => {
                            debug!("received from {}: {}", peer_addr, text);
                        }
                        Ok(Message::Close(_)) => {
                            debug!("feed client {} disconnected", peer_addr);
                            break;
                        }
                        Err(e) => {
                            warn!("error receiving from {}: {}", peer_addr, e);
                            break;
                        }
                        _ => {}
                    }
                }

                // Forward fleet events to the client
                event = event_rx.recv() => {
                    match event {
                        Ok(event) => {
                            let json = serde_json::to_string(&event)?;
                            if let Err(e) = ws_sender.send(Message::Text(json)).await {
                                warn!("error sending to {}: {}", peer_addr, e);
                                break;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            // Slow client: keep streaming from the current position
                            warn!(peer = %peer_addr, skipped, "feed client lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsim_core::FleetEvent;
    use futures_util::StreamExt;
    use tokio_tungstenite::connect_async;

    #[tokio::test]
    async fn test_feed_server_creation() {
        let addr: SocketAddr = "127.0.0.1:9100".parse().expect("Failed to parse address");
        let server = FeedServer::new(addr, EventBus::new());

        assert_eq!(server.addr(), addr);
    }

    #[tokio::test]
    async fn test_client_receives_ack_and_events() {
        let events = EventBus::new();
        // Port 0 is not practical with the simple bind-in-run design, so
        // pick an ephemeral-range port unlikely to collide.
        let addr: SocketAddr = "127.0.0.1:39151".parse().unwrap();
        let server = Arc::new(FeedServer::new(addr, events.clone()));
        tokio::spawn(Arc::clone(&server).run());

        // Wait for the listener to come up
        let mut ws = loop {
            match connect_async(format!("ws://{addr}")).await {
                Ok((ws, _)) => break ws,
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(20)).await,
            }
        };

        let ack = ws.next().await.unwrap().unwrap();
        assert!(ack.to_text().unwrap().contains("\"type\":\"ack\""));

        events.publish(FleetEvent::SimulationStarted { timestamp_ms: 7 });
        let frame = ws.next().await.unwrap().unwrap();
        assert!(frame
            .to_text()
            .unwrap()
            .contains("\"type\":\"simulation_started\""));
    }
}
