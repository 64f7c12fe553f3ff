//! Game connection over tokio-tungstenite.

use aimmo_domain::ConnectionParameters;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use super::protocol::parse_game_event;
use crate::ports::outbound::{GameConnectionPort, GameEvent, PortError};

type GameSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens one WebSocket per [`connect`](GameConnectionPort::connect) call and
/// pumps its frames into the returned channel from a background task.
pub struct WebSocketGameConnection {
    buffer: usize,
}

impl WebSocketGameConnection {
    /// `buffer` bounds how many events may wait for the connection epic.
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
        }
    }
}

impl Default for WebSocketGameConnection {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl GameConnectionPort for WebSocketGameConnection {
    async fn connect(
        &self,
        parameters: &ConnectionParameters,
    ) -> Result<mpsc::Receiver<GameEvent>, PortError> {
        let url = parameters.socket_url().map_err(PortError::connection)?;
        // Never log the full URL: it carries the avatar token.
        tracing::info!(game_id = %parameters.game_id, host = ?url.host_str(), "Opening game socket");

        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(PortError::connection)?;

        let (tx, rx) = mpsc::channel(self.buffer);
        tokio::spawn(pump(socket, tx));
        Ok(rx)
    }
}

/// Forward game events until the server closes or the receiver is dropped.
async fn pump(socket: GameSocket, tx: mpsc::Sender<GameEvent>) {
    let (mut write, mut read) = socket.split();

    loop {
        let frame = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!("Event receiver dropped, closing game socket");
                if let Err(e) = write.send(Message::Close(None)).await {
                    tracing::debug!(error = %e, "Close frame not sent");
                }
                break;
            }
            frame = read.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => match parse_game_event(&text) {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse game event");
                }
            },
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(?frame, "Game server closed connection");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::error!(error = %e, "Game socket error");
                break;
            }
            None => break,
        }
    }
}
