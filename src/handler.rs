//! TCP connection handler
//!
//! Handles one client connection: line framing, forwarding inbound lines to
//! the ChatRelay actor, and writing its events back out. The session's
//! lifetime is exactly the connection's lifetime: the first EOF or I/O
//! failure on either half tears the whole thing down.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

use crate::codec::LineCodec;
use crate::error::AppError;
use crate::message::ServerEvent;
use crate::server::RelayCommand;
use crate::types::SessionId;

/// Buffer size for the per-session event channel
const EVENT_BUFFER_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Frames the stream into protocol lines, registers the session with the
/// relay, and pumps inbound lines until EOF or a framing failure. The
/// relay's events are written out by a separate task so delivery never
/// waits on this session's reads. Teardown always reaches the relay, even
/// when the read loop exits with an error.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<RelayCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (mut sink, mut lines) = Framed::new(stream, LineCodec).split();

    let session_id = SessionId::new();
    info!("session {} connected from {}", session_id, peer_addr);

    // Channel for relay -> client events (this session's sink).
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(EVENT_BUFFER_SIZE);

    // Register with the relay; it will prompt for a name.
    if cmd_tx
        .send(RelayCommand::Connect {
            session_id,
            sender: event_tx,
        })
        .await
        .is_err()
    {
        error!("failed to register session {} - relay closed", session_id);
        return Err(AppError::ChannelSend);
    }

    // Write task: relay events -> outbound lines. Ends when the relay drops
    // this session's sender at teardown, or when a write fails.
    let write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if sink.send(event).await.is_err() {
                debug!("write failed, ending write task for {}", session_id);
                break;
            }
        }
        debug!("write task ended for {}", session_id);

        let _ = sink.close().await;
    });

    // Read loop: inbound lines -> relay commands. EOF is a clean exit;
    // framing and I/O failures are the session's own and surface here.
    let mut read_result: Result<(), AppError> = Ok(());
    while let Some(result) = lines.next().await {
        match result {
            Ok(line) => {
                let cmd = RelayCommand::Inbound { session_id, line };
                if cmd_tx.send(cmd).await.is_err() {
                    debug!("relay closed, ending read loop for {}", session_id);
                    read_result = Err(AppError::ChannelSend);
                    break;
                }
            }
            Err(e) => {
                warn!("read error for {}: {}", session_id, e);
                read_result = Err(e.into());
                break;
            }
        }
    }
    debug!("read loop ended for {}", session_id);

    // Teardown: the relay frees the name, refreshes rosters and drops this
    // session's sender, which lets the write task drain and finish.
    let _ = cmd_tx.send(RelayCommand::Disconnect { session_id }).await;
    let _ = write_task.await;

    info!("session {} disconnected", session_id);

    read_result
}
