//! WebSocket connection server for the live reaction channel
//!
//! Each viewer connection gets two tasks: the handler task reads inbound
//! frames and feeds them to the `ReactionRouter`, and a spawned writer task
//! drains the connection's bounded outbound queue into the socket. The hub
//! membership is released on the single exit path after the read loop, so a
//! group never retains a connection whose transport is gone.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use livereact_core::models::PresentationId;
use livereact_core::InboundOutcome;

use crate::http::AppState;

/// WebSocket handler for a presentation's live reaction stream
///
/// The presentation id is the final path segment of the connection target and
/// is accepted as-is: whether the presentation exists in storage is not this
/// layer's concern, the group is simply created on first join.
pub async fn websocket_handler(
    State(state): State<AppState>,
    Path(presentation_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let presentation_id = PresentationId::from_string(presentation_id);
    ws.max_message_size(state.websocket.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, presentation_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, presentation_id: PresentationId) {
    let connection_id = nanoid::nanoid!(12);

    info!(
        presentation_id = %presentation_id.as_str(),
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Join before pumping any frames: membership must exist by the time the
    // first inbound reaction can arrive.
    let mut outbound_rx = state
        .hub
        .subscribe(presentation_id.clone(), connection_id.clone());

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Writer task: drain the bounded outbound queue into the socket, FIFO.
    // Exits when the queue closes (unsubscribe) or the transport write fails.
    let writer_connection_id = connection_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if let Err(e) = ws_sink.send(Message::Text(frame.into())).await {
                debug!(
                    connection_id = %writer_connection_id,
                    error = %e,
                    "WebSocket write failed, stopping writer"
                );
                break;
            }
        }
    });

    // Reader loop: route text frames, ignore control/binary frames, stop on
    // close or transport error. Decode failures are per-frame and recoverable.
    while let Some(message) = ws_stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                match state.router.handle_inbound(&presentation_id, text.as_str()) {
                    InboundOutcome::Delivered { recipients } => {
                        debug!(
                            presentation_id = %presentation_id.as_str(),
                            connection_id = %connection_id,
                            recipients = recipients,
                            "Reaction fanned out"
                        );
                    }
                    outcome => {
                        warn!(
                            presentation_id = %presentation_id.as_str(),
                            connection_id = %connection_id,
                            outcome = ?outcome,
                            "Dropped invalid reaction frame"
                        );
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {} // Ignore binary, ping, pong
            Err(e) => {
                debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "WebSocket read failed"
                );
                break;
            }
        }
    }

    // Sole leave path for this connection; closing the queue also ends the
    // writer task. The hub tolerates the broadcast-side cleanup racing us.
    state.hub.unsubscribe(&connection_id);
    let _ = writer.await;

    info!(
        presentation_id = %presentation_id.as_str(),
        connection_id = %connection_id,
        "WebSocket connection closed"
    );
}
