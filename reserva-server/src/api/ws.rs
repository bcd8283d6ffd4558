//! Dashboard WebSocket endpoint
//!
//! Clients open the socket, send a join message naming one restaurant
//! room, then receive that room's occupancy events until they
//! disconnect.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::live::OccupancyEvent;
use tokio::sync::broadcast;

use crate::state::AppState;

/// First message a client must send: `{"join_restaurant": 1001}`
#[derive(Deserialize)]
struct JoinCommand {
    join_restaurant: i64,
}

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // No room yet: wait for the join message
    let restaurant_id = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<JoinCommand>(&text) {
                    Ok(cmd) => break cmd.join_restaurant,
                    Err(_) => tracing::debug!("Ignoring message before room join"),
                }
            }
            Some(Ok(Message::Ping(data))) => {
                if sink.send(Message::Pong(data)).await.is_err() {
                    return;
                }
            }
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
            _ => {}
        }
    };

    tracing::info!(restaurant_id, "Dashboard joined room");
    let mut rx = state.hub.subscribe(restaurant_id);

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Fresh subscription; the client re-fetches state
                        tracing::warn!(restaurant_id, missed, "Dashboard subscriber lagged");
                        rx = state.hub.subscribe(restaurant_id);
                        let refresh = OccupancyEvent::OccupancyUpdate { restaurant_id };
                        if send_event(&mut sink, &refresh).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sink.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    let _ = sink.close().await;
    state.hub.prune(restaurant_id);
    tracing::info!(restaurant_id, "Dashboard disconnected");
}

async fn send_event<S>(sink: &mut S, event: &OccupancyEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
