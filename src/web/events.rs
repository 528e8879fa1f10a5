//! Server-Sent Events for roster updates

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast::error::RecvError, mpsc};

use agentdesk_core::api::CoreEvent;

use super::api::ApiState;

type EventSender = mpsc::Sender<Result<Event, Infallible>>;

/// Build an `agents` event from the current roster.
///
/// Returns `None` when the roster cannot be loaded or encoded; the event is
/// skipped rather than replaced with a placeholder.
fn agents_event(state: &ApiState) -> Option<Event> {
    let agents = match state.core.list_agents() {
        Ok(agents) => agents,
        Err(e) => {
            tracing::warn!("SSE: failed to load agents: {}", e);
            return None;
        }
    };
    match serde_json::to_string(&agents) {
        Ok(json) => Some(Event::default().event("agents").data(json)),
        Err(e) => {
            tracing::warn!("SSE: failed to encode agents: {}", e);
            None
        }
    }
}

/// Send the current agent list as an `agents` event.
///
/// Returns `false` once the client has gone away.
async fn send_agents(state: &ApiState, tx: &EventSender) -> bool {
    match agents_event(state) {
        Some(event) => tx.send(Ok(event)).await.is_ok(),
        None => !tx.is_closed(),
    }
}

/// SSE stream of roster changes
///
/// Sends the agent list once on connect and again after every change.
/// Distributions additionally produce a `distribution` event with the
/// record and agent counts.
pub async fn events(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(16);
    let mut updates = state.core.subscribe();

    tokio::spawn(async move {
        if !send_agents(&state, &tx).await {
            return;
        }

        loop {
            let received = tokio::select! {
                _ = tx.closed() => return,
                received = updates.recv() => received,
            };
            let keep_going = match received {
                Ok(CoreEvent::AgentsUpdated) => send_agents(&state, &tx).await,
                Ok(CoreEvent::TasksDistributed { total, agent_count }) => {
                    let data = serde_json::json!({ "total": total, "agents": agent_count });
                    let event = Event::default().event("distribution").data(data.to_string());
                    tx.send(Ok(event)).await.is_ok()
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("SSE: lagged by {} events, resending roster", skipped);
                    send_agents(&state, &tx).await
                }
                Err(RecvError::Closed) => false,
            };
            if !keep_going {
                return;
            }
        }
    });

    let stream = tokio_stream::wrappers::ReceiverStream::new(rx);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
