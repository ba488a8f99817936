//! Server-Sent Events support

use crate::runtime::SessionSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the current snapshot, then every subsequent state change.
pub fn state_stream(
    init: SessionSnapshot,
    updates: tokio::sync::broadcast::Receiver<SessionSnapshot>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(snapshot_event(&init)) });

    let updates = BroadcastStream::new(updates).filter_map(|result| match result {
        Ok(snapshot) => Some(Ok(snapshot_event(&snapshot))),
        Err(_) => None, // Skip lagged snapshots; the next one supersedes them anyway
    });

    Sse::new(init.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn snapshot_event(snapshot: &SessionSnapshot) -> Event {
    let data = serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());
    Event::default().event("state").data(data)
}
