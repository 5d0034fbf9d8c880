use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{Result, SolverError};
use crate::rpc::types::EventEnvelope;

const PING_INTERVAL: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Handle returned by `subscribe_events`; dropping it does not stop the
/// background task, `close()` must be called explicitly.
pub struct Unsubscribe {
    stopped: Arc<AtomicBool>,
}

impl Unsubscribe {
    pub fn close(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Maintains a persistent websocket subscription to a single Move event
/// type, reconnecting with a fixed backoff on any drop, and forwarding
/// parsed events to the returned channel.
pub struct EventSubscriber {
    ws_url: String,
}

impl EventSubscriber {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }

    /// Spawn the background connection loop and return a receiver of
    /// `EventEnvelope`s plus a handle to stop it.
    pub fn subscribe_events(&self, move_event_type: &str) -> (mpsc::UnboundedReceiver<EventEnvelope>, Unsubscribe) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let ws_url = self.ws_url.clone();
        let event_type = move_event_type.to_string();
        let stopped_task = stopped.clone();

        tokio::spawn(async move {
            while !stopped_task.load(Ordering::SeqCst) {
                if let Err(e) = run_connection(&ws_url, &event_type, &tx, &stopped_task).await {
                    warn!("event subscription dropped: {e}. Retrying in {}s", RECONNECT_DELAY.as_secs());
                }
                if stopped_task.load(Ordering::SeqCst) {
                    break;
                }
                sleep(RECONNECT_DELAY).await;
            }
            debug!("event subscription loop stopped");
        });

        (rx, Unsubscribe { stopped })
    }
}

async fn run_connection(
    ws_url: &str,
    move_event_type: &str,
    tx: &mpsc::UnboundedSender<EventEnvelope>,
    stopped: &Arc<AtomicBool>,
) -> Result<()> {
    let url = Url::parse(ws_url).map_err(|e| SolverError::Fatal(format!("invalid ws url: {e}")))?;

    info!("connecting event subscription to {}", url);
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| SolverError::Transient(format!("ws connect failed: {e}")))?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe_msg = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "suix_subscribeEvent",
        "params": [{ "MoveEventType": move_event_type }],
    });
    write
        .send(Message::Text(subscribe_msg.to_string()))
        .await
        .map_err(SolverError::WebSocket)?;
    info!("subscribed to {}", move_event_type);

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);

    loop {
        if stopped.load(Ordering::SeqCst) {
            return Ok(());
        }
        tokio::select! {
            _ = ping_interval.tick() => {
                if let Err(e) = write.send(Message::Ping(Vec::new())).await {
                    warn!("ping failed: {e}");
                    return Ok(());
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(envelope) = parse_notification(&text) {
                            if tx.send(envelope).is_err() {
                                debug!("event receiver dropped, stopping subscription");
                                return Ok(());
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("event subscription socket closed");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("event subscription stream error: {e}");
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn parse_notification(text: &str) -> Option<EventEnvelope> {
    if !text.contains("subscribeEvent") && !text.contains("\"params\"") {
        return None;
    }
    let json: Value = serde_json::from_str(text).ok()?;
    let result = json.get("params")?.get("result")?;

    let type_ = result.get("type").and_then(Value::as_str)?.to_string();
    let parsed_json = result.get("parsedJson").cloned().unwrap_or(Value::Null);
    let timestamp_ms = result
        .get("timestampMs")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Some(EventEnvelope {
        type_,
        parsed_json,
        timestamp_ms,
    })
}
