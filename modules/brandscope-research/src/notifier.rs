//! Best-effort push of progress events to run observers.
//!
//! Delivery is fire-and-forget: a full channel, a dead webhook, or a gone
//! receiver never raises back into the pipeline. The notifier logs and
//! moves on.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use brandscope_common::ProgressEvent;

#[async_trait]
pub trait ProgressNotifier: Send + Sync {
    async fn notify(&self, run_id: &str, event: ProgressEvent);
}

// --- NullNotifier ---

/// Discards everything. Default for headless runs.
pub struct NullNotifier;

#[async_trait]
impl ProgressNotifier for NullNotifier {
    async fn notify(&self, _run_id: &str, _event: ProgressEvent) {}
}

// --- ChannelNotifier ---

/// One status update addressed to a run's observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunUpdate {
    pub run_id: String,
    #[serde(flatten)]
    pub event: ProgressEvent,
}

/// In-process fan-out over an unbounded channel. Embedders subscribe by
/// holding the receiver; a dropped receiver silently ends delivery.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<RunUpdate>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ProgressNotifier for ChannelNotifier {
    async fn notify(&self, run_id: &str, event: ProgressEvent) {
        let update = RunUpdate {
            run_id: run_id.to_string(),
            event,
        };
        if self.tx.send(update).is_err() {
            debug!(run_id, "Observer channel closed, dropping event");
        }
    }
}

// --- WebhookNotifier ---

/// POSTs each event as JSON to a remote observer endpoint. Delivery runs
/// detached so the pipeline never waits on the observer.
pub struct WebhookNotifier {
    url: Arc<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, client: reqwest::Client) -> Self {
        Self {
            url: Arc::new(url),
            client,
        }
    }
}

#[async_trait]
impl ProgressNotifier for WebhookNotifier {
    async fn notify(&self, run_id: &str, event: ProgressEvent) {
        let update = RunUpdate {
            run_id: run_id.to_string(),
            event,
        };
        let url = Arc::clone(&self.url);
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(url.as_str()).json(&update).send().await {
                debug!(url = url.as_str(), error = %e, "Observer webhook delivery failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier
            .notify("run-1", ProgressEvent::processing("a", "Discovery"))
            .await;
        notifier
            .notify("run-1", ProgressEvent::processing("b", "Collecting"))
            .await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.run_id, "run-1");
        match (first.event, second.event) {
            (
                ProgressEvent::Processing { message: a, .. },
                ProgressEvent::Processing { message: b, .. },
            ) => {
                assert_eq!(a, "a");
                assert_eq!(b, "b");
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_error() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        // Must not panic or return an error to the caller.
        notifier
            .notify("run-1", ProgressEvent::Error { message: "x".into() })
            .await;
    }

    #[test]
    fn run_update_flattens_event() {
        let update = RunUpdate {
            run_id: "run-1".into(),
            event: ProgressEvent::processing("working", "Editor"),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["run_id"], "run-1");
        assert_eq!(json["status"], "processing");
        assert_eq!(json["step"], "Editor");
    }
}
