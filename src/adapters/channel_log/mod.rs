// Channel log adapter - Ships batch events from the worker to the caller

use crate::ports::*;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

/// Single-producer side of the batch event stream
#[derive(Debug, Clone)]
pub struct ChannelLogAdapter {
    sender: UnboundedSender<BatchEvent>,
}

impl ChannelLogAdapter {
    pub fn new(sender: UnboundedSender<BatchEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl LogPort for ChannelLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        if self.sender.send(BatchEvent::Log(event.clone())).is_err() {
            // Receiver gone: the caller stopped listening, keep working silently
            tracing::trace!("Dropped batch event: {}", event.message);
        }
    }
}
