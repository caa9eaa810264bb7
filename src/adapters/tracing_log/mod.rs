// Tracing log adapter - Forwards batch events to the tracing subscriber

use crate::ports::*;
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Tracing log adapter
#[derive(Debug, Default, Clone)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        let timestamp = event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        match event.level {
            LogLevel::Error => {
                error!(event_time = %timestamp, "{}", event.message);
            }
            LogLevel::Warning => {
                warn!(event_time = %timestamp, "{}", event.message);
            }
            LogLevel::Info => {
                info!(event_time = %timestamp, "{}", event.message);
            }
            LogLevel::Success => {
                info!(event_time = %timestamp, outcome = "success", "{}", event.message);
            }
        }
    }
}
