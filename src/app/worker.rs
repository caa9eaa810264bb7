// Batch worker - Runs one conversion batch on its own task

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::adapters::ChannelLogAdapter;
use crate::app::ConvertInteractor;
use crate::domain::model::BatchRequest;
use crate::ports::{BatchEvent, DecoderPort, FsPort, LogPort};

/// Starts batches away from the caller's task
pub struct BatchWorker;

impl BatchWorker {
    /// Spawn the batch and return the caller's side of it.
    ///
    /// The event stream carries every log event in production order followed
    /// by exactly one terminal `Finished` or `Failed` event. Must be called
    /// from within a tokio runtime.
    pub fn spawn(
        decoder: Arc<dyn DecoderPort>,
        fs_port: Arc<dyn FsPort>,
        request: BatchRequest,
    ) -> BatchHandle {
        let (sender, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let log_port = Arc::new(ChannelLogAdapter::new(sender.clone()));
        let interactor = ConvertInteractor::new(decoder, fs_port, log_port as Arc<dyn LogPort>);
        let token = cancel.clone();

        let join = tokio::spawn(async move {
            let terminal = match interactor.run(&request, &token).await {
                Ok(summary) => BatchEvent::Finished(summary),
                Err(e) => BatchEvent::Failed(e.to_string()),
            };
            // Interactor (and its sender clone) must go first so the terminal event is last
            drop(interactor);
            if sender.send(terminal).is_err() {
                tracing::debug!("Batch finished after the caller stopped listening");
            }
        });

        BatchHandle {
            events,
            cancel,
            join,
        }
    }
}

/// Caller's view of a running batch
pub struct BatchHandle {
    events: UnboundedReceiver<BatchEvent>,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl BatchHandle {
    /// Token that stops the worker at the next video or segment boundary
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Next event, or `None` once the terminal event has been consumed
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Wait for the worker task to exit
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.join.await
    }
}
