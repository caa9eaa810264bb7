use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{FsLocalAdapter, LibavDecoderAdapter, TracingLogAdapter};
use crate::app::worker::{BatchHandle, BatchWorker};
use crate::app::{ConvertInteractor, InspectInteractor};
use crate::domain::errors::DomainError;
use crate::domain::model::BatchRequest;
use crate::ports::{DecoderPort, FsPort, LogPort};

pub trait AppContainer: Send + Sync {
    /// Driver reporting straight to the console log
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    /// Run a batch on a worker task
    fn spawn_batch(&self, request: BatchRequest) -> BatchHandle;
}

pub struct DefaultAppContainer {
    decoder: Arc<dyn DecoderPort>,
    fs_port: Arc<dyn FsPort>,
    convert_interactor: Arc<ConvertInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    pub fn new(ffmpeg_binary: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let decoder = Arc::new(LibavDecoderAdapter::new(ffmpeg_binary)?);
        let fs_port = Arc::new(FsLocalAdapter::new()?);
        let log_port = Arc::new(TracingLogAdapter::new());

        Ok(Self::with_ports(
            decoder as Arc<dyn DecoderPort>,
            fs_port as Arc<dyn FsPort>,
            log_port as Arc<dyn LogPort>,
        ))
    }

    /// Wire the interactors around caller-supplied ports
    pub fn with_ports(
        decoder: Arc<dyn DecoderPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let convert_interactor = Arc::new(ConvertInteractor::new(
            Arc::clone(&decoder),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&decoder),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        Self {
            decoder,
            fs_port,
            convert_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn spawn_batch(&self, request: BatchRequest) -> BatchHandle {
        BatchWorker::spawn(Arc::clone(&self.decoder), Arc::clone(&self.fs_port), request)
    }
}
