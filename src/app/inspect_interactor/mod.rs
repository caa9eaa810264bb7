// Inspect interactor - Probes single videos and extracts preview frames

use std::path::Path;
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::CropFitter;
use crate::ports::*;

/// Interactor for single-video inspection and frame preview
pub struct InspectInteractor {
    decoder: Arc<dyn DecoderPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(
        decoder: Arc<dyn DecoderPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            decoder,
            fs_port,
            log_port,
        }
    }

    /// Probe duration, frame size and frame rate of one video
    pub async fn inspect_file(&self, input: &Path) -> Result<VideoSource, DomainError> {
        self.ensure_exists(input).await?;

        let session = self.decoder.open_video(input).await?;
        let source = session.source().clone();
        self.log_port
            .info(&format!(
                "{}: {}, {}x{}",
                source.base_name(),
                TimeSpec::from_seconds(source.duration),
                source.width,
                source.height
            ))
            .await;

        Ok(source)
    }

    /// Write one still frame at `at`, cropped the same way a batch would crop it
    pub async fn extract_frame(
        &self,
        input: &Path,
        at: TimeSpec,
        crop: Option<CropRegion>,
        output: &Path,
    ) -> Result<(), DomainError> {
        self.ensure_exists(input).await?;

        let mut session = self.decoder.open_video(input).await?;
        let (width, height) = (session.source().width, session.source().height);

        let crop = match crop {
            Some(requested) => {
                let fitted = CropFitter::fit(&requested, width, height)?;
                if fitted.clamped {
                    self.log_port
                        .warn(&format!(
                            "Crop {} exceeds the {}x{} frame, clamped to {}",
                            requested, width, height, fitted.region
                        ))
                        .await;
                }
                Some(fitted.region)
            }
            None => None,
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs_port.create_directory(parent).await?;
        }

        session
            .extract_frame(at.as_seconds(), crop, output)
            .await?;
        self.log_port
            .success(&format!("Frame at {} saved to {}", at, output.display()))
            .await;

        Ok(())
    }

    async fn ensure_exists(&self, input: &Path) -> Result<(), DomainError> {
        if !self.fs_port.file_exists(input).await? {
            return Err(DomainError::PathNotFound {
                path: input.display().to_string(),
            });
        }
        Ok(())
    }
}
