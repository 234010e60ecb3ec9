/// Workflow controller
///
/// Sequences upload → submit → poll → render → download in response to
/// the two user actions (file selection, generate) plus reset and
/// download. The controller exclusively owns the workflow state: the
/// current asset, the rendered result, the view surfaces and the
/// cancellation token for in-flight polling.
use crate::cancel::CancelToken;
use crate::config::StudioConfig;
use crate::download::{DownloadClient, DownloadedMedia};
use crate::error::{PipelineError, Result};
use crate::generate::{GenerationClient, NullSink, ProgressSink};
use crate::job::{JobDescriptor, StatusResponse};
use crate::result::{extract_result_media, ResultMedia};
use crate::upload::{UploadClient, UploadSource, UploadedAsset};
use crate::view::ViewState;
use async_trait::async_trait;
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, source: &UploadSource) -> Result<UploadedAsset>;
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn submit(&self, image_url: &str) -> Result<JobDescriptor>;

    async fn poll(
        &self,
        job_id: &str,
        cancel: &CancelToken,
        sink: &dyn ProgressSink,
    ) -> Result<StatusResponse>;
}

#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<DownloadedMedia>;
}

pub struct WorkflowController {
    uploader: Arc<dyn Uploader>,
    generator: Arc<dyn Generator>,
    downloader: Arc<dyn MediaDownloader>,
    sink: Arc<dyn ProgressSink>,
    view: ViewState,
    asset: Option<UploadedAsset>,
    result: Option<ResultMedia>,
    cancel: CancelToken,
}

impl WorkflowController {
    pub fn new(config: StudioConfig) -> Self {
        Self::with_parts(
            Arc::new(UploadClient::new(config.clone())),
            Arc::new(GenerationClient::new(config.clone())),
            Arc::new(DownloadClient::new(config)),
        )
    }

    pub fn with_parts(
        uploader: Arc<dyn Uploader>,
        generator: Arc<dyn Generator>,
        downloader: Arc<dyn MediaDownloader>,
    ) -> Self {
        Self {
            uploader,
            generator,
            downloader,
            sink: Arc::new(NullSink),
            view: ViewState::new(),
            asset: None,
            result: None,
            cancel: CancelToken::new(),
        }
    }

    /// With a progress receiver for poll updates.
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn asset(&self) -> Option<&UploadedAsset> {
        self.asset.as_ref()
    }

    pub fn result(&self) -> Option<&ResultMedia> {
        self.result.as_ref()
    }

    /// Handle to the current cancellation token; `reset` invalidates
    /// it and installs a fresh one.
    pub fn cancel_handle(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Entry point: a file was selected (input or drag-drop). Uploads
    /// immediately and shows the preview. On failure no partial asset
    /// is retained; an earlier completed asset stays usable.
    pub async fn select_file(&mut self, source: UploadSource) -> Result<()> {
        if self.view.loading {
            warn!("file selection ignored: an operation is already in progress");
            return Ok(());
        }

        self.view.begin("UPLOADING...");
        match self.uploader.upload(&source).await {
            Ok(asset) => {
                self.view.show_preview(&asset.url);
                self.asset = Some(asset);
                self.view.ready();
                Ok(())
            }
            Err(e) => {
                self.view.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Entry point: generate was clicked. Requires an uploaded asset;
    /// without one a blocking prompt is shown and nothing hits the
    /// network. On any failure a previously rendered result stays
    /// untouched.
    pub async fn generate(&mut self) -> Result<()> {
        if self.view.loading {
            warn!("generate ignored: an operation is already in progress");
            return Ok(());
        }

        let Some(asset) = self.asset.clone() else {
            self.view.prompt("Please upload an image first.");
            return Ok(());
        };

        let cancel = self.cancel.clone();
        self.view.begin("SUBMITTING JOB...");

        let outcome = self.run_generate(&asset.url, &cancel).await;

        // A reset may have fired while the job was in flight; its
        // outcome must not touch the post-reset view.
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        match outcome {
            Ok(media) => {
                self.view.show_result(&media);
                self.result = Some(media);
                self.view.complete();
                Ok(())
            }
            Err(e) => {
                self.view.fail(&e.to_string());
                Err(e)
            }
        }
    }

    async fn run_generate(&mut self, image_url: &str, cancel: &CancelToken) -> Result<ResultMedia> {
        let descriptor = self.generator.submit(image_url).await?;
        self.view.set_status("JOB QUEUED...");

        let response = self
            .generator
            .poll(&descriptor.job_id, cancel, self.sink.as_ref())
            .await?;

        let payload = response.result.ok_or(PipelineError::MissingResultUrl)?;
        extract_result_media(&payload)
    }

    /// Entry point: download the rendered result into `dir`.
    pub async fn download(&mut self, dir: &Path) -> Result<PathBuf> {
        let Some(media) = self.result.clone() else {
            return Err(PipelineError::Download(
                "no result media to download".to_string(),
            ));
        };

        match self.downloader.download(&media.url).await {
            Ok(downloaded) => downloaded.save_to(dir),
            Err(e) => {
                // Both strategies failed; surface the manual-save
                // instruction instead of throwing it away.
                self.view.prompt(&e.to_string());
                Err(e)
            }
        }
    }

    /// Clear the cached asset and all result surfaces, restore initial
    /// control states and cancel any in-flight poll.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancelToken::new();
        self.asset = None;
        self.result = None;
        self.view.reset();
    }

    #[cfg(test)]
    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }
}
