/// Client pipeline for the hosted effect-generation service.
///
/// Sequences the whole feature workflow headlessly: upload a source
/// image to object storage through a signed URL, submit a generation
/// job, poll it to a terminal status, classify the result media, and
/// download it through a proxy with a direct-fetch fallback.
pub mod cancel;
pub mod config;
pub mod download;
pub mod error;
pub mod generate;
pub mod ident;
pub mod job;
pub mod result;
pub mod upload;
pub mod view;
pub mod workflow;

pub use cancel::CancelToken;
pub use config::StudioConfig;
pub use download::{DownloadClient, DownloadedMedia, FetchStrategy, FetchedMedia};
pub use error::{PipelineError, Result};
pub use generate::{GenerationClient, NullSink, ProgressSink};
pub use job::{JobDescriptor, JobStatus, StatusResponse};
pub use result::{extract_result_media, MediaKind, ResultMedia};
pub use upload::{UploadClient, UploadSource, UploadedAsset};
pub use view::ViewState;
pub use workflow::{Generator, MediaDownloader, Uploader, WorkflowController};
