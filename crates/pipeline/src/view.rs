/// Page-surface state owned by the workflow.
///
/// The DOM itself is an external collaborator; this value object
/// models only the surfaces the workflow drives (status line, preview,
/// result image/video slots, control enablement) so their invariants
/// can be asserted: exactly one result surface visible at a time, and
/// never a stale READY after a failure.
use crate::result::{cache_busted, MediaKind, ResultMedia};

pub const STATUS_IDLE: &str = "IDLE";
pub const STATUS_READY: &str = "READY";
pub const STATUS_COMPLETE: &str = "COMPLETE";
pub const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Status line shown while the workflow runs
    pub status: String,

    /// Loading overlay visible
    pub loading: bool,

    /// Preview of the uploaded source image
    pub preview_url: Option<String>,

    /// Result surfaces; at most one is visible
    pub result_image_url: Option<String>,
    pub result_video_url: Option<String>,

    /// Blocking user-facing message (errors, prompts, manual-save)
    pub notice: Option<String>,

    pub generate_enabled: bool,
    pub reset_enabled: bool,
    pub download_enabled: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            status: STATUS_IDLE.to_string(),
            loading: false,
            preview_url: None,
            result_image_url: None,
            result_video_url: None,
            notice: None,
            generate_enabled: false,
            reset_enabled: false,
            download_enabled: false,
        }
    }

    /// Enter loading state for a new async step. Controls stay
    /// disabled until the step settles.
    pub fn begin(&mut self, status: &str) {
        self.loading = true;
        self.status = status.to_string();
        self.notice = None;
        self.generate_enabled = false;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    pub fn show_preview(&mut self, url: &str) {
        self.preview_url = Some(url.to_string());
        self.reset_enabled = true;
    }

    /// Upload settled successfully; generation may start.
    pub fn ready(&mut self) {
        self.loading = false;
        self.status = STATUS_READY.to_string();
        self.generate_enabled = true;
    }

    /// Display the result media. Switching kinds hides the other
    /// surface; image URLs get a cache-busting parameter.
    pub fn show_result(&mut self, media: &ResultMedia) {
        match media.kind {
            MediaKind::Image => {
                self.result_image_url = Some(cache_busted(&media.url));
                self.result_video_url = None;
            }
            MediaKind::Video => {
                self.result_video_url = Some(media.url.clone());
                self.result_image_url = None;
            }
        }
        self.download_enabled = true;
    }

    /// Generation settled successfully.
    pub fn complete(&mut self) {
        self.loading = false;
        self.status = STATUS_COMPLETE.to_string();
        self.generate_enabled = true;
    }

    /// A workflow step failed; loading indicators must not survive.
    pub fn fail(&mut self, message: &str) {
        self.loading = false;
        self.status = STATUS_ERROR.to_string();
        self.notice = Some(format!("Error: {}", message));
    }

    /// Blocking prompt without an error state change.
    pub fn prompt(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    /// Back to the initial surfaces and button states.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
