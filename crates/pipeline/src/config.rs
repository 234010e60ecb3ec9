/// Pipeline configuration
///
/// Endpoints, caller identity and polling cadence. All values ship
/// with the service defaults; overrides come from a JSON file or the
/// builder methods.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE: &str = "https://api.chromastudio.ai";
pub const DEFAULT_CONTENT_BASE: &str = "https://contents.maxstudio.ai";
pub const DEFAULT_USER_ID: &str = "DObRu1vyStbUynoQmTcHBlhs55z2";
pub const DEFAULT_EFFECT_ID: &str = "mugshot";
pub const DEFAULT_MODEL: &str = "image-effects";

/// Model identifier that routes jobs to the video endpoint.
pub const VIDEO_MODEL: &str = "video-effects";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_MAX_POLLS: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// API endpoint base URL
    pub api_base: String,

    /// Public content host the uploaded objects are readable from
    pub content_base: String,

    /// Fixed caller identifier
    pub user_id: String,

    /// Effect applied by the generation job
    pub effect_id: String,

    /// Model / tool type; the video variant routes to `video-gen`
    pub model: String,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Maximum status probes before giving up
    pub max_polls: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            content_base: DEFAULT_CONTENT_BASE.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            effect_id: DEFAULT_EFFECT_ID.to_string(),
            model: DEFAULT_MODEL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// With content host base URL
    pub fn with_content_base(mut self, base: impl Into<String>) -> Self {
        self.content_base = base.into();
        self
    }

    /// With caller identifier
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// With effect identifier
    pub fn with_effect_id(mut self, effect_id: impl Into<String>) -> Self {
        self.effect_id = effect_id.into();
        self
    }

    /// With model / tool type
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With polling cadence
    pub fn with_polling(mut self, interval_ms: u64, max_polls: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self.max_polls = max_polls;
        self
    }

    pub fn is_video_model(&self) -> bool {
        self.model == VIDEO_MODEL
    }

    /// Path segment shared by the submit and status endpoints.
    fn gen_segment(&self) -> &'static str {
        if self.is_video_model() {
            "video-gen"
        } else {
            "image-gen"
        }
    }

    pub fn signed_url_endpoint(&self) -> String {
        format!("{}/get-emd-upload-url", self.api_base)
    }

    pub fn submit_endpoint(&self) -> String {
        format!("{}/{}", self.api_base, self.gen_segment())
    }

    pub fn status_endpoint(&self, job_id: &str) -> String {
        format!(
            "{}/{}/{}/{}/status",
            self.api_base,
            self.gen_segment(),
            self.user_id,
            job_id
        )
    }

    pub fn proxy_endpoint(&self) -> String {
        format!("{}/download-proxy", self.api_base)
    }

    /// Deterministic public read URL for an uploaded object. The
    /// upload is never confirmed with a round-trip read.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.content_base.trim_end_matches('/'), file_name)
    }

    /// Save configuration to JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}
