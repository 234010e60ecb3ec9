/// Result payload inspection.
///
/// A completed job's `result` field is either a single object or a
/// sequence of them; the media URL hides behind one of several field
/// names. Kind is inferred from the URL's path suffix.
use crate::error::{PipelineError, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Final media produced by a completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMedia {
    pub url: String,
    pub kind: MediaKind,
}

/// Field names that may carry the media URL, in priority order.
const URL_FIELDS: [&str; 3] = ["mediaUrl", "video", "image"];

const VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "webm"];

/// Pull the media URL out of a completed job's result payload.
pub fn extract_result_media(payload: &Value) -> Result<ResultMedia> {
    let item = match payload {
        Value::Array(items) => items.first().ok_or(PipelineError::MissingResultUrl)?,
        other => other,
    };

    let url = URL_FIELDS
        .iter()
        .find_map(|field| item.get(field).and_then(Value::as_str))
        .ok_or(PipelineError::MissingResultUrl)?;

    Ok(ResultMedia {
        url: url.to_string(),
        kind: classify(url),
    })
}

/// Video iff the path suffix (query string ignored) is a known video
/// extension; everything else renders as an image.
fn classify(url: &str) -> MediaKind {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Image,
    }
}

/// Append a timestamp query parameter to defeat caching.
pub fn cache_busted(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, sep, chrono::Utc::now().timestamp_millis())
}
