/// Upload client
///
/// Moves a user image into object storage: fetch a signed write URL,
/// PUT the raw bytes, compose the public read URL. First failure
/// aborts the whole operation; there is no retry and no confirmation
/// read.
use crate::config::StudioConfig;
use crate::error::{PipelineError, Result};
use crate::ident;
use crate::workflow::Uploader;
use async_trait::async_trait;
use log::{debug, info};
use std::path::Path;

/// Extension used when a file name carries none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a local file, inferring the content type from its
    /// extension the way a browser populates `File.type`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = content_type_for(extension_of(&file_name)).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// The single active uploaded asset a job may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Public read URL
    pub url: String,
}

pub(crate) fn extension_of(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
        _ => DEFAULT_EXTENSION,
    }
}

fn content_type_for(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

pub struct UploadClient {
    config: StudioConfig,
    client: reqwest::Client,
}

impl UploadClient {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Upload `source` and return the public read URL of the stored
    /// object.
    pub async fn upload(&self, source: &UploadSource) -> Result<UploadedAsset> {
        let ext = extension_of(&source.file_name);
        let file_name = format!("{}.{}", ident::nano_id(ident::DEFAULT_LENGTH), ext);

        let signed_url = self.fetch_signed_url(&file_name).await?;
        debug!("got signed URL for {}", file_name);

        let response = self
            .client
            .put(&signed_url)
            .header(reqwest::header::CONTENT_TYPE, &source.content_type)
            .body(source.bytes.clone())
            .send()
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Upload(response.status().to_string()));
        }

        let url = self.config.public_url(&file_name);
        info!("uploaded {} as {}", source.file_name, url);
        Ok(UploadedAsset { url })
    }

    /// Pre-signed write URL for `file_name`, returned as a plain text
    /// body.
    async fn fetch_signed_url(&self, file_name: &str) -> Result<String> {
        let response = self
            .client
            .get(self.config.signed_url_endpoint())
            .query(&[("fileName", file_name)])
            .send()
            .await
            .map_err(|e| PipelineError::SignedUrl(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::SignedUrl(response.status().to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::SignedUrl(e.to_string()))
    }
}

#[async_trait]
impl Uploader for UploadClient {
    async fn upload(&self, source: &UploadSource) -> Result<UploadedAsset> {
        UploadClient::upload(self, source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_derivation() {
        assert_eq!(extension_of("photo.png"), "png");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("photo"), DEFAULT_EXTENSION);
        assert_eq!(extension_of(".hidden"), DEFAULT_EXTENSION);
        assert_eq!(extension_of("trailing."), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_content_type_inference() {
        assert_eq!(content_type_for("png"), "image/png");
        assert_eq!(content_type_for("JPG"), "image/jpeg");
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
        assert_eq!(content_type_for("webm"), "video/webm");
        assert_eq!(content_type_for("bin"), "application/octet-stream");
    }

    #[test]
    fn test_source_construction() {
        let source = UploadSource::new("photo.png", "image/png", vec![1, 2, 3]);
        assert_eq!(source.file_name, "photo.png");
        assert_eq!(source.bytes.len(), 3);
    }
}
