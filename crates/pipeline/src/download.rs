/// Download client
///
/// Ordered fetch strategies, each tried at most once per download:
/// the server-side proxy first (sidesteps cross-origin restrictions on
/// the content host), then a direct cache-busted fetch. When every
/// strategy fails the errors are aggregated into one failure telling
/// the user to save the media manually.
use crate::config::StudioConfig;
use crate::error::{PipelineError, Result};
use crate::ident;
use crate::result::cache_busted;
use crate::workflow::MediaDownloader;
use async_trait::async_trait;
use log::warn;
use std::path::{Path, PathBuf};

/// One way of fetching the final media.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, url: &str) -> Result<FetchedMedia>;
}

/// Raw fetch outcome before a filename is assigned.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Media ready to be written locally.
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl DownloadedMedia {
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Fetch through the service's download proxy.
pub struct ProxyFetch {
    config: StudioConfig,
    client: reqwest::Client,
}

impl ProxyFetch {
    pub fn new(config: StudioConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FetchStrategy for ProxyFetch {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        let response = self
            .client
            .get(self.config.proxy_endpoint())
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Download(response.status().to_string()));
        }

        read_media(response).await
    }
}

/// Direct cross-origin fetch with a cache-busting parameter.
pub struct DirectFetch {
    client: reqwest::Client,
}

impl DirectFetch {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DirectFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
        let response = self
            .client
            .get(cache_busted(url))
            .send()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Download(response.status().to_string()));
        }

        read_media(response).await
    }
}

async fn read_media(response: reqwest::Response) -> Result<FetchedMedia> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::Download(e.to_string()))?;

    Ok(FetchedMedia {
        bytes: bytes.to_vec(),
        content_type,
    })
}

pub struct DownloadClient {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl DownloadClient {
    pub fn new(config: StudioConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(ProxyFetch::new(config)),
            Box::new(DirectFetch::new()),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Try each strategy in order; the first success wins and gets a
    /// generated short filename.
    pub async fn download(&self, url: &str) -> Result<DownloadedMedia> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.fetch(url).await {
                Ok(media) => {
                    let ext = infer_extension(url, media.content_type.as_deref());
                    let file_name = format!("mugshot_{}.{}", ident::nano_id(8), ext);
                    return Ok(DownloadedMedia {
                        bytes: media.bytes,
                        file_name,
                    });
                }
                Err(e) => {
                    warn!("{} fetch failed: {}", strategy.name(), e);
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Err(PipelineError::Download(format!(
            "all download strategies failed ({}); please save the media manually from {}",
            failures.join("; "),
            url
        )))
    }
}

/// Extension from the content-type header, falling back to a suffix
/// match against the URL, finally `png`.
pub(crate) fn infer_extension(url: &str, content_type: Option<&str>) -> &'static str {
    if let Some(ct) = content_type {
        let ct = ct.to_ascii_lowercase();
        if ct.contains("jpeg") || ct.contains("jpg") {
            return "jpg";
        }
        if ct.contains("png") {
            return "png";
        }
        if ct.contains("webp") {
            return "webp";
        }
    }

    let lower = url.to_ascii_lowercase();
    const CANDIDATES: [(&str, &str); 6] = [
        (".jpeg", "jpg"),
        (".jpg", "jpg"),
        (".png", "png"),
        (".webp", "webp"),
        (".mp4", "mp4"),
        (".webm", "webm"),
    ];

    CANDIDATES
        .iter()
        .filter_map(|(needle, ext)| lower.find(needle).map(|pos| (pos, *ext)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, ext)| ext)
        .unwrap_or("png")
}

#[async_trait]
impl MediaDownloader for DownloadClient {
    async fn download(&self, url: &str) -> Result<DownloadedMedia> {
        DownloadClient::download(self, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    #[async_trait]
    impl FetchStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _url: &str) -> Result<FetchedMedia> {
            Err(PipelineError::Download("403 Forbidden".to_string()))
        }
    }

    struct Succeeds {
        content_type: Option<&'static str>,
    }

    #[async_trait]
    impl FetchStrategy for Succeeds {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _url: &str) -> Result<FetchedMedia> {
            Ok(FetchedMedia {
                bytes: vec![0xFF, 0xD8],
                content_type: self.content_type.map(|s| s.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_first_strategy_success_short_circuits() {
        let client = DownloadClient::with_strategies(vec![
            Box::new(Succeeds {
                content_type: Some("image/png"),
            }),
            Box::new(AlwaysFails),
        ]);

        let media = client.download("https://cdn.test/a").await.unwrap();
        assert!(media.file_name.starts_with("mugshot_"));
        assert!(media.file_name.ends_with(".png"));
        assert_eq!(media.bytes, vec![0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn test_fallback_strategy_still_produces_download() {
        let client = DownloadClient::with_strategies(vec![
            Box::new(AlwaysFails),
            Box::new(Succeeds {
                content_type: Some("image/jpeg"),
            }),
        ]);

        let media = client.download("https://cdn.test/a").await.unwrap();
        assert!(media.file_name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_all_failures_aggregate_with_manual_save_hint() {
        let client = DownloadClient::with_strategies(vec![
            Box::new(AlwaysFails),
            Box::new(AlwaysFails),
        ]);

        let err = client.download("https://cdn.test/a.png").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("save the media manually"));
        assert!(msg.contains("failing: "));
        assert!(msg.contains("https://cdn.test/a.png"));
    }

    #[tokio::test]
    async fn test_no_content_type_falls_back_to_url_suffix() {
        let client = DownloadClient::with_strategies(vec![Box::new(Succeeds {
            content_type: None,
        })]);

        let media = client
            .download("https://cdn.test/clip.webm?sig=1")
            .await
            .unwrap();
        assert!(media.file_name.ends_with(".webm"));
    }

    #[test]
    fn test_extension_inference() {
        assert_eq!(infer_extension("u", Some("image/jpeg")), "jpg");
        assert_eq!(infer_extension("u", Some("image/png")), "png");
        assert_eq!(infer_extension("u", Some("image/webp")), "webp");
        // Content type wins over the URL suffix.
        assert_eq!(infer_extension("u.webm", Some("image/png")), "png");
        // Earliest suffix occurrence wins, jpeg normalizes to jpg.
        assert_eq!(infer_extension("a.jpeg?next=b.png", None), "jpg");
        assert_eq!(infer_extension("clip.MP4", None), "mp4");
        assert_eq!(infer_extension("opaque", None), "png");
    }

    #[test]
    fn test_save_to_writes_file() {
        let media = DownloadedMedia {
            bytes: vec![1, 2, 3],
            file_name: format!("mugshot_{}.png", crate::ident::nano_id(8)),
        };
        let dir = std::env::temp_dir().join("pipeline-download-test");
        let path = media.save_to(&dir).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        std::fs::remove_file(&path).ok();
    }
}
