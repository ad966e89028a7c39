use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use scraper::Html;
use snapshot_logging::{snap_debug, snap_info, snap_warn};
use url::Url;

use crate::config::SnapshotConfig;
use crate::decode::decode_for_parsing;
use crate::links::discover_links;
use crate::lint::lint_document;
use crate::{CrawlError, FailureKind, PageResult};

/// Input handed to a crawler for one run.
#[derive(Debug, Clone, Copy)]
pub struct CrawlRequest<'a> {
    pub paths: &'a [String],
    pub root: &'a str,
    pub config: &'a SnapshotConfig,
}

/// Visits the seed paths, follows whatever links it discovers under the root,
/// and returns one result per page. URLs in the result must be unique.
#[async_trait::async_trait]
pub trait Crawler: Send + Sync {
    async fn crawl(&self, request: CrawlRequest<'_>) -> Result<Vec<PageResult>, CrawlError>;
}

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub max_pages: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            max_pages: 1_000,
        }
    }
}

/// Crawler that fetches served markup as-is, without executing scripts.
#[derive(Debug, Clone, Default)]
pub struct HttpCrawler {
    settings: CrawlSettings,
}

struct FetchedPage {
    body: Bytes,
    content_type: Option<String>,
}

impl HttpCrawler {
    pub fn new(settings: CrawlSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, root: &str) -> Result<reqwest::Client, CrawlError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CrawlError::new(root, FailureKind::Network, err.to_string()))
    }

    async fn fetch(&self, client: &reqwest::Client, url: &str) -> Result<FetchedPage, CrawlError> {
        let parsed = Url::parse(url)
            .map_err(|err| CrawlError::new(url, FailureKind::InvalidUrl, err.to_string()))?;
        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(|err| map_reqwest_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::new(
                url,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(url, max_bytes, content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| map_reqwest_error(url, err))?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(url, max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedPage {
            body: body.freeze(),
            content_type,
        })
    }
}

#[async_trait::async_trait]
impl Crawler for HttpCrawler {
    async fn crawl(&self, request: CrawlRequest<'_>) -> Result<Vec<PageResult>, CrawlError> {
        let root_url = Url::parse(request.root)
            .map_err(|err| CrawlError::new(request.root, FailureKind::InvalidUrl, err.to_string()))?;
        snap_debug!(
            "Crawling {} seed(s) under {} (inlineCSS={}, addCSPHashes={}, cspAlgo={})",
            request.paths.len(),
            request.root,
            request.config.inline_css,
            request.config.add_csp_hashes,
            request.config.csp_algo
        );
        let client = self.build_client(request.root)?;

        let mut seen: HashSet<String> = request.paths.iter().cloned().collect();
        let mut queue: VecDeque<(String, bool)> =
            request.paths.iter().map(|p| (p.clone(), true)).collect();
        let mut pages = Vec::new();

        while let Some((url, is_seed)) = queue.pop_front() {
            if pages.len() >= self.settings.max_pages {
                snap_warn!(
                    "Page limit of {} reached; {} queued route(s) not crawled",
                    self.settings.max_pages,
                    queue.len() + 1
                );
                break;
            }

            let fetched = match self.fetch(&client, &url).await {
                Ok(fetched) => fetched,
                Err(err) if is_seed => return Err(err),
                Err(err) => {
                    snap_warn!("Skipping discovered page {}: {}", url, err);
                    continue;
                }
            };

            let (links, lint_warnings) = analyze(&fetched, &url, &root_url);
            for link in links {
                if seen.insert(link.clone()) {
                    queue.push_back((link, false));
                }
            }

            snap_info!("Crawled {} ({} bytes)", url, fetched.body.len());
            pages.push(PageResult::new(url, fetched.body).with_lint_warnings(lint_warnings));
        }

        Ok(pages)
    }
}

/// Parses once for both link discovery and linting. Kept synchronous so the
/// parsed document never lives across an await point.
fn analyze(fetched: &FetchedPage, url: &str, root: &Url) -> (Vec<String>, Vec<String>) {
    let html = decode_for_parsing(&fetched.body, fetched.content_type.as_deref());
    let document = Html::parse_document(&html);
    let links = match Url::parse(url) {
        Ok(page_url) => discover_links(&document, &page_url, root),
        Err(_) => Vec::new(),
    };
    (links, lint_document(&document))
}

fn too_large(url: &str, max_bytes: u64, actual: u64) -> CrawlError {
    CrawlError::new(
        url,
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> CrawlError {
    if err.is_timeout() {
        return CrawlError::new(url, FailureKind::Timeout, err.to_string());
    }
    CrawlError::new(url, FailureKind::Network, err.to_string())
}
