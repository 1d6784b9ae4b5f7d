//! Content fetcher — loads exactly one page and pulls out its readable text.
//! No link following, no pagination.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose text never reaches the reader.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("response is not a document (content-type: {0})")]
    NotHtml(String),

    #[error("document contains no readable text")]
    EmptyDocument,
}

/// Primary textual content of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub url: Url,
    pub title: Option<String>,
    pub text: String,
}

/// Capability to turn a URL into a `RawDocument`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError>;
}

/// `reqwest` + `scraper` implementation of `PageFetcher`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError> {
        info!("Fetching page");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_document_type(content_type) {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
        }

        let final_url = response.url().clone();
        let html = response.text().await?;
        let document = parse_document(final_url, &html)?;

        debug!(
            "Fetched {} characters of text (title: {:?})",
            document.text.len(),
            document.title
        );
        Ok(document)
    }
}

fn is_document_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

/// Extracts the title and the visible body text from an HTML string.
pub fn parse_document(url: Url, html: &str) -> Result<RawDocument, FetchError> {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next());

    let text = match body {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    };

    if text.is_empty() {
        return Err(FetchError::EmptyDocument);
    }

    Ok(RawDocument { url, title, text })
}

/// Joins every text node under `root` that is not inside a skipped element.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    parts.join(" ")
}
