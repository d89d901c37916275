use std::time::Duration;

use reqwest::{Client, Url};
use scraper::{Html, Node};
use thiserror::Error;
use tracing::{debug, info};

use crate::scrape::locator::locate_job_section;

/// Desktop Chrome identity; many job boards reject the default reqwest agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Elements whose text is never visible on the rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid job posting URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Content Fetcher — downloads a job posting and narrows it to the job description.
#[derive(Clone)]
pub struct JobFetcher {
    client: Client,
    timeout: Duration,
}

impl JobFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self { client, timeout })
    }

    /// Fetches `url` and returns at most a 5000-character excerpt of its visible text,
    /// starting at the most likely job description heading.
    pub async fn fetch_job_description(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching job posting: {}", url);

        let html = self.fetch_html(url).await?;
        let text = page_text(&html);
        let excerpt = locate_job_section(&text);

        match excerpt.marker {
            Some(marker) => info!("Located job description at marker '{}'", marker),
            None => info!("No job description marker found; using head of page"),
        }
        debug!(
            "Page text {} chars, excerpt {} chars",
            text.chars().count(),
            excerpt.text.chars().count()
        );

        Ok(excerpt.text.to_string())
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{url}: only http and https are supported"
            )));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| self.request_error(e))
    }

    fn request_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e)
        }
    }
}

/// Visible text of an HTML page, whitespace-normalized to one fragment per line.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    normalize_whitespace(&visible_text(&document))
}

fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the file/group/record
/// separators, NEL, and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}'..='\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Trims every line, breaks lines on runs of two or more spaces, drops blank
/// fragments and rejoins with single newlines.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
