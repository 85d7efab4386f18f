//! Page fetching and the queryable document tree built from it.
//!
//! [`PageFetcher`] performs exactly one GET per call and hands back a
//! [`Document`]. Everything downstream (listing pages, article pages,
//! category pages) goes through it.

use crate::error::{AcquireError, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Browser identity presented to the news site.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.71 Safari/537.36";

/// Referer presented to the news site; it rejects requests that don't look
/// like they came from a search result.
pub const SEARCH_ENGINE_REFERER: &str = "https://www.google.com/";

/// Header set for the blog: just an identifying user agent.
pub fn blog_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(user_agent)
        .map_err(|e| AcquireError::Config(format!("invalid user agent {user_agent:?}: {e}")))?;
    headers.insert(USER_AGENT, value);
    Ok(headers)
}

/// Browser-like header set for the news site.
///
/// Compression is negotiated by reqwest itself, so `Accept-Encoding` is not
/// set here.
pub fn news_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(REFERER, HeaderValue::from_static(SEARCH_ENGINE_REFERER));
    headers
}

/// Thin wrapper around a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the response body along with the final URL
    /// (after redirects).
    ///
    /// # Errors
    ///
    /// [`AcquireError::Fetch`] on transport failure and
    /// [`AcquireError::Status`] for any non-2xx answer. Nothing is retried.
    #[instrument(level = "debug", skip(self, headers), fields(%url))]
    pub async fn fetch_markup(&self, url: &Url, headers: &HeaderMap) -> Result<(Url, String)> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .map_err(|source| AcquireError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success response");
            return Err(AcquireError::Status {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| AcquireError::Fetch {
            url: url.to_string(),
            source,
        })?;
        debug!(bytes = body.len(), "Fetched page");
        Ok((final_url, body))
    }

    /// GET `url` and parse the body into a [`Document`].
    ///
    /// # Arguments
    ///
    /// * `url` - Page to fetch
    /// * `headers` - Sent as-is; nothing is added beyond reqwest's defaults
    ///
    /// # Returns
    ///
    /// The parsed page, anchored at the final URL so relative links resolve
    /// correctly after redirects.
    pub async fn fetch(&self, url: &Url, headers: &HeaderMap) -> Result<Document> {
        let (final_url, body) = self.fetch_markup(url, headers).await?;
        Ok(Document::parse(final_url, &body))
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AcquireError::Parse(format!("invalid selector {css:?}: {e}")))
}

fn attr_selector(name: &str, value: &str) -> Result<Selector> {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    selector(&format!("[{name}=\"{escaped}\"]"))
}

/// Parsed markup plus the URL it was served from.
///
/// Queries take CSS selectors; a bare tag name such as `"h2"` is the common
/// case.
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    pub fn parse(url: Url, markup: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(markup),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All elements matching `css`, in document order.
    pub fn find_all(&self, css: &str) -> Result<Vec<Node<'_>>> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).map(Node).collect())
    }

    pub fn find_first(&self, css: &str) -> Result<Option<Node<'_>>> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).next().map(Node))
    }

    /// All elements whose attribute `name` equals `value` exactly.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Result<Vec<Node<'_>>> {
        let sel = attr_selector(name, value)?;
        Ok(self.html.select(&sel).map(Node).collect())
    }

    /// Resolve a possibly relative `href` against this document's URL.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        Ok(self.url.join(href)?)
    }
}

/// A single element inside a [`Document`]. Lookups search descendants only.
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn find_first(&self, css: &str) -> Result<Option<Node<'a>>> {
        let sel = selector(css)?;
        Ok(self.0.select(&sel).next().map(Node))
    }

    pub fn find_all(&self, css: &str) -> Result<Vec<Node<'a>>> {
        let sel = selector(css)?;
        Ok(self.0.select(&sel).map(Node).collect())
    }

    pub fn find_by_attr(&self, name: &str, value: &str) -> Result<Vec<Node<'a>>> {
        let sel = attr_selector(name, value)?;
        Ok(self.0.select(&sel).map(Node).collect())
    }

    /// Concatenated text of every descendant text node, untouched.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }
}
