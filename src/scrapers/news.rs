//! Category news scraper.
//!
//! Fetches one page per category and pulls every block marked up as a
//! schema.org `NewsArticle`. Headline and body are read from their
//! `itemprop` fields; either may be missing without failing the scrape.
//!
//! # URL Pattern
//!
//! Category pages come from a template such as
//! `https://inshorts.com/en/read/{category}`, with the category
//! percent-encoded into the `{category}` slot.

use crate::error::{AcquireError, Result};
use crate::fetch::{Document, Node, PageFetcher};
use crate::models::NewsItem;
use reqwest::header::HeaderMap;
use tracing::{info, instrument};
use url::Url;

pub const NEWS_ARTICLE_TYPE: &str = "http://schema.org/NewsArticle";
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

const HEADLINE_PROP: &str = "headline";
const BODY_PROP: &str = "articleBody";

/// Build the page URL for `category` from `template`.
///
/// # Errors
///
/// [`AcquireError::Config`] if the template has no `{category}` slot, or
/// [`AcquireError::Url`] if the result doesn't parse.
pub fn category_url(template: &str, category: &str) -> Result<Url> {
    if !template.contains(CATEGORY_PLACEHOLDER) {
        return Err(AcquireError::Config(format!(
            "news URL template {template:?} lacks {CATEGORY_PLACEHOLDER}"
        )));
    }
    let encoded = urlencoding::encode(category);
    Ok(Url::parse(&template.replace(CATEGORY_PLACEHOLDER, &encoded))?)
}

fn itemprop_text(block: &Node<'_>, prop: &str) -> Result<Option<String>> {
    Ok(block
        .find_by_attr("itemprop", prop)?
        .first()
        .map(|n| n.text()))
}

/// Every news block on a category page, tagged with `category`.
pub fn parse_category_page(doc: &Document, category: &str) -> Result<Vec<NewsItem>> {
    doc.find_by_attr("itemtype", NEWS_ARTICLE_TYPE)?
        .iter()
        .map(|block| -> Result<NewsItem> {
            Ok(NewsItem {
                title: itemprop_text(block, HEADLINE_PROP)?,
                content: itemprop_text(block, BODY_PROP)?,
                category: category.to_string(),
            })
        })
        .collect()
}

/// Scrape a single category page.
#[instrument(level = "info", skip(fetcher, headers), fields(%url, %category))]
pub async fn fetch_category(
    fetcher: &PageFetcher,
    url: &Url,
    category: &str,
    headers: &HeaderMap,
) -> Result<Vec<NewsItem>> {
    info!("Scraping articles from category");
    let doc = fetcher.fetch(url, headers).await?;
    let items = parse_category_page(&doc, category)?;
    info!(count = items.len(), "Completed category");
    Ok(items)
}

/// Scrape every category in order and concatenate the results.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP client
/// * `template` - Category page URL containing `{category}`
/// * `categories` - Category names, scraped in this order
/// * `headers` - Usually [`news_headers`](crate::fetch::news_headers)
///
/// # Returns
///
/// Every news block found, grouped by category in input order. Each entry of
/// `categories` costs exactly one fetch; repeated categories are fetched
/// again and yield duplicate records.
#[instrument(level = "info", skip(fetcher, headers, categories), fields(categories = categories.len()))]
pub async fn collect(
    fetcher: &PageFetcher,
    template: &str,
    categories: &[String],
    headers: &HeaderMap,
) -> Result<Vec<NewsItem>> {
    let mut items = Vec::new();
    for category in categories {
        let url = category_url(template, category)?;
        items.extend(fetch_category(fetcher, &url, category, headers).await?);
    }
    info!(count = items.len(), "News scrape complete");
    Ok(items)
}
