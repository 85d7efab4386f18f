//! Paginated blog scraper.
//!
//! Walks a WordPress-style article listing: every `h2` holding a link is one
//! article summary, the article body lives in `.entry-content` on the
//! article's own page, and older posts are reached through the first link
//! inside `div.alignleft`. The walk stops on the first listing page with no
//! such link.
//!
//! # URL Pattern
//!
//! Both article links and next-page links may be relative; they are resolved
//! against the URL of the page they were found on.

use crate::error::{AcquireError, Result};
use crate::fetch::{Document, PageFetcher};
use crate::models::Article;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use reqwest::header::HeaderMap;
use tracing::{debug, info, instrument};
use url::Url;

const HEADING: &str = "h2";
const LINK: &str = "a[href]";
const ANCHOR: &str = "a";
const ENTRY_CONTENT: &str = ".entry-content";
const PARAGRAPH: &str = "p";
const NEXT_PAGE_NAV: &str = "div.alignleft";

/// One linked heading on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub url: Url,
}

/// What a single listing page yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    pub next_page: Option<Url>,
}

/// Extract linked headings and the next-page link from a listing page.
///
/// Headings without a link are skipped.
pub fn parse_listing(doc: &Document) -> Result<ListingPage> {
    let mut entries = Vec::new();
    for heading in doc.find_all(HEADING)? {
        let Some(link) = heading.find_first(LINK)? else {
            debug!(title = %heading.text(), "Heading has no link; skipping");
            continue;
        };
        // `a[href]` guarantees the attribute.
        let href = link.attr("href").unwrap_or_default();
        entries.push(ListingEntry {
            title: heading.text(),
            url: doc.resolve(href)?,
        });
    }

    Ok(ListingPage {
        entries,
        next_page: next_page_url(doc)?,
    })
}

/// The next listing page, if any.
///
/// Only the first anchor inside the navigation container counts. A missing
/// container, a container without an anchor, and a first anchor without an
/// `href` all mean this is the last page.
pub fn next_page_url(doc: &Document) -> Result<Option<Url>> {
    let Some(nav) = doc.find_first(NEXT_PAGE_NAV)? else {
        return Ok(None);
    };
    match nav.find_first(ANCHOR)?.and_then(|a| a.attr("href")) {
        Some(href) => Ok(Some(doc.resolve(href)?)),
        None => Ok(None),
    }
}

/// Paragraph text of an article page, joined with single spaces.
///
/// # Errors
///
/// [`AcquireError::Parse`] if the page has no `.entry-content` container.
pub fn parse_article_content(doc: &Document) -> Result<String> {
    let container = doc.find_first(ENTRY_CONTENT)?.ok_or_else(|| {
        AcquireError::Parse(format!("no {ENTRY_CONTENT} container on {}", doc.url()))
    })?;
    Ok(container
        .find_all(PARAGRAPH)?
        .iter()
        .map(|p| p.text())
        .join(" "))
}

/// Fetch one article page and extract its body text.
#[instrument(level = "debug", skip(fetcher, headers), fields(%url))]
pub async fn fetch_article_content(
    fetcher: &PageFetcher,
    url: &Url,
    headers: &HeaderMap,
) -> Result<String> {
    let doc = fetcher.fetch(url, headers).await?;
    parse_article_content(&doc)
}

/// Collect every article reachable from `start_url`, page by page.
///
/// Each listing page costs one fetch, plus one fetch per linked heading on
/// it. The walk follows [`next_page_url`] until it returns `None`; there is
/// no depth limit.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP client
/// * `start_url` - First listing page
/// * `headers` - Sent with every listing and article request
///
/// # Returns
///
/// All articles in listing-page order, then heading order within a page.
/// Any fetch or parse failure aborts the whole walk and nothing is returned.
#[instrument(level = "info", skip(fetcher, headers), fields(%start_url))]
pub async fn collect(
    fetcher: &PageFetcher,
    start_url: &Url,
    headers: &HeaderMap,
) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    let mut url = start_url.clone();
    let mut page_number = 1usize;

    loop {
        info!(page = page_number, %url, "Getting page");
        let listing = {
            let doc = fetcher.fetch(&url, headers).await?;
            parse_listing(&doc)?
        };

        for (i, entry) in listing.entries.into_iter().enumerate() {
            info!(page = page_number, article = i + 1, url = %entry.url, "Getting article");
            let content = fetch_article_content(fetcher, &entry.url, headers).await?;
            debug!(preview = %truncate_for_log(&content, 120), "Article content");
            articles.push(Article {
                title: entry.title,
                content,
            });
        }
        info!(page = page_number, total = articles.len(), "Completed page");

        match listing.next_page {
            Some(next) => {
                url = next;
                page_number += 1;
            }
            None => break,
        }
    }

    info!(pages = page_number, count = articles.len(), "Blog scrape complete");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::blog_headers;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn doc(url: &str, markup: &str) -> Document {
        Document::parse(Url::parse(url).unwrap(), markup)
    }

    async fn serve(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    fn article_page(paragraphs: &[&str]) -> String {
        let ps: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        format!(r#"<html><body><div class="entry-content">{ps}</div></body></html>"#)
    }

    #[test]
    fn test_content_joined_with_single_spaces() {
        let d = doc(
            "https://example.com/post",
            r#"<p>outside</p><div class="entry-content"><p>A.</p><p>B.</p><p>C.</p></div>"#,
        );
        assert_eq!(parse_article_content(&d).unwrap(), "A. B. C.");
    }

    #[test]
    fn test_missing_content_container_is_parse_error() {
        let d = doc("https://example.com/post", "<p>A.</p>");
        assert!(matches!(
            parse_article_content(&d),
            Err(AcquireError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_content_container_yields_empty_string() {
        let d = doc("https://example.com/post", r#"<div class="entry-content"></div>"#);
        assert_eq!(parse_article_content(&d).unwrap(), "");
    }

    #[test]
    fn test_listing_skips_headings_without_links() {
        let d = doc(
            "https://example.com/blog/",
            r#"
            <h2><a href="/one">First post</a></h2>
            <h2>Sidebar heading</h2>
            <h2><a href="https://example.com/two">Second <b>post</b></a></h2>
            <h2><a name="anchor">No href</a></h2>
            "#,
        );
        let listing = parse_listing(&d).unwrap();
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.entries[0].title, "First post");
        assert_eq!(listing.entries[0].url.as_str(), "https://example.com/one");
        assert_eq!(listing.entries[1].title, "Second post");
        assert_eq!(listing.next_page, None);
    }

    #[test]
    fn test_next_page_absent_nav_terminates() {
        let d = doc("https://example.com/blog/", "<h2>nothing</h2>");
        assert_eq!(next_page_url(&d).unwrap(), None);
    }

    #[test]
    fn test_next_page_nav_without_link_terminates() {
        let d = doc(
            "https://example.com/blog/",
            r#"<div class="alignleft"></div><div class="alignright"><a href="/newer">Newer</a></div>"#,
        );
        assert_eq!(next_page_url(&d).unwrap(), None);
    }

    #[test]
    fn test_next_page_first_anchor_without_href_terminates() {
        let d = doc(
            "https://example.com/blog/",
            r#"<div class="alignleft"><a name="top">Top</a><a href="/page/2/">Older</a></div>"#,
        );
        assert_eq!(next_page_url(&d).unwrap(), None);
    }

    #[test]
    fn test_next_page_relative_link_resolved() {
        let d = doc(
            "https://example.com/blog/",
            r#"<div class="alignleft"><a href="page/2/">Older Entries</a></div>"#,
        );
        assert_eq!(
            next_page_url(&d).unwrap().unwrap().as_str(),
            "https://example.com/blog/page/2/"
        );
    }

    #[tokio::test]
    async fn test_collect_follows_pagination_chain() {
        let server = MockServer::start().await;
        let pages = 3;

        for page in 1..=pages {
            let mut body = String::new();
            body.push_str(&format!(r#"<h2><a href="/post/{page}/a">Post {page}a</a></h2>"#));
            body.push_str("<h2>Unlinked</h2>");
            body.push_str(&format!(r#"<h2><a href="/post/{page}/b">Post {page}b</a></h2>"#));
            if page < pages {
                body.push_str(&format!(
                    r#"<div class="alignleft"><a href="/page/{}">Older</a></div>"#,
                    page + 1
                ));
            }
            serve(&server, &format!("/page/{page}"), body).await;
            serve(&server, &format!("/post/{page}/a"), article_page(&["x", "y"])).await;
            serve(&server, &format!("/post/{page}/b"), article_page(&["z"])).await;
        }

        let start = Url::parse(&format!("{}/page/1", server.uri())).unwrap();
        let headers = blog_headers("Codeup Data Science").unwrap();
        let articles = collect(&PageFetcher::default(), &start, &headers)
            .await
            .unwrap();

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Post 1a", "Post 1b", "Post 2a", "Post 2b", "Post 3a", "Post 3b"]
        );
        assert_eq!(articles[0].content, "x y");
        assert_eq!(articles[1].content, "z");
    }

    #[tokio::test]
    async fn test_collect_single_page_without_nav() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/blog",
            r#"<h2><a href="/post">Only</a></h2>"#.to_string(),
        )
        .await;
        serve(&server, "/post", article_page(&["A.", "B.", "C."])).await;

        let start = Url::parse(&format!("{}/blog", server.uri())).unwrap();
        let articles = collect(&PageFetcher::default(), &start, &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(
            articles,
            vec![Article {
                title: "Only".to_string(),
                content: "A. B. C.".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_collect_propagates_article_failure() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/blog",
            r#"<h2><a href="/missing">Gone</a></h2>"#.to_string(),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let start = Url::parse(&format!("{}/blog", server.uri())).unwrap();
        let err = collect(&PageFetcher::default(), &start, &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AcquireError::Status { .. }));
    }
}
