//! Records produced by the scrapers.
//!
//! - [`Article`]: one blog post (title plus full body text)
//! - [`NewsItem`]: one news snippet tagged with the category it was listed under

use serde::{Deserialize, Serialize};

/// A blog article.
///
/// `content` is the text of every paragraph in the article page's content
/// container, joined with single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// A news snippet.
///
/// `title` and `content` are absent when the source block lacks the
/// corresponding structured-data field; absent fields are left out of the
/// serialized form entirely. `category` comes from the caller, not the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub category: String,
}
