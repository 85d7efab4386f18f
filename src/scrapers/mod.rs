//! Text sources scraped over HTTP.
//!
//! | Source | Module | Traversal |
//! |--------|--------|-----------|
//! | Blog listing | [`blog`] | Follow "older entries" links until none remain; one extra fetch per article |
//! | News categories | [`news`] | One fetch per requested category |
//!
//! Both scrapers are strictly sequential: each fetch is awaited before the
//! next one starts, and the first failure ends the scrape.

pub mod blog;
pub mod news;
