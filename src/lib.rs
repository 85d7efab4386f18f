//! # Text Acquire
//!
//! Gathers raw text for NLP exercises from three independent sources:
//!
//! - a paginated blog, walked listing page by listing page ([`scrapers::blog`])
//! - a news site, one page per category ([`scrapers::news`])
//! - a labeled spam table in SQL, cached in a local CSV file ([`dataset`])
//!
//! All network and database calls are awaited one at a time; any failure is
//! returned to the caller unretried.

pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod utils;

pub use error::{AcquireError, Result};
