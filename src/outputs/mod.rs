//! Output writers for scraped records.
//!
//! The spam dataset has no writer here: its CSV cache file is its output.

pub mod json;
