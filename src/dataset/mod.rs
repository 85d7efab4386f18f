//! Labeled spam dataset, cached locally as CSV.
//!
//! - [`Table`]: the opaque tabular payload and its CSV format
//! - [`TableSource`] / [`SqlTableSource`]: where the data comes from on a miss
//! - [`SpamCache`]: the read-through cache tying the two together

pub mod cache;
pub mod source;
pub mod table;

pub use cache::{SPAM_QUERY, SpamCache};
pub use source::{SqlTableSource, TableSource, connection_url};
pub use table::Table;
