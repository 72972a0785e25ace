//! Client-side post-processing of list replies.
//!
//! Some list endpoints group and order records by criteria that are not in
//! the raw payload. [`process`] derives each record's status through a
//! [`StatusLookup`], keeps the records of the requested bucket that match
//! the search terms, and sorts them.

mod engine;
mod filter;
mod status;

pub use engine::{
    matches_search, process, sort_records, ProcessedResults, SkippedRecord, CUSTOMER_NAME_FIELD,
    ORDER_NUMBER_FIELD,
};
pub use filter::{FilterSpec, SortDirection};
pub use status::{DerivedStatus, OrderStatusLookup, StatusBucket, StatusLookup};
