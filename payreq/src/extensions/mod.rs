//! Extension points: subscribers that may replace a request with a more
//! specific one before it is sent.

mod registry;

pub use registry::{FilterRegistry, RequestFilter, DEFAULT_PRIORITY};
