//! Observability utilities.

mod spans;
mod subscriber;

pub use spans::{RequestSpanAttributes, SpanTimer};
pub use subscriber::{env_filter, init_tracing};
