//! Sending a request through its extension point and the API client.

use super::{FormattedReply, Request};
use crate::errors::Result;
use crate::extensions::FilterRegistry;
use crate::observability::{RequestSpanAttributes, SpanTimer};
use tracing::{debug, info_span, warn};

/// Applies filters, prepares, sends and formats `request`.
///
/// The reply (or the client's error) is formatted by the final instance
/// returned from the filter chain.
pub fn send(request: Box<dyn Request>, filters: &FilterRegistry) -> Result<FormattedReply> {
    let request = filters.apply_filters(request)?;
    let prepared = request.prepare()?;

    let span = info_span!(
        "payreq.send",
        request_type = prepared.request_type,
        method = %prepared.method,
        api = %prepared.api,
    );
    let _guard = span.enter();

    let timer = SpanTimer::start(RequestSpanAttributes::from_prepared(&prepared));
    let reply = request
        .core()
        .transport()
        .api_client
        .send_request(&prepared);
    let formatted = request.format_response(reply);

    let mut attrs = timer.finish();
    if let Some(point) = request.descriptor().resolved_extension_point() {
        attrs = attrs.with_extension_point(point);
    }
    match &formatted {
        Ok(_) => {
            let attrs = attrs.with_outcome("ok");
            debug!(attributes = ?attrs.to_otel_attributes(), "Request completed");
        }
        Err(e) => {
            let attrs = attrs.with_outcome("error").with_error_code(e.code());
            warn!(attributes = ?attrs.to_otel_attributes(), error = %e, "Request failed");
        }
    }
    formatted
}
