//! Span attributes for outbound requests.

use crate::request::PreparedRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::trace;

/// Identity of an outbound request as span attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSpanAttributes {
    /// Request type name.
    pub request_type: String,
    /// HTTP method.
    pub method: Option<String>,
    /// Endpoint path.
    pub endpoint: Option<String>,
    /// Idempotency key.
    pub idempotency_key: Option<String>,
    /// Extension point the request went through.
    pub extension_point: Option<String>,
    /// Outcome, set once the reply is formatted.
    pub outcome: Option<String>,
    /// Error code if the call failed.
    pub error_code: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
}

impl RequestSpanAttributes {
    /// Creates attributes for a request type.
    #[must_use]
    pub fn new(request_type: impl Into<String>) -> Self {
        Self {
            request_type: request_type.into(),
            ..Default::default()
        }
    }

    /// Creates attributes describing a prepared request.
    #[must_use]
    pub fn from_prepared(prepared: &PreparedRequest) -> Self {
        Self {
            request_type: prepared.request_type.to_string(),
            method: Some(prepared.method.to_string()),
            endpoint: Some(prepared.api.clone()),
            idempotency_key: Some(prepared.idempotency_key.to_string()),
            ..Default::default()
        }
    }

    /// Sets the extension point.
    #[must_use]
    pub fn with_extension_point(mut self, point: impl Into<String>) -> Self {
        self.extension_point = Some(point.into());
        self
    }

    /// Sets the outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Sets the error code.
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Converts to OpenTelemetry attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();

        attrs.insert("payreq.request_type".to_string(), self.request_type.clone());

        if let Some(ref v) = self.method {
            attrs.insert("http.request.method".to_string(), v.clone());
        }
        if let Some(ref v) = self.endpoint {
            attrs.insert("url.path".to_string(), v.clone());
        }
        if let Some(ref v) = self.idempotency_key {
            attrs.insert("payreq.idempotency_key".to_string(), v.clone());
        }
        if let Some(ref v) = self.extension_point {
            attrs.insert("payreq.extension_point".to_string(), v.clone());
        }
        if let Some(ref v) = self.outcome {
            attrs.insert("payreq.outcome".to_string(), v.clone());
        }
        if let Some(ref v) = self.error_code {
            attrs.insert("error.type".to_string(), v.clone());
        }
        if let Some(v) = self.duration_ms {
            attrs.insert("payreq.duration_ms".to_string(), v.to_string());
        }

        attrs
    }
}

/// Times the client call of one request.
///
/// Holds the request's attributes and stamps the duration on them when
/// finished.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    attributes: RequestSpanAttributes,
}

impl SpanTimer {
    /// Starts timing the request described by `attributes`.
    #[must_use]
    pub fn start(attributes: RequestSpanAttributes) -> Self {
        Self {
            start: Instant::now(),
            attributes,
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The attributes being timed.
    #[must_use]
    pub fn attributes(&self) -> &RequestSpanAttributes {
        &self.attributes
    }

    /// Stops the timer and returns the attributes with `duration_ms` set.
    #[must_use]
    pub fn finish(self) -> RequestSpanAttributes {
        let duration_ms = self.elapsed_ms();
        trace!(
            request_type = %self.attributes.request_type,
            duration_ms,
            "Client call returned"
        );
        self.attributes.with_duration_ms(duration_ms)
    }
}
