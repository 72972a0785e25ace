//! Mock collaborators for testing.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::capabilities::{OrderDetails, OrderLookup};
use crate::config::SiteConfig;
use crate::errors::{Result, TransportError};
use crate::request::{ApiClient, HttpTransport, PreparedRequest, Transport};
use crate::results::{DerivedStatus, StatusLookup};

/// Home URL of the site the mocks report.
pub const TEST_SITE_URL: &str = "https://shop.example.com";

/// An API client that records prepared requests and returns queued replies.
///
/// With no reply queued it answers `{}`.
#[derive(Debug)]
pub struct MockApiClient {
    site: Mutex<SiteConfig>,
    replies: Mutex<VecDeque<Result<serde_json::Value>>>,
    sent: Mutex<Vec<PreparedRequest>>,
}

impl MockApiClient {
    /// Creates a client for [`TEST_SITE_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::for_site(SiteConfig::new(TEST_SITE_URL))
    }

    /// Creates a client for `site`.
    #[must_use]
    pub fn for_site(site: SiteConfig) -> Self {
        Self {
            site: Mutex::new(site),
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the reported site.
    pub fn set_site(&self, site: SiteConfig) {
        *self.site.lock() = site;
    }

    /// Queues a reply for the next call.
    pub fn push_reply(&self, reply: Result<serde_json::Value>) {
        self.replies.lock().push_back(reply);
    }

    /// Returns the requests sent so far.
    #[must_use]
    pub fn sent_requests(&self) -> Vec<PreparedRequest> {
        self.sent.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Resets call tracking and queued replies.
    pub fn reset(&self) {
        self.sent.lock().clear();
        self.replies.lock().clear();
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for MockApiClient {
    fn site(&self) -> SiteConfig {
        self.site.lock().clone()
    }

    fn send_request(&self, request: &PreparedRequest) -> Result<serde_json::Value> {
        self.sent.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({})))
    }
}

/// An HTTP transport with a fixed connection state.
#[derive(Debug, Clone, Copy)]
pub struct MockHttpTransport {
    blog_id: Option<u64>,
}

impl MockHttpTransport {
    /// A transport connected as `blog_id`, or disconnected with `None`.
    #[must_use]
    pub fn new(blog_id: Option<u64>) -> Self {
        Self { blog_id }
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new(Some(1))
    }
}

impl HttpTransport for MockHttpTransport {
    fn is_connected(&self) -> bool {
        self.blog_id.is_some()
    }

    fn blog_id(&self) -> Option<u64> {
        self.blog_id
    }
}

/// Transport over a fresh [`MockApiClient`] and a connected HTTP mock.
#[must_use]
pub fn mock_transport() -> Transport {
    mock_transport_with(Arc::new(MockApiClient::new()))
}

/// Transport over `client`, for tests that inspect what was sent.
#[must_use]
pub fn mock_transport_with(client: Arc<MockApiClient>) -> Transport {
    Transport::new(client, Arc::new(MockHttpTransport::default()))
}

/// Transport reporting `site`.
#[must_use]
pub fn mock_transport_for_site(site: SiteConfig) -> Transport {
    mock_transport_with(Arc::new(MockApiClient::for_site(site)))
}

/// Transport whose HTTP side reports `blog_id`.
#[must_use]
pub fn mock_transport_with_blog_id(blog_id: Option<u64>) -> Transport {
    Transport::new(
        Arc::new(MockApiClient::new()),
        Arc::new(MockHttpTransport::new(blog_id)),
    )
}

/// An order with predictable details derived from `id`.
#[must_use]
pub fn sample_order(id: u64, status: &str) -> OrderDetails {
    OrderDetails {
        id,
        number: id.to_string(),
        key: format!("wc_order_{id}"),
        status: status.to_string(),
        customer_name: "Jane Doe".to_string(),
        customer_email: "jane@example.com".to_string(),
    }
}

/// Order lookup over a fixed set of orders.
#[derive(Debug, Default)]
pub struct StaticOrderLookup {
    orders: Mutex<HashMap<u64, OrderDetails>>,
    lookups: Mutex<usize>,
}

impl StaticOrderLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an order.
    #[must_use]
    pub fn with_order(self, order: OrderDetails) -> Self {
        self.orders.lock().insert(order.id, order);
        self
    }

    /// Returns the number of lookups.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        *self.lookups.lock()
    }
}

impl OrderLookup for StaticOrderLookup {
    fn find_order(&self, order_id: u64) -> Result<OrderDetails> {
        *self.lookups.lock() += 1;
        self.orders.lock().get(&order_id).cloned().ok_or_else(|| {
            TransportError::new("order_not_found", format!("No order with id {order_id}"), 404)
                .into()
        })
    }
}

/// Status lookup keyed by the record's `id` field.
///
/// Records with an unknown or missing id fail the lookup.
#[derive(Debug, Default)]
pub struct StaticStatusLookup {
    statuses: HashMap<String, DerivedStatus>,
}

impl StaticStatusLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status of the record with `id`.
    #[must_use]
    pub fn with_status(mut self, id: impl Into<String>, status: DerivedStatus) -> Self {
        self.statuses.insert(id.into(), status);
        self
    }
}

impl StatusLookup for StaticStatusLookup {
    fn derive_status(&self, record: &serde_json::Value) -> Result<DerivedStatus> {
        let id = record
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        self.statuses.get(id).copied().ok_or_else(|| {
            TransportError::new("status_unavailable", format!("No status for record '{id}'"), 404)
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::HttpMethod;
    use crate::request::ParamMap;
    use serde_json::json;
    use uuid::Uuid;

    fn prepared() -> PreparedRequest {
        PreparedRequest {
            request_type: "mock",
            method: HttpMethod::Get,
            api: "ping".to_string(),
            params: ParamMap::new(),
            use_user_token: false,
            site_specific: false,
            idempotency_key: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_mock_client_replays_queue() {
        let client = MockApiClient::new();
        client.push_reply(Ok(json!({"n": 1})));

        assert_eq!(client.send_request(&prepared()).unwrap(), json!({"n": 1}));
        assert_eq!(client.send_request(&prepared()).unwrap(), json!({}));
        assert_eq!(client.call_count(), 2);

        client.reset();
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_mock_client_site() {
        let client = MockApiClient::new();
        assert_eq!(client.site().home_url, TEST_SITE_URL);
        assert!(!client.is_test_mode());

        client.set_site(SiteConfig::new(TEST_SITE_URL).with_test_mode(true));
        assert!(client.is_test_mode());
    }

    #[test]
    fn test_mock_http_transport() {
        assert!(MockHttpTransport::default().is_connected());
        assert!(!MockHttpTransport::new(None).is_connected());
    }

    #[test]
    fn test_static_order_lookup() {
        let orders = StaticOrderLookup::new().with_order(sample_order(5, "completed"));
        assert_eq!(orders.find_order(5).unwrap().key, "wc_order_5");
        assert!(orders.find_order(6).is_err());
        assert_eq!(orders.lookup_count(), 2);
    }
}
