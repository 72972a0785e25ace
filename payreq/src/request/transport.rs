//! Boundary to the out-of-scope transport collaborators.
//!
//! The framework never performs I/O. It hands a [`PreparedRequest`] to an
//! [`ApiClient`] and feeds whatever comes back into the request's
//! `format_response`.

use super::ParamMap;
use crate::config::SiteConfig;
use crate::contracts::HttpMethod;
use crate::errors::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Client for the remote payments API.
pub trait ApiClient: Send + Sync {
    /// The site requests are issued for.
    fn site(&self) -> SiteConfig;

    /// Whether the account is in test mode.
    fn is_test_mode(&self) -> bool {
        self.site().test_mode
    }

    /// Performs the call and returns the decoded reply body.
    fn send_request(&self, request: &PreparedRequest) -> Result<serde_json::Value>;
}

/// Low-level HTTP transport the API client runs on.
pub trait HttpTransport: Send + Sync {
    /// Whether the site is connected to the remote service.
    fn is_connected(&self) -> bool;

    /// Remote id of this site, used by site-specific endpoints.
    fn blog_id(&self) -> Option<u64>;
}

/// The two collaborators every request is constructed with.
#[derive(Clone)]
pub struct Transport {
    /// API client.
    pub api_client: Arc<dyn ApiClient>,
    /// HTTP transport.
    pub http: Arc<dyn HttpTransport>,
}

impl Transport {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(api_client: Arc<dyn ApiClient>, http: Arc<dyn HttpTransport>) -> Self {
        Self { api_client, http }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("connected", &self.http.is_connected())
            .field("blog_id", &self.http.blog_id())
            .finish_non_exhaustive()
    }
}

/// A finalized request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRequest {
    /// Name of the request type that produced it.
    pub request_type: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path, including the resource id and site prefix.
    pub api: String,
    /// Wire parameter map.
    pub params: ParamMap,
    /// Whether the call must be signed with the user's token.
    pub use_user_token: bool,
    /// Whether `api` was prefixed with the site's remote id.
    pub site_specific: bool,
    /// Idempotency key for the remote call.
    pub idempotency_key: Uuid,
}
