//! Testing utilities for payreq.
//!
//! This module provides:
//! - Mock API client, HTTP transport and order lookup
//! - A fixed derived-status lookup for the result engine
//! - Assertions for the error taxonomy

mod assertions;
mod mocks;

pub use assertions::{
    assert_immutable, assert_invalid_parameter, assert_server_request, assert_server_response,
};
pub use mocks::{
    mock_transport, mock_transport_for_site, mock_transport_with, mock_transport_with_blog_id,
    sample_order, MockApiClient, MockHttpTransport, StaticOrderLookup, StaticStatusLookup,
    TEST_SITE_URL,
};
