//! # Payreq
//!
//! Request construction and validation for a remote payments API.
//!
//! Payreq provides a structured approach to building outbound API calls
//! with support for:
//!
//! - **Declarative contracts**: Each request type declares defaults, required
//!   and locked parameters as a delta over its parent type
//! - **Validated setters**: Ids, URLs, dates, currencies and bounds are checked
//!   where they are set
//! - **Extension points**: Subscribers may replace a request with a more
//!   specific one before it is sent
//! - **Immutable responses**: Replies are wrapped in read-only containers or
//!   typed domain objects
//! - **Result shaping**: List replies can be filtered by derived status,
//!   searched and sorted client-side
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payreq::prelude::*;
//!
//! let mut request = CreateIntention::create(transport, None)?;
//! request.set_amount(1500)?;
//! request.set_currency_code("eur")?;
//!
//! let filters = FilterRegistry::new();
//! let reply = send(request.boxed(), &filters)?;
//! let intention = reply.as_intention();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod capabilities;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod errors;
pub mod extensions;
pub mod observability;
pub mod request;
pub mod requests;
pub mod response;
pub mod rest;
pub mod results;
pub mod testing;
pub mod validation;

mod integration_tests;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capabilities::{
        DateFilters, ModeFlag, OrderDetails, OrderInfo, OrderLookup, Pagination,
    };
    pub use crate::config::{LoggingConfig, PayreqConfig, SiteConfig};
    pub use crate::contracts::{DefaultValue, HttpMethod, RequestDescriptor};
    pub use crate::domain::{Charge, PaymentIntention};
    pub use crate::errors::{
        ImmutableParameterError, InvalidRequestParameterError, PayreqError, Result,
        ServerRequestError, ServerResponseError, TransportError,
    };
    pub use crate::extensions::{FilterRegistry, RequestFilter};
    pub use crate::request::{
        send, ApiClient, FormattedReply, GenericRequest, HttpTransport, PreparedRequest, Request,
        RequestType, Transport,
    };
    pub use crate::requests::{
        ConfirmationFields, CreateAndConfirmIntention, CreateIntention, GetAccountLogin,
        GetCharge, GetIntention, IntentionFields, ListFraudOutcomeTransactions,
        PlatformCheckoutCreateAndConfirmIntention, RefundCharge,
    };
    pub use crate::response::Response;
    pub use crate::rest::{list_fraud_outcomes_from_rest, RestParameters};
    pub use crate::results::{FilterSpec, ProcessedResults, SortDirection, StatusBucket};
}
